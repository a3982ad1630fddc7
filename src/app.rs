use serde::{Deserialize, Serialize};

use crate::capabilities::{Capabilities, ConnectivityStatus};
use crate::country::{self, RawCountry};
use crate::event::Event;
use crate::geo::{self, GeoPoint};
use crate::model::{DatasetStatus, MapRenderMode, Model};
use crate::{AppError, ErrorKind, COUNTRIES_DATASET_URL, MAX_COUNTRY_PHOTOS};

#[derive(Default)]
pub struct App;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MarkerView {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SuggestionView {
    pub code: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CountryCardView {
    pub name: String,
    pub flag_url: Option<String>,
    pub capital: Option<String>,
    pub region: String,
    pub subregion: Option<String>,
    pub area_km2: f64,
    pub population: u64,
    pub currencies: String,
    pub languages: String,
    pub photo_urls: Vec<String>,
    pub minimized: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub offline: bool,
    pub is_loading: bool,
    pub map_mode: MapRenderMode,
    pub map_menu_visible: bool,
    pub marker: Option<MarkerView>,
    pub search_text: String,
    pub suggestions: Vec<SuggestionView>,
    pub suggestions_visible: bool,
    pub card: Option<CountryCardView>,
}

fn tap_photo_query(country_name: &str) -> String {
    format!("{country_name} country capital city pictures")
}

fn suggestion_photo_query(country_name: &str) -> String {
    format!("{country_name} country beautiful pictures")
}

fn is_http_url(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

impl App {
    fn send_dataset_request(caps: &Capabilities) {
        caps.http
            .get(COUNTRIES_DATASET_URL)
            .send(|result| Event::DatasetFetched(Box::new(result)));
    }

    fn request_photos(model: &mut Model, caps: &Capabilities, query: String) {
        let token = model.begin_photo_fetch();
        caps.photos.search(query, MAX_COUNTRY_PHOTOS, move |result| {
            Event::PhotosFetched { token, result }
        });
    }

    fn handle_dataset_response(
        result: crux_http::Result<crux_http::Response<Vec<u8>>>,
        model: &mut Model,
    ) {
        match result {
            Ok(mut response) => {
                let body = response.take_body().unwrap_or_default();
                match serde_json::from_slice::<Vec<RawCountry>>(&body) {
                    Ok(raw) => {
                        model.countries = country::parse_dataset(raw);
                        model.dataset_status = DatasetStatus::Loaded;
                        model.clear_error();
                        tracing::info!(count = model.countries.len(), "country dataset loaded");
                    }
                    Err(e) => {
                        model.countries = Vec::new();
                        model.dataset_status = DatasetStatus::Failed;
                        model.set_error(AppError::new(
                            ErrorKind::DatasetFetch,
                            format!("malformed dataset payload: {e}"),
                        ));
                        tracing::error!(error = %e, "failed to decode country dataset");
                    }
                }
            }
            Err(e) => {
                model.countries = Vec::new();
                model.dataset_status = DatasetStatus::Failed;
                model.set_error(AppError::new(ErrorKind::DatasetFetch, e.to_string()));
                tracing::error!(error = %e, "country dataset fetch failed");
            }
        }
    }

    fn sanitize_photo_urls(urls: Vec<String>) -> Vec<String> {
        urls.into_iter().filter(|u| is_http_url(u)).collect()
    }

    fn build_card(model: &Model) -> Option<CountryCardView> {
        let country = model.selected.as_ref()?;
        Some(CountryCardView {
            name: country.name.clone(),
            flag_url: country.flag_url.clone(),
            capital: country.capital.clone(),
            region: country.region.clone(),
            subregion: country.subregion.clone(),
            area_km2: country.area_km2,
            population: country.population,
            currencies: country.currency_summary(),
            languages: country.language_summary(),
            photo_urls: model.photo_urls.clone(),
            minimized: model.card_minimized,
        })
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        tracing::debug!(event = event.name(), "handling event");

        match event {
            Event::AppStarted => {
                model.dataset_status = DatasetStatus::Loading;
                caps.connectivity.subscribe(Event::ConnectivityChanged);
                Self::send_dataset_request(caps);
                caps.render.render();
            }

            Event::MapTapped { lat, lng } => {
                match GeoPoint::new(lat, lng) {
                    Ok(point) => {
                        model.marker = Some(point);
                        match geo::nearest_country(point, &model.countries).cloned() {
                            Some(nearest) => {
                                tracing::debug!(code = %nearest.code, "map tap resolved");
                                let query = tap_photo_query(&nearest.name);
                                model.selected = Some(nearest);
                                model.suggestions_visible = false;
                                Self::request_photos(model, caps, query);
                            }
                            // Dataset not loaded yet (or nothing eligible):
                            // keep the marker, select nothing, stay alive.
                            None => model.selected = None,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(lat, lng, error = %e, "ignoring tap at invalid coordinates");
                        model.set_error(AppError::new(ErrorKind::Validation, e.to_string()));
                    }
                }
                caps.render.render();
            }

            Event::SearchChanged { text } => {
                let suggestions: Vec<_> = country::filter_by_name(&text, &model.countries)
                    .into_iter()
                    .cloned()
                    .collect();
                model.search_text = text;
                model.suggestions = suggestions;
                model.suggestions_visible = true;
                if model.selected.take().is_some() {
                    // A late photo result for the dismissed card must not land.
                    model.invalidate_photos();
                }
                caps.render.render();
            }

            Event::SuggestionSelected { code } => {
                match model.find_country(&code).cloned() {
                    Some(country) => {
                        if let Some(latlng) = country.latlng {
                            model.marker = Some(latlng);
                        }
                        let query = suggestion_photo_query(&country.name);
                        model.selected = Some(country);
                        model.suggestions.clear();
                        model.suggestions_visible = false;
                        model.map_menu_visible = false;
                        Self::request_photos(model, caps, query);
                    }
                    None => {
                        tracing::warn!(%code, "suggestion selected for unknown country code");
                    }
                }
                caps.render.render();
            }

            Event::MapMenuOpened => {
                model.map_menu_visible = true;
                caps.render.render();
            }

            Event::MapMenuDismissed => {
                model.map_menu_visible = false;
                caps.render.render();
            }

            Event::MapModeSelected(mode) => {
                model.map_mode = mode;
                model.map_menu_visible = false;
                caps.render.render();
            }

            Event::CardMinimized => {
                if model.selected.is_some() {
                    model.card_minimized = true;
                }
                caps.render.render();
            }

            Event::CardExpanded => {
                if model.card_minimized {
                    model.card_minimized = false;
                }
                caps.render.render();
            }

            Event::ConnectivityChanged(status) => {
                match status {
                    ConnectivityStatus::Connected => model.online = true,
                    ConnectivityStatus::Disconnected => model.online = false,
                    ConnectivityStatus::Unknown => {
                        tracing::debug!("connectivity unknown; keeping last known state");
                        model.set_error(AppError::new(
                            ErrorKind::Connectivity,
                            "connectivity state unknown",
                        ));
                    }
                }
                caps.render.render();
            }

            Event::DatasetFetched(result) => {
                Self::handle_dataset_response(*result, model);
                caps.render.render();
            }

            Event::PhotosFetched { token, result } => {
                if !model.is_current_photo_token(token) {
                    tracing::debug!("dropping photo results for a stale selection");
                    return;
                }
                match result {
                    Ok(output) => {
                        model.set_photos(Self::sanitize_photo_urls(output.urls));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "photo search failed; keeping previous photos");
                        model.set_error(AppError::new(ErrorKind::PhotoFetch, e.to_string()));
                    }
                }
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel {
            offline: !model.online,
            is_loading: model.dataset_status.is_loading(),
            map_mode: model.map_mode,
            map_menu_visible: model.map_menu_visible,
            marker: model.marker.map(|m| MarkerView {
                lat: m.lat(),
                lng: m.lng(),
            }),
            search_text: model.search_text.clone(),
            suggestions: model
                .suggestions
                .iter()
                .map(|c| SuggestionView {
                    code: c.code.clone(),
                    name: c.name.clone(),
                })
                .collect(),
            // The strip only shows when there is something to show.
            suggestions_visible: model.suggestions_visible && !model.suggestions.is_empty(),
            card: Self::build_card(model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::{CountryRecord, CurrencyInfo};
    use crux_core::App as _;

    mod query_tests {
        use super::*;

        #[test]
        fn tap_query_uses_capital_city_wording() {
            assert_eq!(
                tap_photo_query("France"),
                "France country capital city pictures"
            );
        }

        #[test]
        fn suggestion_query_uses_beautiful_wording() {
            assert_eq!(
                suggestion_photo_query("Germany"),
                "Germany country beautiful pictures"
            );
        }
    }

    mod url_tests {
        use super::*;

        #[test]
        fn keeps_http_and_https_urls_in_order() {
            let urls = vec![
                "https://img.example/1.jpg".to_string(),
                "http://img.example/2.jpg".to_string(),
            ];
            assert_eq!(App::sanitize_photo_urls(urls.clone()), urls);
        }

        #[test]
        fn discards_non_http_schemes_and_garbage() {
            let urls = vec![
                "javascript:alert(1)".to_string(),
                "ftp://files.example/3.jpg".to_string(),
                "not a url".to_string(),
                "https://img.example/ok.jpg".to_string(),
            ];
            assert_eq!(
                App::sanitize_photo_urls(urls),
                vec!["https://img.example/ok.jpg".to_string()]
            );
        }
    }

    mod view_tests {
        use super::*;

        fn selected_model() -> Model {
            let mut model = Model::new();
            let mut france = CountryRecord::for_tests("FR", "France", Some((46.0, 2.0)));
            france.capital = Some("Paris".into());
            france.region = "Europe".into();
            france.subregion = Some("Western Europe".into());
            france.area_km2 = 551_695.0;
            france.population = 67_391_582;
            france.flag_url = Some("https://flagcdn.com/w320/fr.png".into());
            france.currencies.insert(
                "EUR".into(),
                CurrencyInfo {
                    name: "Euro".into(),
                    symbol: Some("€".into()),
                },
            );
            france.languages.insert("fra".into(), "French".into());
            model.selected = Some(france);
            model.photo_urls = vec!["https://img.example/paris.jpg".into()];
            model
        }

        #[test]
        fn card_renders_formatted_currency_and_language_lines() {
            let model = selected_model();
            let view = App::default().view(&model);
            let card = view.card.unwrap();
            assert_eq!(card.name, "France");
            assert_eq!(card.capital.as_deref(), Some("Paris"));
            assert_eq!(card.currencies, "Euro (€)");
            assert_eq!(card.languages, "French");
            assert_eq!(card.photo_urls, vec!["https://img.example/paris.jpg"]);
            assert!(!card.minimized);
        }

        #[test]
        fn card_is_absent_without_a_selection() {
            let view = App::default().view(&Model::new());
            assert!(view.card.is_none());
        }

        #[test]
        fn minimized_flag_flows_into_the_card() {
            let mut model = selected_model();
            model.card_minimized = true;
            let view = App::default().view(&model);
            assert!(view.card.unwrap().minimized);
        }

        #[test]
        fn suggestions_are_hidden_when_the_list_is_empty() {
            let mut model = Model::new();
            model.suggestions_visible = true;
            let view = App::default().view(&model);
            assert!(!view.suggestions_visible);
        }

        #[test]
        fn offline_banner_mirrors_connectivity() {
            let mut model = Model::new();
            assert!(!App::default().view(&model).offline);
            model.online = false;
            assert!(App::default().view(&model).offline);
        }
    }
}
