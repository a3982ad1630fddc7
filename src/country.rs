use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One currency as displayed on the country card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub name: String,
    pub symbol: Option<String>,
}

/// A validated country record.
///
/// The dataset is immutable for the session: records are produced by
/// [`parse_dataset`] in one pass and never mutated afterwards. Currency and
/// language maps are ordered so display output is deterministic regardless of
/// upstream JSON object order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Stable unique identifier (ISO 3166-1 alpha-2), used as the list key.
    pub code: String,
    pub name: String,
    pub capital: Option<String>,
    pub region: String,
    pub subregion: Option<String>,
    pub area_km2: f64,
    pub population: u64,
    pub flag_url: Option<String>,
    pub currencies: BTreeMap<String, CurrencyInfo>,
    pub languages: BTreeMap<String, String>,
    /// Representative coordinate; `None` excludes the record from
    /// nearest-country search.
    pub latlng: Option<GeoPoint>,
}

impl CountryRecord {
    /// The card's currency line: "Euro (€), US Dollar ($)".
    #[must_use]
    pub fn currency_summary(&self) -> String {
        self.currencies
            .values()
            .map(|c| match &c.symbol {
                Some(symbol) => format!("{} ({symbol})", c.name),
                None => c.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The card's language line: "French, German".
    #[must_use]
    pub fn language_summary(&self) -> String {
        self.languages.values().cloned().collect::<Vec<_>>().join(", ")
    }

    #[cfg(test)]
    pub(crate) fn for_tests(code: &str, name: &str, latlng: Option<(f64, f64)>) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            capital: None,
            region: String::new(),
            subregion: None,
            area_km2: 0.0,
            population: 0,
            flag_url: None,
            currencies: BTreeMap::new(),
            languages: BTreeMap::new(),
            latlng: latlng.map(|(lat, lng)| GeoPoint::new(lat, lng).expect("valid test coordinate")),
        }
    }
}

/// Wire representation of one entry of the countries payload. Every field is
/// defaulted: a half-empty upstream object must deserialize, validation
/// happens in [`parse_dataset`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCountry {
    #[serde(default)]
    pub name: RawCountryName,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub currencies: BTreeMap<String, RawCurrency>,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub flags: RawFlags,
    #[serde(default)]
    pub latlng: Vec<f64>,
    #[serde(default)]
    pub cca2: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCountryName {
    #[serde(default)]
    pub common: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCurrency {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFlags {
    #[serde(default)]
    pub png: Option<String>,
}

impl RawCountry {
    /// Validates one wire entry into a [`CountryRecord`].
    ///
    /// Entries without an identifier or a display name are rejected. A missing
    /// or invalid `latlng` does not reject the record, it only makes it
    /// ineligible for nearest-country search.
    fn validate(self) -> Option<CountryRecord> {
        if self.cca2.trim().is_empty() || self.name.common.trim().is_empty() {
            return None;
        }

        let latlng = match self.latlng.as_slice() {
            [lat, lng] => GeoPoint::new(*lat, *lng).ok(),
            _ => None,
        };

        Some(CountryRecord {
            code: self.cca2,
            name: self.name.common,
            capital: self.capital.into_iter().next().filter(|c| !c.is_empty()),
            region: self.region,
            subregion: self.subregion.filter(|s| !s.is_empty()),
            area_km2: self.area,
            population: self.population,
            flag_url: self.flags.png.filter(|u| !u.is_empty()),
            currencies: self
                .currencies
                .into_iter()
                .map(|(code, c)| {
                    (
                        code,
                        CurrencyInfo {
                            name: c.name,
                            symbol: c.symbol,
                        },
                    )
                })
                .collect(),
            languages: self.languages,
            latlng,
        })
    }
}

/// Folds the wire payload into validated records, dropping malformed entries.
#[must_use]
pub fn parse_dataset(raw: Vec<RawCountry>) -> Vec<CountryRecord> {
    let total = raw.len();
    let countries: Vec<CountryRecord> = raw.into_iter().filter_map(RawCountry::validate).collect();

    let skipped = total - countries.len();
    if skipped > 0 {
        tracing::warn!(total, skipped, "dropped malformed country entries");
    }

    countries
}

/// Case-insensitive substring filter over the common name.
///
/// The empty query matches every record (an empty string is contained in every
/// string, and that is the behavior the search box relies on: clearing the
/// field shows the full list). Input order is preserved; there is no relevance
/// ranking.
#[must_use]
pub fn filter_by_name<'a>(query: &str, countries: &'a [CountryRecord]) -> Vec<&'a CountryRecord> {
    let needle = query.to_lowercase();
    countries
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .collect()
}
