use serde::{Deserialize, Serialize};

use crate::country::CountryRecord;
use crate::geo::GeoPoint;
use crate::{AppError, MAX_COUNTRY_PHOTOS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MapRenderMode {
    #[default]
    Standard,
    Satellite,
    Hybrid,
}

impl MapRenderMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Satellite => "satellite",
            Self::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatasetStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

impl DatasetStatus {
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }
}

/// Generation counter keying each in-flight photo fetch to the selection that
/// initiated it. A result carrying a token other than the model's current one
/// belongs to a stale selection and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SelectionToken(u64);

impl SelectionToken {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// The whole UI state. Created once at startup, mutated only by the event
/// handlers in `App::update`, never serialized or persisted.
pub struct Model {
    pub countries: Vec<CountryRecord>,
    pub dataset_status: DatasetStatus,

    pub marker: Option<GeoPoint>,
    pub selected: Option<CountryRecord>,

    pub search_text: String,
    pub suggestions: Vec<CountryRecord>,
    pub suggestions_visible: bool,

    pub photo_urls: Vec<String>,
    pub photo_token: SelectionToken,

    pub card_minimized: bool,
    pub map_mode: MapRenderMode,
    pub map_menu_visible: bool,

    pub online: bool,
    pub last_error: Option<AppError>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            countries: Vec::new(),
            dataset_status: DatasetStatus::Idle,
            marker: None,
            selected: None,
            search_text: String::new(),
            suggestions: Vec::new(),
            suggestions_visible: false,
            photo_urls: Vec::new(),
            photo_token: SelectionToken::default(),
            card_minimized: false,
            map_mode: MapRenderMode::Standard,
            map_menu_visible: false,
            // Assume connected until the subscription says otherwise.
            online: true,
            last_error: None,
        }
    }
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dataset_loaded(&self) -> bool {
        !self.countries.is_empty()
    }

    pub fn set_error(&mut self, error: AppError) {
        self.last_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Starts a new photo-fetch generation and returns its token.
    pub fn begin_photo_fetch(&mut self) -> SelectionToken {
        self.photo_token = self.photo_token.next();
        self.photo_token
    }

    /// Invalidates any in-flight photo fetch without starting a new one.
    pub fn invalidate_photos(&mut self) {
        self.photo_token = self.photo_token.next();
    }

    #[must_use]
    pub fn is_current_photo_token(&self, token: SelectionToken) -> bool {
        token == self.photo_token
    }

    /// Replaces the photo strip, enforcing the display cap.
    pub fn set_photos(&mut self, mut urls: Vec<String>) {
        urls.truncate(MAX_COUNTRY_PHOTOS);
        self.photo_urls = urls;
    }

    #[must_use]
    pub fn find_country(&self, code: &str) -> Option<&CountryRecord> {
        self.countries.iter().find(|c| c.code == code)
    }
}
