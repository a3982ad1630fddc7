#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod country;
pub mod event;
pub mod geo;
pub mod model;

use serde::{Deserialize, Serialize};

pub use app::{App, CountryCardView, MarkerView, SuggestionView, ViewModel};
pub use capabilities::{
    Capabilities, Connectivity, ConnectivityOperation, ConnectivityStatus, Effect, PhotoSearch,
    PhotoSearchError, PhotoSearchOperation, PhotoSearchOutput, PhotoSearchResult,
};
pub use country::{filter_by_name, parse_dataset, CountryRecord, CurrencyInfo, RawCountry};
pub use event::Event;
pub use geo::{great_circle_km, nearest_country, CoordinateError, GeoPoint};
pub use model::{DatasetStatus, MapRenderMode, Model, SelectionToken};

/// The countries endpoint, with an explicit selection of exactly the fields
/// the app consumes.
pub const COUNTRIES_DATASET_URL: &str = "https://restcountries.com/v3.1/all?fields=name,capital,region,subregion,area,currencies,languages,population,flags,latlng,cca2";

/// Display cap for the photo strip.
pub const MAX_COUNTRY_PHOTOS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    DatasetFetch,
    PhotoFetch,
    Connectivity,
    Validation,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::DatasetFetch => "DATASET_FETCH_FAILED",
            Self::PhotoFetch => "PHOTO_FETCH_FAILED",
            Self::Connectivity => "CONNECTIVITY_UNKNOWN",
            Self::Validation => "VALIDATION_ERROR",
        }
    }

    /// All errors here are recovered locally; transient ones clear themselves
    /// on the next user action that retriggers the fetch.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::DatasetFetch | Self::PhotoFetch | Self::Connectivity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::DatasetFetch => {
                "Unable to load country data. Please check your connection and restart.".into()
            }
            ErrorKind::PhotoFetch => {
                "Unable to load photos right now. Tap the map again to retry.".into()
            }
            ErrorKind::Connectivity => "Network state could not be determined.".into(),
            ErrorKind::Validation => self.message.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}
