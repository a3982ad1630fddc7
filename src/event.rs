use serde::{Deserialize, Serialize};

use crate::capabilities::{ConnectivityStatus, PhotoSearchResult};
use crate::model::{MapRenderMode, SelectionToken};

/// Everything that can happen to the app: user interactions from the shell
/// plus capability responses. Large capability payloads are boxed to keep the
/// enum small.
#[derive(Serialize, Deserialize)]
pub enum Event {
    AppStarted,

    // Map
    MapTapped { lat: f64, lng: f64 },
    MapMenuOpened,
    MapMenuDismissed,
    MapModeSelected(MapRenderMode),

    // Search
    SearchChanged { text: String },
    SuggestionSelected { code: String },

    // Country card
    CardMinimized,
    CardExpanded,

    // Capability responses
    ConnectivityChanged(ConnectivityStatus),
    PhotosFetched {
        token: SelectionToken,
        result: PhotoSearchResult,
    },
    #[serde(skip)]
    DatasetFetched(Box<crux_http::Result<crux_http::Response<Vec<u8>>>>),
}

impl Event {
    /// Stable name for log lines.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::MapTapped { .. } => "map_tapped",
            Self::MapMenuOpened => "map_menu_opened",
            Self::MapMenuDismissed => "map_menu_dismissed",
            Self::MapModeSelected(_) => "map_mode_selected",
            Self::SearchChanged { .. } => "search_changed",
            Self::SuggestionSelected { .. } => "suggestion_selected",
            Self::CardMinimized => "card_minimized",
            Self::CardExpanded => "card_expanded",
            Self::ConnectivityChanged(_) => "connectivity_changed",
            Self::PhotosFetched { .. } => "photos_fetched",
            Self::DatasetFetched(_) => "dataset_fetched",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::MapTapped { .. }
                | Self::MapMenuOpened
                | Self::MapMenuDismissed
                | Self::MapModeSelected(_)
                | Self::SearchChanged { .. }
                | Self::SuggestionSelected { .. }
                | Self::CardMinimized
                | Self::CardExpanded
        )
    }
}
