mod connectivity;
mod photo_search;

pub use self::connectivity::{Connectivity, ConnectivityOperation, ConnectivityStatus};
pub use self::photo_search::{
    PhotoSearch, PhotoSearchError, PhotoSearchOperation, PhotoSearchOutput, PhotoSearchResult,
};

// Render and Http come from Crux directly; they already cover triggering view
// updates and the dataset fetch.
pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub photos: PhotoSearch<Event>,
    pub connectivity: Connectivity<Event>,
}
