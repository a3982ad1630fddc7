use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One image search request handed to the shell. The shell resolves it with
/// whatever image-search helper the platform ships; ranking and scraping are
/// its business, the core only consumes the resulting URL list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSearchOperation {
    pub query: String,
    pub limit: usize,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PhotoSearchError {
    #[error("network error: {message}")]
    Network {
        message: String,
        #[serde(default)]
        is_retryable: bool,
    },

    #[error("operation timed out")]
    Timeout,

    #[error("image search not available on this platform")]
    Unavailable,

    #[error("unknown error: {message}")]
    Unknown { message: String },
}

impl PhotoSearchError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { is_retryable, .. } => *is_retryable,
            Self::Timeout => true,
            Self::Unavailable | Self::Unknown { .. } => false,
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            is_retryable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSearchOutput {
    pub urls: Vec<String>,
}

pub type PhotoSearchResult = Result<PhotoSearchOutput, PhotoSearchError>;

impl Operation for PhotoSearchOperation {
    type Output = PhotoSearchResult;
}

pub struct PhotoSearch<Ev> {
    context: CapabilityContext<PhotoSearchOperation, Ev>,
}

impl<Ev> std::fmt::Debug for PhotoSearch<Ev> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoSearch").finish_non_exhaustive()
    }
}

impl<Ev> Capability<Ev> for PhotoSearch<Ev> {
    type Operation = PhotoSearchOperation;
    type MappedSelf<MappedEv> = PhotoSearch<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        PhotoSearch::new(self.context.map_event(f))
    }
}

impl<Ev> PhotoSearch<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<PhotoSearchOperation, Ev>) -> Self {
        Self { context }
    }

    /// Requests up to `limit` image URLs for `query`; `make_event` wraps the
    /// result back into an app event.
    pub fn search<F>(&self, query: impl Into<String>, limit: usize, make_event: F)
    where
        F: FnOnce(PhotoSearchResult) -> Ev + Send + 'static,
        Ev: Send,
    {
        let operation = PhotoSearchOperation {
            query: query.into(),
            limit,
        };

        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}
