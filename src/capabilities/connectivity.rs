use crux_core::capability::{Capability, CapabilityContext, Operation};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityStatus {
    Connected,
    Disconnected,
    /// The platform could not determine the state. Transient; callers keep
    /// their last known state.
    Unknown,
}

impl ConnectivityStatus {
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityOperation {
    /// Start delivering connectivity changes. The shell registers one
    /// platform listener per subscription and releases it on teardown.
    Subscribe,
}

impl Operation for ConnectivityOperation {
    type Output = ConnectivityStatus;
}

pub struct Connectivity<Ev> {
    context: CapabilityContext<ConnectivityOperation, Ev>,
}

impl<Ev> std::fmt::Debug for Connectivity<Ev> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connectivity").finish_non_exhaustive()
    }
}

impl<Ev> Capability<Ev> for Connectivity<Ev> {
    type Operation = ConnectivityOperation;
    type MappedSelf<MappedEv> = Connectivity<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Connectivity::new(self.context.map_event(f))
    }
}

impl<Ev> Connectivity<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ConnectivityOperation, Ev>) -> Self {
        Self { context }
    }

    /// Subscribes once; each status change from the shell becomes an event.
    pub fn subscribe<F>(&self, make_event: F)
    where
        F: Fn(ConnectivityStatus) -> Ev + Send + 'static,
        Ev: Send,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let mut statuses = context.stream_from_shell(ConnectivityOperation::Subscribe);
            while let Some(status) = statuses.next().await {
                context.update_app(make_event(status));
            }
        });
    }
}
