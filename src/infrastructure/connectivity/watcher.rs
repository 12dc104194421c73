use crate::application::ports::connectivity::ConnectivitySource;
use tokio::sync::watch;

/// Process-wide connectivity state fed by the embedding shell (the browser
/// online/offline events in the original client) or by tests.
pub struct ConnectivityWatcher {
    state: watch::Sender<bool>,
}

impl ConnectivityWatcher {
    pub fn new(initially_online: bool) -> Self {
        let (state, _) = watch::channel(initially_online);
        Self { state }
    }

    /// Record a transition; subscribers are only woken when the value
    /// actually changes.
    pub fn set_online(&self, online: bool) {
        self.state.send_if_modified(|current| {
            if *current != online {
                *current = online;
                true
            } else {
                false
            }
        });
    }
}

impl ConnectivitySource for ConnectivityWatcher {
    fn is_online(&self) -> bool {
        *self.state.borrow()
    }

    fn watch(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}
