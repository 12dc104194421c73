use tokio::sync::watch;

/// Observable online/offline state. `watch()` hands out an explicit
/// subscription; dropping the receiver cancels it, which keeps the replay
/// driver's lifecycle controllable in tests.
pub trait ConnectivitySource: Send + Sync {
    fn is_online(&self) -> bool;

    fn watch(&self) -> watch::Receiver<bool>;
}
