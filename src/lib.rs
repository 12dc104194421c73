//! Offline-first sync core for the Lariat CRM client: a local cache of
//! remote collections, a durable pending-operation queue for mutations made
//! without connectivity, and the replay driver that drains the queue and
//! refreshes the cache when connectivity returns.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod shared;
pub mod state;

pub use shared::{AppConfig, AppError};
pub use state::AppState;

pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lariat=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
