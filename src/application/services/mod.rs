pub mod offline_service;
pub mod sync_service;

pub use offline_service::{OfflineService, OfflineServiceTrait, WriteOutcome};
pub use sync_service::{SyncEvent, SyncPhase, SyncService, SyncStatus};
