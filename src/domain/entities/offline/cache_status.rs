use crate::domain::value_objects::Collection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionCacheStatus {
    pub collection: Collection,
    pub record_count: u64,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// Per-collection view of what the local mirror currently holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CacheStatusSnapshot {
    pub collections: Vec<CollectionCacheStatus>,
}

impl CacheStatusSnapshot {
    pub fn total_records(&self) -> u64 {
        self.collections.iter().map(|c| c.record_count).sum()
    }
}
