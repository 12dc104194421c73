use crate::domain::entities::offline::CacheStatusSnapshot;
use crate::domain::value_objects::Collection;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// Persisted mirror of remote collections. Entries are superseded by the
/// next refresh, never deleted through this port.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Replace the collection's snapshot with the given record documents,
    /// keyed by their `"id"` field. Empty input clears the collection.
    async fn refresh_all(
        &self,
        collection: &Collection,
        records: Vec<Value>,
    ) -> Result<(), AppError>;

    /// All cached documents for a collection, unordered. Empty cache is an
    /// empty result, not an error.
    async fn read_all(&self, collection: &Collection) -> Result<Vec<Value>, AppError>;

    async fn status(&self) -> Result<CacheStatusSnapshot, AppError>;
}
