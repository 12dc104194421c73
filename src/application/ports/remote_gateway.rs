use crate::domain::value_objects::{Collection, RecordId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// Opaque boundary to the hosted backend. Implementations must surface
/// absent connectivity as `AppError::Network` and application-level
/// rejections as `AppError::Rejected`; callers branch on `is_network()`.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Create a record; the returned document carries the server-assigned id.
    async fn insert(&self, collection: &Collection, record: &Value) -> Result<Value, AppError>;

    /// Partial update keyed by id.
    async fn update(
        &self,
        collection: &Collection,
        id: &RecordId,
        patch: &Value,
    ) -> Result<(), AppError>;

    /// Online-only; deletes are never queued.
    async fn delete(&self, collection: &Collection, id: &RecordId) -> Result<(), AppError>;

    async fn select_all(&self, collection: &Collection) -> Result<Vec<Value>, AppError>;
}
