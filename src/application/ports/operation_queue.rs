use crate::domain::entities::offline::{QueuedOperation, QueuedOperationDraft};
use crate::domain::value_objects::{Collection, SequenceId};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable log of mutations awaiting replay. Append-only from the caller's
/// point of view: entries are removed after replay, never edited.
#[async_trait]
pub trait OperationQueue: Send + Sync {
    /// Append a new operation and return its sequence id. Never rejects
    /// duplicates for the same record; folding is the merge view's job.
    /// Fails only on local storage exhaustion.
    async fn enqueue(&self, draft: QueuedOperationDraft) -> Result<SequenceId, AppError>;

    /// Pending operations for a collection in ascending sequence order.
    /// Restartable: each call re-reads the current queue state.
    async fn list_pending(&self, collection: &Collection) -> Result<Vec<QueuedOperation>, AppError>;

    /// Remove one entry after successful replay. Idempotent; removing an
    /// unknown id is a no-op.
    async fn remove(&self, sequence_id: SequenceId) -> Result<(), AppError>;

    /// Total queued entries across all collections.
    async fn pending_count(&self) -> Result<u64, AppError>;
}
