use super::rows::PendingOperationRow;
use crate::application::ports::operation_queue::OperationQueue;
use crate::domain::entities::offline::{QueuedOperation, QueuedOperationDraft};
use crate::domain::value_objects::{Collection, SequenceId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Sqlite};

pub struct SqliteOperationQueue {
    pool: Pool<Sqlite>,
}

impl SqliteOperationQueue {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OperationQueue for SqliteOperationQueue {
    async fn enqueue(&self, draft: QueuedOperationDraft) -> Result<SequenceId, AppError> {
        let payload = serde_json::to_string(draft.payload.as_json())?;
        let enqueued_at = Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO pending_operations (operation_kind, collection, payload, enqueued_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(draft.kind.as_str())
        .bind(draft.collection.as_str())
        .bind(&payload)
        .bind(enqueued_at)
        .execute(&self.pool)
        .await?;

        SequenceId::new(result.last_insert_rowid()).map_err(AppError::Internal)
    }

    async fn list_pending(
        &self,
        collection: &Collection,
    ) -> Result<Vec<QueuedOperation>, AppError> {
        let rows = sqlx::query_as::<_, PendingOperationRow>(
            r#"
            SELECT id, operation_kind, collection, payload, enqueued_at
            FROM pending_operations
            WHERE collection = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(PendingOperationRow::into_domain)
            .collect()
    }

    async fn remove(&self, sequence_id: SequenceId) -> Result<(), AppError> {
        sqlx::query("DELETE FROM pending_operations WHERE id = ?1")
            .bind(sequence_id.value())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn pending_count(&self) -> Result<u64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pending_operations")
            .fetch_one(&self.pool)
            .await?;
        u64::try_from(count).map_err(|_| AppError::Internal("Negative queue count".to_string()))
    }
}
