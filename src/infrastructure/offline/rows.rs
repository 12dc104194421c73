use crate::domain::entities::offline::{CollectionCacheStatus, QueuedOperation};
use crate::domain::value_objects::{Collection, OperationKind, OperationPayload, SequenceId};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use serde_json::Value;

#[derive(Debug, sqlx::FromRow)]
pub struct PendingOperationRow {
    pub id: i64,
    pub operation_kind: String,
    pub collection: String,
    pub payload: String,
    pub enqueued_at: i64,
}

impl PendingOperationRow {
    pub fn into_domain(self) -> Result<QueuedOperation, AppError> {
        let sequence_id = SequenceId::new(self.id).map_err(AppError::Deserialization)?;
        let kind = OperationKind::parse(&self.operation_kind).map_err(AppError::Deserialization)?;
        let collection = Collection::new(self.collection).map_err(AppError::Deserialization)?;
        let payload =
            OperationPayload::from_json_str(&self.payload).map_err(AppError::Deserialization)?;

        Ok(QueuedOperation::new(
            sequence_id,
            kind,
            collection,
            payload,
            timestamp_to_datetime(self.enqueued_at),
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct CachedRecordRow {
    pub data: String,
}

impl CachedRecordRow {
    pub fn into_document(self) -> Result<Value, AppError> {
        serde_json::from_str(&self.data).map_err(|err| AppError::Deserialization(err.to_string()))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct CacheMetadataRow {
    pub collection: String,
    pub last_refreshed_at: Option<i64>,
    pub record_count: i64,
}

impl CacheMetadataRow {
    pub fn into_domain(self) -> Result<CollectionCacheStatus, AppError> {
        Ok(CollectionCacheStatus {
            collection: Collection::new(self.collection).map_err(AppError::Deserialization)?,
            record_count: u64::try_from(self.record_count)
                .map_err(|_| AppError::Deserialization("record_count is negative".to_string()))?,
            last_refreshed_at: self.last_refreshed_at.map(timestamp_to_datetime),
        })
    }
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .or_else(|| DateTime::<Utc>::from_timestamp_millis(ts))
        .unwrap_or_else(Utc::now)
}
