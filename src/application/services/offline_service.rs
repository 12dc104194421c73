use crate::application::ports::{CacheStore, ConnectivitySource, OperationQueue, RemoteGateway};
use crate::domain::entities::offline::{CacheStatusSnapshot, QueuedOperation, QueuedOperationDraft};
use crate::domain::value_objects::{
    Collection, OperationKind, OperationPayload, RecordId, SequenceId,
};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// How a submitted mutation ended up. `SavedOnDevice` is a success from the
/// user's point of view ("saved on device, will sync later"), not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Synced { record: Value },
    SavedOnDevice { record_id: RecordId, sequence_id: SequenceId },
}

#[async_trait]
pub trait OfflineServiceTrait: Send + Sync {
    async fn submit_insert(
        &self,
        collection: Collection,
        payload: OperationPayload,
    ) -> Result<WriteOutcome, AppError>;

    async fn submit_update(
        &self,
        collection: Collection,
        payload: OperationPayload,
    ) -> Result<WriteOutcome, AppError>;

    async fn submit_delete(&self, collection: Collection, id: RecordId) -> Result<(), AppError>;

    /// Remote snapshot (refreshing the cache) or, when the fetch fails on a
    /// network error, the cached snapshot; queued operations overlaid in
    /// sequence order either way.
    async fn merged_view(&self, collection: Collection) -> Result<Vec<Value>, AppError>;

    async fn cache_status(&self) -> Result<CacheStatusSnapshot, AppError>;
}

pub struct OfflineService {
    queue: Arc<dyn OperationQueue>,
    cache: Arc<dyn CacheStore>,
    gateway: Arc<dyn RemoteGateway>,
    connectivity: Arc<dyn ConnectivitySource>,
}

impl OfflineService {
    pub fn new(
        queue: Arc<dyn OperationQueue>,
        cache: Arc<dyn CacheStore>,
        gateway: Arc<dyn RemoteGateway>,
        connectivity: Arc<dyn ConnectivitySource>,
    ) -> Self {
        Self {
            queue,
            cache,
            gateway,
            connectivity,
        }
    }

    async fn defer(
        &self,
        kind: OperationKind,
        collection: Collection,
        payload: OperationPayload,
    ) -> Result<WriteOutcome, AppError> {
        let record_id = payload.record_id().map_err(AppError::Validation)?;
        let draft = QueuedOperationDraft::new(kind, collection.clone(), payload);
        let sequence_id = self.queue.enqueue(draft).await?;
        info!(
            collection = %collection,
            record_id = %record_id,
            sequence_id = %sequence_id,
            "saved on device, will sync later"
        );
        Ok(WriteOutcome::SavedOnDevice {
            record_id,
            sequence_id,
        })
    }
}

#[async_trait]
impl OfflineServiceTrait for OfflineService {
    async fn submit_insert(
        &self,
        collection: Collection,
        payload: OperationPayload,
    ) -> Result<WriteOutcome, AppError> {
        if !self.connectivity.is_online() {
            return self.defer(OperationKind::Insert, collection, payload).await;
        }

        match self.gateway.insert(&collection, &payload.without_id()).await {
            Ok(record) => Ok(WriteOutcome::Synced { record }),
            Err(err) if err.is_network() => {
                self.defer(OperationKind::Insert, collection, payload).await
            }
            Err(err) => Err(err),
        }
    }

    async fn submit_update(
        &self,
        collection: Collection,
        payload: OperationPayload,
    ) -> Result<WriteOutcome, AppError> {
        let id = payload.record_id().map_err(AppError::Validation)?;

        if !self.connectivity.is_online() {
            return self.defer(OperationKind::Update, collection, payload).await;
        }

        match self
            .gateway
            .update(&collection, &id, &payload.without_id())
            .await
        {
            Ok(()) => Ok(WriteOutcome::Synced {
                record: payload.into_inner(),
            }),
            Err(err) if err.is_network() => {
                self.defer(OperationKind::Update, collection, payload).await
            }
            Err(err) => Err(err),
        }
    }

    async fn submit_delete(&self, collection: Collection, id: RecordId) -> Result<(), AppError> {
        if !self.connectivity.is_online() {
            return Err(AppError::RequiresConnection(
                "Deleting requires a connection and is not queued offline".to_string(),
            ));
        }
        self.gateway.delete(&collection, &id).await
    }

    async fn merged_view(&self, collection: Collection) -> Result<Vec<Value>, AppError> {
        let mut records = match self.gateway.select_all(&collection).await {
            Ok(records) => {
                self.cache.refresh_all(&collection, records.clone()).await?;
                records
            }
            Err(err) if err.is_network() => {
                debug!(collection = %collection, "remote fetch failed, serving cached snapshot");
                self.cache.read_all(&collection).await?
            }
            Err(err) => return Err(err),
        };

        let pending = self.queue.list_pending(&collection).await?;
        overlay_pending(&mut records, &pending);
        Ok(records)
    }

    async fn cache_status(&self) -> Result<CacheStatusSnapshot, AppError> {
        self.cache.status().await
    }
}

/// Apply queued operations over a snapshot in ascending sequence order.
/// Later operations win, which keeps the user's latest unsynced intent on
/// top of whatever the remote returned.
pub fn overlay_pending(records: &mut Vec<Value>, pending: &[QueuedOperation]) {
    for operation in pending {
        let target = match operation.payload.record_id() {
            Ok(id) => id,
            Err(_) => continue,
        };
        match operation.kind {
            OperationKind::Insert => {
                if find_record(records, &target).is_none() {
                    records.push(operation.payload.as_json().clone());
                }
            }
            OperationKind::Update => {
                if let Some(index) = find_record(records, &target) {
                    merge_fields(&mut records[index], operation.payload.as_json());
                } else {
                    debug!(record_id = %target, "queued update targets no known record");
                }
            }
        }
    }
}

fn find_record(records: &[Value], id: &RecordId) -> Option<usize> {
    records
        .iter()
        .position(|record| matches!(RecordId::from_document(record), Ok(found) if found == *id))
}

fn merge_fields(record: &mut Value, patch: &Value) {
    if let (Value::Object(base), Value::Object(fields)) = (record, patch) {
        for (key, value) in fields {
            base.insert(key.clone(), value.clone());
        }
    }
}
