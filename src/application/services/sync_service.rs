use crate::application::ports::{CacheStore, ConnectivitySource, OperationQueue, RemoteGateway};
use crate::domain::entities::offline::{DrainReport, QueuedOperation};
use crate::domain::value_objects::{Collection, OperationKind, RecordId};
use crate::shared::error::AppError;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Draining,
    Refreshing,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    pub pending_operations: u64,
    pub last_sync: Option<i64>,
    pub sync_errors: u32,
}

/// Application-level notification consumed by views to re-render after a
/// successful drain+refresh cycle.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    Completed(DrainReport),
}

enum ReplayOutcome {
    Applied,
    Conflict(String),
}

struct CycleOutcome {
    report: DrainReport,
    completed: bool,
}

/// Drives the offline-to-online transition: drain the queue in sequence
/// order, then refresh the cache from remote. Purely event-driven; one
/// cycle per reconnect signal, no polling.
pub struct SyncService {
    queue: Arc<dyn OperationQueue>,
    cache: Arc<dyn CacheStore>,
    gateway: Arc<dyn RemoteGateway>,
    connectivity: Arc<dyn ConnectivitySource>,
    collections: Vec<Collection>,
    status: Arc<RwLock<SyncStatus>>,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncService {
    pub fn new(
        queue: Arc<dyn OperationQueue>,
        cache: Arc<dyn CacheStore>,
        gateway: Arc<dyn RemoteGateway>,
        connectivity: Arc<dyn ConnectivitySource>,
        collections: Vec<Collection>,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            queue,
            cache,
            gateway,
            connectivity,
            collections,
            status: Arc::new(RwLock::new(SyncStatus {
                phase: SyncPhase::Idle,
                pending_operations: 0,
                last_sync: None,
                sync_errors: 0,
            })),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub async fn get_status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// One drain+refresh cycle. A cycle already in flight makes this a
    /// no-op; overlapping reconnect signals collapse into one pass.
    pub async fn run_cycle(&self) -> Result<DrainReport, AppError> {
        {
            let mut status = self.status.write().await;
            if status.phase != SyncPhase::Idle {
                return Ok(DrainReport::default());
            }
            status.phase = SyncPhase::Draining;
        }

        let result = self.drain_and_refresh().await;

        let mut status = self.status.write().await;
        status.phase = SyncPhase::Idle;
        match result {
            Ok(outcome) => {
                status.pending_operations = u64::from(outcome.report.pending_count);
                if outcome.completed {
                    status.last_sync = Some(Utc::now().timestamp());
                }
                Ok(outcome.report)
            }
            Err(err) => {
                status.sync_errors += 1;
                Err(err)
            }
        }
    }

    /// Listen for offline-to-online transitions and run a cycle on each.
    /// Dropping or aborting the returned handle cancels the subscription.
    pub fn spawn_reconnect_listener(&self) -> JoinHandle<()> {
        let service = self.clone();
        let mut signal = service.connectivity.watch();
        tokio::spawn(async move {
            while signal.changed().await.is_ok() {
                let online = *signal.borrow_and_update();
                if !online {
                    continue;
                }
                if let Err(err) = service.run_cycle().await {
                    warn!("sync cycle failed: {err}");
                }
            }
            debug!("reconnect listener terminated");
        })
    }

    async fn drain_and_refresh(&self) -> Result<CycleOutcome, AppError> {
        let (mut report, halted) = self.drain().await?;
        report.pending_count = u32::try_from(self.queue.pending_count().await?)
            .map_err(|_| AppError::Internal("Pending count overflowed u32".to_string()))?;

        if halted {
            info!(
                pending = report.pending_count,
                "connectivity lost mid-drain, leaving the remainder queued"
            );
            return Ok(CycleOutcome {
                report,
                completed: false,
            });
        }

        {
            self.status.write().await.phase = SyncPhase::Refreshing;
        }

        match self.refresh().await {
            Ok(()) => {
                info!(
                    replayed = report.replayed_count,
                    conflicts = report.conflict_count,
                    "sync cycle completed"
                );
                let _ = self.events.send(SyncEvent::Completed(report.clone()));
                Ok(CycleOutcome {
                    report,
                    completed: true,
                })
            }
            Err(err) if err.is_network() => {
                debug!("refresh interrupted by connectivity loss");
                Ok(CycleOutcome {
                    report,
                    completed: false,
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn drain(&self) -> Result<(DrainReport, bool), AppError> {
        let mut report = DrainReport::default();
        let mut remap: HashMap<String, i64> = HashMap::new();

        for collection in &self.collections {
            let pending = self.queue.list_pending(collection).await?;
            for operation in pending {
                match self.replay(&operation, &mut remap).await {
                    Ok(ReplayOutcome::Applied) => {
                        self.queue.remove(operation.sequence_id).await?;
                        report.replayed_count += 1;
                    }
                    Ok(ReplayOutcome::Conflict(reason)) => {
                        // Skip-and-continue: the entry can never succeed on a
                        // later pass either, so it is removed rather than
                        // left to wedge the queue.
                        warn!(
                            sequence_id = %operation.sequence_id,
                            %reason,
                            "remote rejected queued operation, dropping it"
                        );
                        self.queue.remove(operation.sequence_id).await?;
                        report.conflict_count += 1;
                    }
                    Err(err) if err.is_network() => {
                        report.remapped_ids = remap;
                        return Ok((report, true));
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        report.remapped_ids = remap;
        Ok((report, false))
    }

    async fn replay(
        &self,
        operation: &QueuedOperation,
        remap: &mut HashMap<String, i64>,
    ) -> Result<ReplayOutcome, AppError> {
        let target = operation
            .payload
            .record_id()
            .map_err(AppError::Validation)?;

        let result = match operation.kind {
            OperationKind::Insert => {
                match self
                    .gateway
                    .insert(&operation.collection, &operation.payload.without_id())
                    .await
                {
                    Ok(record) => {
                        if let RecordId::Phantom(placeholder) = &target {
                            match RecordId::from_document(&record) {
                                Ok(RecordId::Remote(assigned)) => {
                                    remap.insert(placeholder.clone(), assigned);
                                }
                                _ => {
                                    warn!(
                                        sequence_id = %operation.sequence_id,
                                        "remote create returned no usable id"
                                    );
                                }
                            }
                        }
                        Ok(())
                    }
                    Err(err) => Err(err),
                }
            }
            OperationKind::Update => {
                let id = match &target {
                    RecordId::Phantom(placeholder) => match remap.get(placeholder) {
                        Some(assigned) => RecordId::Remote(*assigned),
                        None => {
                            // The create this update depends on was rejected
                            // earlier in the pass; there is no remote row to
                            // patch.
                            return Ok(ReplayOutcome::Conflict(format!(
                                "update targets placeholder {placeholder} with no assigned id"
                            )));
                        }
                    },
                    RecordId::Remote(_) => target.clone(),
                };
                self.gateway
                    .update(&operation.collection, &id, &operation.payload.without_id())
                    .await
            }
        };

        match result {
            Ok(()) => Ok(ReplayOutcome::Applied),
            Err(AppError::Rejected(reason)) => Ok(ReplayOutcome::Conflict(reason)),
            Err(err) => Err(err),
        }
    }

    async fn refresh(&self) -> Result<(), AppError> {
        let fetches = self.collections.iter().map(|collection| {
            let gateway = Arc::clone(&self.gateway);
            async move {
                let records = gateway.select_all(collection).await?;
                Ok::<_, AppError>((collection.clone(), records))
            }
        });

        let snapshots = futures::future::try_join_all(fetches).await?;
        for (collection, records) in snapshots {
            self.cache.refresh_all(&collection, records).await?;
        }
        Ok(())
    }
}

impl Clone for SyncService {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            cache: self.cache.clone(),
            gateway: self.gateway.clone(),
            connectivity: self.connectivity.clone(),
            collections: self.collections.clone(),
            status: self.status.clone(),
            events: self.events.clone(),
        }
    }
}
