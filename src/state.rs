use crate::application::ports::{CacheStore, ConnectivitySource, OperationQueue, RemoteGateway};
use crate::application::services::offline_service::{OfflineService, OfflineServiceTrait};
use crate::application::services::sync_service::SyncService;
use crate::domain::value_objects::Collection;
use crate::infrastructure::connectivity::ConnectivityWatcher;
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::offline::{SqliteCacheStore, SqliteOperationQueue};
use crate::infrastructure::remote::RestRemoteGateway;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Composition root. Constructed once at application start and handed by
/// reference to whatever shell embeds the core; the queue and cache are
/// owned here, not ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: ConnectionPool,
    pub connectivity: Arc<ConnectivityWatcher>,
    pub offline_service: Arc<OfflineService>,
    pub sync_service: Arc<SyncService>,
    pub pipeline: Arc<crate::presentation::handlers::PipelineHandler>,
    pub registry: Arc<crate::presentation::handlers::RegistryHandler>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        config.validate().map_err(AppError::Configuration)?;

        let database_url = resolve_database_url(&config)?;
        let pool = ConnectionPool::new(&database_url, config.database.max_connections).await?;
        pool.migrate().await?;

        let queue: Arc<dyn OperationQueue> =
            Arc::new(SqliteOperationQueue::new(pool.get_pool().clone()));
        let cache: Arc<dyn CacheStore> = Arc::new(SqliteCacheStore::new(pool.get_pool().clone()));
        let gateway: Arc<dyn RemoteGateway> = Arc::new(RestRemoteGateway::new(&config.remote)?);

        let connectivity = Arc::new(ConnectivityWatcher::new(true));
        let connectivity_port: Arc<dyn ConnectivitySource> = connectivity.clone();

        let offline_service = Arc::new(OfflineService::new(
            Arc::clone(&queue),
            Arc::clone(&cache),
            Arc::clone(&gateway),
            Arc::clone(&connectivity_port),
        ));

        let collections = config
            .sync
            .collections
            .iter()
            .map(|name| Collection::new(name.clone()).map_err(AppError::Configuration))
            .collect::<Result<Vec<_>, _>>()?;
        let sync_service = Arc::new(SyncService::new(
            queue,
            cache,
            gateway,
            connectivity_port,
            collections,
        ));

        let service: Arc<dyn OfflineServiceTrait> = offline_service.clone();
        let pipeline = Arc::new(crate::presentation::handlers::PipelineHandler::new(
            Arc::clone(&service),
        ));
        let registry = Arc::new(crate::presentation::handlers::RegistryHandler::new(service));

        Ok(Self {
            config,
            pool,
            connectivity,
            offline_service,
            sync_service,
            pipeline,
            registry,
        })
    }

    /// Subscribe the replay driver to reconnect events. Returns `None` when
    /// auto-sync is disabled; aborting the handle cancels the subscription.
    pub fn start_reconnect_listener(&self) -> Option<JoinHandle<()>> {
        if !self.config.sync.auto_sync {
            return None;
        }
        Some(self.sync_service.spawn_reconnect_listener())
    }
}

fn resolve_database_url(config: &AppConfig) -> Result<String, AppError> {
    if !config.database.url.trim().is_empty() {
        return Ok(config.database.url.clone());
    }

    let data_dir = Path::new(&config.storage.data_dir);
    std::fs::create_dir_all(data_dir).map_err(|err| {
        AppError::Configuration(format!(
            "Cannot create data directory {}: {err}",
            data_dir.display()
        ))
    })?;
    Ok(format!(
        "sqlite:{}?mode=rwc",
        data_dir.join("lariat.db").display()
    ))
}
