#![allow(dead_code)]

pub mod mocks;

use lariat::application::ports::{CacheStore, ConnectivitySource, OperationQueue, RemoteGateway};
use lariat::application::services::offline_service::OfflineService;
use lariat::application::services::sync_service::SyncService;
use lariat::domain::value_objects::Collection;
use lariat::infrastructure::connectivity::ConnectivityWatcher;
use lariat::infrastructure::offline::{SqliteCacheStore, SqliteOperationQueue};
use self::mocks::MockRemoteGateway;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;

pub struct SyncTestContext {
    pub pool: Pool<Sqlite>,
    pub queue: Arc<dyn OperationQueue>,
    pub cache: Arc<dyn CacheStore>,
    pub gateway: Arc<MockRemoteGateway>,
    pub connectivity: Arc<ConnectivityWatcher>,
    pub offline: Arc<OfflineService>,
    pub sync: Arc<SyncService>,
}

pub async fn setup() -> SyncTestContext {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    build_context(pool)
}

pub fn build_context(pool: Pool<Sqlite>) -> SyncTestContext {
    let queue: Arc<dyn OperationQueue> = Arc::new(SqliteOperationQueue::new(pool.clone()));
    let cache: Arc<dyn CacheStore> = Arc::new(SqliteCacheStore::new(pool.clone()));
    let gateway = Arc::new(MockRemoteGateway::new());
    let gateway_port: Arc<dyn RemoteGateway> = gateway.clone();
    let connectivity = Arc::new(ConnectivityWatcher::new(true));
    let connectivity_port: Arc<dyn ConnectivitySource> = connectivity.clone();

    let offline = Arc::new(OfflineService::new(
        Arc::clone(&queue),
        Arc::clone(&cache),
        Arc::clone(&gateway_port),
        Arc::clone(&connectivity_port),
    ));
    let sync = Arc::new(SyncService::new(
        Arc::clone(&queue),
        Arc::clone(&cache),
        gateway_port,
        connectivity_port,
        vec![Collection::leads(), Collection::customers()],
    ));

    SyncTestContext {
        pool,
        queue,
        cache,
        gateway,
        connectivity,
        offline,
        sync,
    }
}
