pub mod rows;
pub mod sqlite_cache_store;
pub mod sqlite_operation_queue;

pub use sqlite_cache_store::SqliteCacheStore;
pub use sqlite_operation_queue::SqliteOperationQueue;
