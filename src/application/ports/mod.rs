pub mod cache_store;
pub mod connectivity;
pub mod operation_queue;
pub mod remote_gateway;

pub use cache_store::CacheStore;
pub use connectivity::ConnectivitySource;
pub use operation_queue::OperationQueue;
pub use remote_gateway::RemoteGateway;
