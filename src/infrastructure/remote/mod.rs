pub mod rest_gateway;

pub use rest_gateway::RestRemoteGateway;
