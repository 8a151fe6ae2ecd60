pub mod client;
mod error;
mod rpc_client;
mod types;

pub use client::ChainClient;
pub use error::ChainClientError;
pub use rpc_client::LavaRpcClient;
