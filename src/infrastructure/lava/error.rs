use std::error::Error;
use std::fmt;

/// Represents errors that can occur when talking to a Lava node
#[derive(Debug)]
pub enum ChainClientError {
    /// Transport or HTTP status error
    HttpError(reqwest::Error),
    /// Response body was not the expected JSON
    JsonError(serde_json::Error),
    /// The node answered with a JSON-RPC error object
    RpcError(String),
    /// The response was well-formed but carried unusable data
    ParseError(String),
}

impl fmt::Display for ChainClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainClientError::HttpError(e) => write!(f, "HTTP error: {}", e),
            ChainClientError::JsonError(e) => write!(f, "JSON error: {}", e),
            ChainClientError::RpcError(msg) => write!(f, "RPC error: {}", msg),
            ChainClientError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl Error for ChainClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChainClientError::HttpError(e) => Some(e),
            ChainClientError::JsonError(e) => Some(e),
            ChainClientError::RpcError(_) => None,
            ChainClientError::ParseError(_) => None,
        }
    }
}

impl From<reqwest::Error> for ChainClientError {
    fn from(error: reqwest::Error) -> Self {
        ChainClientError::HttpError(error)
    }
}

impl From<serde_json::Error> for ChainClientError {
    fn from(error: serde_json::Error) -> Self {
        ChainClientError::JsonError(error)
    }
}
