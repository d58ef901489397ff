//! Error types for client operations

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (the only retry-worthy kind)
    #[error("Network error: {0}")]
    Network(String),

    /// Signing capability failure
    #[error("Signing error: {0}")]
    Signing(String),

    /// Canonical encoding failed
    #[error("Encoding error: {0}")]
    Encoding(#[from] binary_codec::EncodingError),

    /// Model construction or validation failed
    #[error("Model error: {0}")]
    Model(#[from] tx_models::ModelError),

    /// The server reply was missing an expected field
    #[error("Unexpected response shape: {0}")]
    Response(String),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}
