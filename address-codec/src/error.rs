//! Error types for address encoding and decoding

use thiserror::Error;

/// Result type for address operations
pub type Result<T> = std::result::Result<T, AddressError>;

/// Address codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The string is not valid base58 or its checksum does not match
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The decoded payload has an unexpected version byte
    #[error("Invalid address version: expected {expected:#04x}, got {got:#04x}")]
    InvalidVersion {
        /// Expected version byte
        expected: u8,
        /// Version byte actually found
        got: u8,
    },

    /// The decoded payload has an unexpected length
    #[error("Invalid account id length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected payload length
        expected: usize,
        /// Actual payload length
        got: usize,
    },
}
