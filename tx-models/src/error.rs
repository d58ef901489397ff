//! Error types for the model layer

use std::collections::BTreeMap;
use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Model errors
#[derive(Error, Debug)]
pub enum ModelError {
    /// One or more field or cross-field invariants were violated.
    ///
    /// Carries the full field-name -> message map so callers can surface
    /// every violation at once instead of stopping at the first.
    #[error("Validation failed: {}", format_errors(.0))]
    ValidationFailed(BTreeMap<String, String>),

    /// Discriminator does not match any known transaction type
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    /// Dictionary is missing the transaction-type discriminator
    #[error("Missing transaction type discriminator")]
    MissingTransactionType,

    /// The hash is only defined for signed transactions
    #[error("Cannot hash an unsigned transaction")]
    UnsignedTransaction,

    /// Canonical encoding failed
    #[error("Encoding error: {0}")]
    Encoding(#[from] binary_codec::EncodingError),

    /// Construction from a dictionary failed (missing or mistyped fields)
    #[error("Construction error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request or response envelope is malformed
    #[error("Malformed envelope: {0}")]
    Envelope(String),
}

fn format_errors(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}
