//! Error types for the binary codec

use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, EncodingError>;

/// Codec errors
///
/// Encode/decode failures are never retried or recovered internally: they
/// indicate either a programming error (unknown field) or genuinely invalid
/// input (out-of-range value), both of which require caller correction.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// Field name not present in the field registry
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Field code pair not present in the field registry
    #[error("Unknown field code: type {type_code}, field {field_code}")]
    UnknownFieldCode {
        /// Serialization type code
        type_code: u16,
        /// Field code within the type
        field_code: u16,
    },

    /// Transaction type name or code not in the closed dispatch table
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    /// Integer does not fit the field's fixed width
    #[error("Integer out of range for {width}-bit field: {value}")]
    IntegerOutOfRange {
        /// Field width in bits
        width: u32,
        /// Offending value
        value: u64,
    },

    /// Variable-length payload exceeds the three-byte length-prefix range
    #[error("Blob too long: {len} bytes (max 918744)")]
    BlobTooLong {
        /// Offending length
        len: usize,
    },

    /// Value is not valid hexadecimal
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Fixed-width value has the wrong length
    #[error("Wrong length: expected {expected} bytes, got {got}")]
    WrongLength {
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        got: usize,
    },

    /// Native amount outside `[0, 10^17]` drops, or exponent overflow
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    /// Issued-currency code is neither a 3-character code nor 40 hex chars
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    /// Issuer is missing, malformed, or the reserved zero account
    #[error("Invalid issuer: {0}")]
    InvalidIssuer(String),

    /// Decimal value cannot be represented in 16 significant digits
    #[error("Precision loss: {0}")]
    PrecisionLoss(String),

    /// Token issuance id is not a 48-character hex identifier
    #[error("Invalid issuance id: {0}")]
    InvalidIssuanceId(String),

    /// Token amount outside `[0, 2^63 - 1]`
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),

    /// Account address failed to decode
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] address_codec::AddressError),

    /// JSON value has the wrong shape for the field's type
    #[error("Malformed value: {0}")]
    MalformedValue(String),

    /// Parser ran past the end of the input
    #[error("Unexpected end of input at offset {0}")]
    UnexpectedEnd(usize),

    /// Failure annotated with the field that caused it
    #[error("Field {field}: {source}")]
    Field {
        /// Name of the offending field
        field: String,
        /// Underlying failure
        source: Box<EncodingError>,
    },
}

impl EncodingError {
    /// Annotate an error with the field name it occurred under.
    ///
    /// Already-annotated errors are passed through so the innermost field
    /// name wins.
    pub fn in_field(self, field: &str) -> Self {
        match self {
            EncodingError::Field { .. } => self,
            other => EncodingError::Field {
                field: field.to_string(),
                source: Box::new(other),
            },
        }
    }
}
