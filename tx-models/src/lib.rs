//! Keel transaction and request models
//!
//! The model layer on top of the canonical codec: a closed set of
//! transaction types with per-type validation predicates, request/response
//! envelopes with the same validate-then-serialize discipline, flag
//! normalization, the snake/Pascal wire-name mapping, and transaction
//! hashing.
//!
//! # Validation
//!
//! Validation is data, not control flow: `get_errors()` returns the full
//! field-name -> message map so callers can present every violation at once.
//! Construction-time failures (missing required fields, mistyped values) are
//! errors immediately, since there is no partially-valid object to return.
//!
//! Models are immutable values; all layers here are pure and safe to use
//! concurrently without coordination.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod case;
pub mod common;
pub mod error;
pub mod flags;
pub mod hashing;
pub mod requests;
pub mod response;
pub mod transactions;
pub mod wire;

pub use common::{
    CommonFields, Credential, CredentialWrapper, Memo, MemoWrapper, Signer, SignerEntry,
    SignerEntryWrapper, SignerWrapper,
};
pub use error::{ModelError, Result};
pub use flags::Flags;
pub use requests::{LedgerIndex, Request};
pub use response::{Response, ResponseStatus};
pub use transactions::Transaction;
