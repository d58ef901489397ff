//! Keel ledger client orchestration
//!
//! The outermost layer of the client library: a signing capability (trait +
//! in-process Ed25519 implementation), the async network-client boundary
//! with a canned-response mock, and the autofill/sign/submit pipeline over
//! the immutable model layer.
//!
//! Everything below the network trait is pure; the same transaction always
//! produces the same canonical bytes, signature payload, and hash, which is
//! what makes reliable-submission retries safe for callers that need them.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod network;
pub mod signing;
pub mod submit;

pub use config::{ClientConfig, FeeConfig};
pub use error::{ClientError, Result};
pub use network::{MockNetworkClient, NetworkClient};
pub use signing::{
    derive_address, multisign_entry, sign_transaction, verify_signature, Ed25519Signer,
    SigningCapability,
};
pub use submit::{autofill, sign_and_submit, submit, submit_blob};
