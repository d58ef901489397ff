//! Keel address codec
//!
//! Checksummed base58 encoding of 20-byte account identifiers. The alphabet,
//! version byte, and double-SHA-256 checksum together form the address format
//! used everywhere an account appears in human-readable form.
//!
//! Addresses are pure encodings of the account id payload; deriving the id
//! from a public key is the signing layer's concern.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod codec;
pub mod error;

pub use codec::{
    decode_account_id, encode_account_id, is_valid_address, ACCOUNT_ID_LEN, ACCOUNT_ONE,
    ACCOUNT_ZERO,
};
pub use error::{AddressError, Result};

/// Version byte prepended to account-id payloads before checksumming.
pub const ACCOUNT_ID_VERSION: u8 = 0x00;
