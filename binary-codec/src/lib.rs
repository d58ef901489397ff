//! Keel canonical binary codec
//!
//! Deterministic, consensus-critical serialization of structured ledger
//! objects. Independent implementations must compute identical bytes over the
//! same logical data, so everything here is bit-exact by contract: field
//! emission order, type-length-value framing, and the amount bit layouts are
//! all pinned by fixture tests.
//!
//! # Architecture
//!
//! - **Field registry**: static name -> (type code, field code) table;
//!   read-only after first use
//! - **Primitive codecs**: fixed-width integers, length prefixes, hashes
//! - **Amount codec**: native / issued / token amounts behind one tagged union
//! - **Object codec**: canonical sort + recursive TLV emission
//! - **Binary parser**: the exact inverse, for decode/re-encode pipelines
//!
//! The codec is a pure transformation over immutable values: no locking, no
//! shared mutable state, safe to call concurrently.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod amount;
pub mod definitions;
pub mod error;
pub mod object;
pub mod parser;
pub mod primitives;

pub use amount::{
    drops_to_native, native_to_drops, Amount, IssuedAmount, MptAmount, DROPS_PER_NATIVE,
    MAX_DROPS, NATIVE_CODE,
};
pub use definitions::{lookup, lookup_by_code, FieldDescriptor};
pub use error::{EncodingError, Result};
pub use object::{encode, encode_for_signing};
pub use parser::{decode, BinaryParser};
