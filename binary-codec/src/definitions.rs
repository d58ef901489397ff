//! Field registry: the single source of truth for the wire format
//!
//! Every serializable field is described once in a static table mapping its
//! name to a serialization type code, a field code within that type, and
//! framing attributes. Emission order is the ascending `(type_code,
//! field_code)` sort key; the pair is unique by construction, so ordering is
//! total and ties are impossible.
//!
//! The table is const data indexed through `OnceLock` maps: initialized on
//! first use, immutable afterwards, with no runtime mutation path.

use crate::{EncodingError, Result};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Serialization type codes
pub mod type_codes {
    /// 16-bit unsigned integer
    pub const UINT16: u16 = 1;
    /// 32-bit unsigned integer
    pub const UINT32: u16 = 2;
    /// 64-bit unsigned integer
    pub const UINT64: u16 = 3;
    /// 128-bit hash
    pub const HASH128: u16 = 4;
    /// 256-bit hash
    pub const HASH256: u16 = 5;
    /// Amount (native, issued, or token)
    pub const AMOUNT: u16 = 6;
    /// Variable-length byte string
    pub const BLOB: u16 = 7;
    /// 160-bit account identifier
    pub const ACCOUNT_ID: u16 = 8;
    /// Nested object
    pub const OBJECT: u16 = 14;
    /// Array of nested objects
    pub const ARRAY: u16 = 15;
    /// 8-bit unsigned integer
    pub const UINT8: u16 = 16;
    /// 160-bit hash
    pub const HASH160: u16 = 17;
    /// Payment path set
    pub const PATH_SET: u16 = 18;
    /// 192-bit token issuance identifier
    pub const UINT192: u16 = 21;
}

use type_codes::*;

/// Immutable description of one wire-format field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Wire-format (PascalCase) field name
    pub name: &'static str,
    /// Serialization type code
    pub type_code: u16,
    /// Field code within the type
    pub field_code: u16,
    /// Whether the value is framed by a variable-length prefix
    pub is_vl_encoded: bool,
    /// Whether the field is covered by signing payloads
    pub is_signing: bool,
    /// Whether an empty value means "absent" and is omitted from the wire
    pub omit_when_empty: bool,
}

impl FieldDescriptor {
    /// Canonical emission sort key.
    pub fn sort_key(&self) -> (u16, u16) {
        (self.type_code, self.field_code)
    }

    /// Encode the 1-3 byte field-id header.
    ///
    /// Codes below 16 pack into a nibble; larger codes spill into trailing
    /// bytes with a zero nibble marking the spill.
    pub fn header(&self) -> Vec<u8> {
        let t = self.type_code;
        let f = self.field_code;
        match (t < 16, f < 16) {
            (true, true) => vec![((t as u8) << 4) | f as u8],
            (false, true) => vec![f as u8, t as u8],
            (true, false) => vec![(t as u8) << 4, f as u8],
            (false, false) => vec![0x00, t as u8, f as u8],
        }
    }
}

/// VL framing is a property of the serialization type.
const fn vl_for(type_code: u16) -> bool {
    matches!(type_code, BLOB | ACCOUNT_ID)
}

const fn field(name: &'static str, type_code: u16, field_code: u16) -> FieldDescriptor {
    FieldDescriptor {
        name,
        type_code,
        field_code,
        is_vl_encoded: vl_for(type_code),
        is_signing: true,
        omit_when_empty: false,
    }
}

/// A field excluded from signing payloads (signature material itself).
const fn non_signing(name: &'static str, type_code: u16, field_code: u16) -> FieldDescriptor {
    FieldDescriptor {
        name,
        type_code,
        field_code,
        is_vl_encoded: vl_for(type_code),
        is_signing: false,
        omit_when_empty: false,
    }
}

/// A field whose empty value is the wire-format absent sentinel.
const fn omit_empty(name: &'static str, type_code: u16, field_code: u16) -> FieldDescriptor {
    FieldDescriptor {
        name,
        type_code,
        field_code,
        is_vl_encoded: vl_for(type_code),
        is_signing: true,
        omit_when_empty: true,
    }
}

/// The static field-definitions table.
pub const FIELDS: &[FieldDescriptor] = &[
    // UInt16
    field("TransactionType", UINT16, 2),
    field("SignerWeight", UINT16, 3),
    field("TradingFee", UINT16, 4),
    // UInt32
    field("NetworkID", UINT32, 1),
    field("Flags", UINT32, 2),
    field("SourceTag", UINT32, 3),
    field("Sequence", UINT32, 4),
    field("Expiration", UINT32, 10),
    field("TransferRate", UINT32, 11),
    field("DestinationTag", UINT32, 14),
    field("QualityIn", UINT32, 20),
    field("QualityOut", UINT32, 21),
    field("OfferSequence", UINT32, 25),
    field("LastLedgerSequence", UINT32, 27),
    field("SetFlag", UINT32, 33),
    field("ClearFlag", UINT32, 34),
    field("SignerQuorum", UINT32, 35),
    field("CancelAfter", UINT32, 36),
    field("FinishAfter", UINT32, 37),
    // UInt64
    field("MaximumAmount", UINT64, 24),
    // Hash128
    field("EmailHash", HASH128, 1),
    // Hash256
    field("AccountTxnID", HASH256, 9),
    field("InvoiceID", HASH256, 17),
    field("DomainID", HASH256, 34),
    // Amount
    field("Amount", AMOUNT, 1),
    field("LimitAmount", AMOUNT, 3),
    field("TakerPays", AMOUNT, 4),
    field("TakerGets", AMOUNT, 5),
    field("Fee", AMOUNT, 8),
    field("SendMax", AMOUNT, 9),
    field("DeliverMin", AMOUNT, 10),
    field("Amount2", AMOUNT, 11),
    // Blob
    field("PublicKey", BLOB, 1),
    field("SigningPubKey", BLOB, 3),
    non_signing("TxnSignature", BLOB, 4),
    omit_empty("URI", BLOB, 5),
    non_signing("Signature", BLOB, 6),
    omit_empty("Domain", BLOB, 7),
    field("MemoType", BLOB, 12),
    field("MemoData", BLOB, 13),
    field("MemoFormat", BLOB, 14),
    field("Fulfillment", BLOB, 16),
    field("Condition", BLOB, 17),
    field("CredentialType", BLOB, 31),
    // AccountID
    field("Account", ACCOUNT_ID, 1),
    field("Owner", ACCOUNT_ID, 2),
    field("Destination", ACCOUNT_ID, 3),
    field("Issuer", ACCOUNT_ID, 4),
    field("Authorize", ACCOUNT_ID, 5),
    field("Unauthorize", ACCOUNT_ID, 6),
    // Object
    field("ObjectEndMarker", OBJECT, 1),
    field("Memo", OBJECT, 10),
    field("SignerEntry", OBJECT, 11),
    field("Signer", OBJECT, 16),
    field("Credential", OBJECT, 33),
    // Array
    field("ArrayEndMarker", ARRAY, 1),
    non_signing("Signers", ARRAY, 3),
    field("SignerEntries", ARRAY, 4),
    field("Memos", ARRAY, 9),
    field("AuthorizeCredentials", ARRAY, 26),
    field("UnauthorizeCredentials", ARRAY, 27),
    field("AcceptedCredentials", ARRAY, 28),
    // UInt8
    field("TickSize", UINT8, 16),
    field("AssetScale", UINT8, 19),
    // Hash160 (ledger-entry keys for order books)
    field("TakerPaysCurrency", HASH160, 1),
    field("TakerPaysIssuer", HASH160, 2),
    field("TakerGetsCurrency", HASH160, 3),
    field("TakerGetsIssuer", HASH160, 4),
    // PathSet
    field("Paths", PATH_SET, 1),
    // UInt192
    field("MPTokenIssuanceID", UINT192, 1),
];

/// Transaction type discriminator table: wire name to 16-bit code.
pub const TRANSACTION_TYPES: &[(&str, u16)] = &[
    ("Payment", 0),
    ("EscrowCreate", 1),
    ("EscrowFinish", 2),
    ("AccountSet", 3),
    ("EscrowCancel", 4),
    ("OfferCreate", 7),
    ("SignerListSet", 12),
    ("DepositPreauth", 19),
    ("TrustSet", 20),
    ("AccountDelete", 21),
    ("AMMCreate", 35),
    ("MPTokenIssuanceCreate", 54),
    ("PermissionedDomainSet", 62),
    ("PermissionedDomainDelete", 63),
];

fn by_name() -> &'static HashMap<&'static str, &'static FieldDescriptor> {
    static INDEX: OnceLock<HashMap<&'static str, &'static FieldDescriptor>> = OnceLock::new();
    INDEX.get_or_init(|| FIELDS.iter().map(|f| (f.name, f)).collect())
}

fn by_code() -> &'static HashMap<(u16, u16), &'static FieldDescriptor> {
    static INDEX: OnceLock<HashMap<(u16, u16), &'static FieldDescriptor>> = OnceLock::new();
    INDEX.get_or_init(|| FIELDS.iter().map(|f| (f.sort_key(), f)).collect())
}

/// Look up a field by its wire-format name.
pub fn lookup(name: &str) -> Result<&'static FieldDescriptor> {
    by_name()
        .get(name)
        .copied()
        .ok_or_else(|| EncodingError::UnknownField(name.to_string()))
}

/// Look up a field by its `(type_code, field_code)` pair.
pub fn lookup_by_code(type_code: u16, field_code: u16) -> Result<&'static FieldDescriptor> {
    by_code()
        .get(&(type_code, field_code))
        .copied()
        .ok_or(EncodingError::UnknownFieldCode {
            type_code,
            field_code,
        })
}

/// Resolve a transaction type name to its discriminator code.
pub fn transaction_type_code(name: &str) -> Result<u16> {
    TRANSACTION_TYPES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
        .ok_or_else(|| EncodingError::UnknownTransactionType(name.to_string()))
}

/// Resolve a transaction type discriminator code back to its name.
pub fn transaction_type_name(code: u16) -> Result<&'static str> {
    TRANSACTION_TYPES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(n, _)| *n)
        .ok_or_else(|| EncodingError::UnknownTransactionType(code.to_string()))
}
