//! Flag normalization
//!
//! The public constructors accept three shapes for the same logical field: a
//! raw integer bitmask, a list of integers to OR together, or a symbolic
//! name -> bool map. All three normalize to one canonical `u32` immediately at
//! construction; only the canonical form is ever stored or serialized.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Transaction flags, stored canonically as one bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(pub u32);

/// Payment flags
pub mod payment {
    /// Do not use the default direct route
    pub const TF_NO_DIRECT_ROUTE: u32 = 0x0001_0000;
    /// Allow delivering less than the full amount
    pub const TF_PARTIAL_PAYMENT: u32 = 0x0002_0000;
    /// Only use paths at least as good as the direct quality
    pub const TF_LIMIT_QUALITY: u32 = 0x0004_0000;
}

/// Trust-line flags
pub mod trust_set {
    /// Authorize the counterparty to hold the issued currency
    pub const TF_SET_AUTH: u32 = 0x0001_0000;
    /// Freeze the trust line
    pub const TF_SET_FREEZE: u32 = 0x0010_0000;
    /// Unfreeze the trust line
    pub const TF_CLEAR_FREEZE: u32 = 0x0020_0000;
}

/// Offer flags
pub mod offer_create {
    /// Do not consume offers that exactly match
    pub const TF_PASSIVE: u32 = 0x0001_0000;
    /// Cancel any unfilled remainder immediately
    pub const TF_IMMEDIATE_OR_CANCEL: u32 = 0x0002_0000;
    /// Fill completely or cancel entirely
    pub const TF_FILL_OR_KILL: u32 = 0x0004_0000;
    /// Sell semantics: obtain the full TakerGets even at a better rate
    pub const TF_SELL: u32 = 0x0008_0000;
}

/// Account-setting values for `set_flag` / `clear_flag`
pub mod account_set {
    /// Require a destination tag on incoming payments
    pub const ASF_REQUIRE_DEST_TAG: u32 = 1;
    /// Require authorization for new trust lines
    pub const ASF_REQUIRE_AUTH: u32 = 2;
    /// Disallow incoming native-currency payments
    pub const ASF_DISALLOW_NATIVE: u32 = 3;
    /// Disable the master key pair
    pub const ASF_DISABLE_MASTER: u32 = 4;
    /// Track the hash of this account's most recent transaction
    pub const ASF_ACCOUNT_TXN_ID: u32 = 5;
    /// Permanently give up the ability to freeze
    pub const ASF_NO_FREEZE: u32 = 6;
    /// Freeze all trust lines issued by this account
    pub const ASF_GLOBAL_FREEZE: u32 = 7;
    /// Enable relaying by default on new trust lines
    pub const ASF_DEFAULT_RELAY: u32 = 8;
}

/// Symbolic flag names accepted in map form, across all transaction types.
/// Names are unique network-wide, so one flat table suffices.
const FLAG_NAMES: &[(&str, u32)] = &[
    ("tf_no_direct_route", payment::TF_NO_DIRECT_ROUTE),
    ("tf_partial_payment", payment::TF_PARTIAL_PAYMENT),
    ("tf_limit_quality", payment::TF_LIMIT_QUALITY),
    ("tf_set_auth", trust_set::TF_SET_AUTH),
    ("tf_set_freeze", trust_set::TF_SET_FREEZE),
    ("tf_clear_freeze", trust_set::TF_CLEAR_FREEZE),
    ("tf_passive", offer_create::TF_PASSIVE),
    ("tf_immediate_or_cancel", offer_create::TF_IMMEDIATE_OR_CANCEL),
    ("tf_fill_or_kill", offer_create::TF_FILL_OR_KILL),
    ("tf_sell", offer_create::TF_SELL),
];

impl Flags {
    /// Whether every bit in `mask` is set.
    pub fn contains(&self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    /// Whether no flag is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Normalize any accepted JSON shape into the canonical bitmask.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => {
                let raw = n
                    .as_u64()
                    .filter(|v| *v <= u32::MAX as u64)
                    .ok_or_else(|| format!("flag bitmask out of range: {}", n))?;
                Ok(Flags(raw as u32))
            }
            Value::Array(items) => {
                let mut mask = 0u32;
                for item in items {
                    let raw = item
                        .as_u64()
                        .filter(|v| *v <= u32::MAX as u64)
                        .ok_or_else(|| format!("flag list entry out of range: {}", item))?;
                    mask |= raw as u32;
                }
                Ok(Flags(mask))
            }
            Value::Object(map) => {
                let mut mask = 0u32;
                for (name, set) in map {
                    let bit = FLAG_NAMES
                        .iter()
                        .find(|(n, _)| *n == name.as_str())
                        .map(|(_, b)| *b)
                        .ok_or_else(|| format!("unknown flag name: {}", name))?;
                    if set.as_bool().ok_or_else(|| {
                        format!("flag {} must map to a boolean", name)
                    })? {
                        mask |= bit;
                    }
                }
                Ok(Flags(mask))
            }
            other => Err(format!("unsupported flags shape: {}", other)),
        }
    }
}

impl Serialize for Flags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for Flags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Flags::from_json(&value).map_err(D::Error::custom)
    }
}
