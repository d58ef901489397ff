//! AccountSet: modify the sending account's settings

use crate::common::CommonFields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transfer rate representing no fee; also the sentinel for clearing it.
pub const NO_TRANSFER_FEE: u32 = 1_000_000_000;
/// Largest allowed transfer rate (a 100% transfer fee).
pub const MAX_TRANSFER_RATE: u32 = 2_000_000_000;
/// Smallest meaningful tick size.
pub const MIN_TICK_SIZE: u8 = 3;
/// Largest allowed tick size.
pub const MAX_TICK_SIZE: u8 = 15;
/// Sentinel clearing the tick size.
pub const DISABLE_TICK_SIZE: u8 = 0;
/// Longest allowed domain, in bytes.
pub const MAX_DOMAIN_LENGTH: usize = 256;

/// Adjust account-level settings: flags, transfer rate, tick size, domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSet {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Account-setting value to enable
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub set_flag: Option<u32>,
    /// Account-setting value to disable
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub clear_flag: Option<u32>,
    /// Fee charged when this account's issued currencies change hands, in
    /// parts-per-billion; 0 or `NO_TRANSFER_FEE` means no fee
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transfer_rate: Option<u32>,
    /// Exchange-rate significant digits for this account's offers; 0 disables
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tick_size: Option<u8>,
    /// Hex-encoded domain name asserting account ownership
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub domain: Option<String>,
    /// Hash of an email address, for avatar lookup
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email_hash: Option<String>,
}

impl AccountSet {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        if let Some(rate) = self.transfer_rate {
            // 0 is the "no fee" sentinel and bypasses the range check
            if rate != 0 && !(NO_TRANSFER_FEE..=MAX_TRANSFER_RATE).contains(&rate) {
                errors.insert(
                    "transfer_rate".into(),
                    format!(
                        "must be 0 or between {} and {}",
                        NO_TRANSFER_FEE, MAX_TRANSFER_RATE
                    ),
                );
            }
        }

        if let Some(size) = self.tick_size {
            if size != DISABLE_TICK_SIZE && !(MIN_TICK_SIZE..=MAX_TICK_SIZE).contains(&size) {
                errors.insert(
                    "tick_size".into(),
                    format!(
                        "must be {} or between {} and {}",
                        DISABLE_TICK_SIZE, MIN_TICK_SIZE, MAX_TICK_SIZE
                    ),
                );
            }
        }

        if let (Some(set), Some(clear)) = (self.set_flag, self.clear_flag) {
            if set == clear {
                errors.insert(
                    "clear_flag".into(),
                    "cannot set and clear the same account setting".into(),
                );
            }
        }

        if let Some(domain) = &self.domain {
            match hex::decode(domain) {
                Ok(bytes) if bytes.len() <= MAX_DOMAIN_LENGTH => {
                    if bytes.iter().any(|b| b.is_ascii_uppercase()) {
                        errors.insert("domain".into(), "domain must be lowercase".into());
                    }
                }
                Ok(_) => {
                    errors.insert(
                        "domain".into(),
                        format!("cannot exceed {} bytes", MAX_DOMAIN_LENGTH),
                    );
                }
                Err(_) => {
                    errors.insert("domain".into(), "must be hex-encoded".into());
                }
            }
        }

        if let Some(hash) = &self.email_hash {
            if !crate::common::is_hex_of_len(hash, 32) {
                errors.insert(
                    "email_hash".into(),
                    "must be 32 hexadecimal characters".into(),
                );
            }
        }
    }
}
