//! TrustSet: create, modify, or freeze a trust line

use crate::common::CommonFields;
use crate::flags::trust_set::{TF_CLEAR_FREEZE, TF_SET_FREEZE};
use binary_codec::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extend or adjust trust in an issued currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustSet {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Trust limit: issued amount naming currency, issuer, and ceiling
    pub limit_amount: Amount,
    /// Inbound quality as a ratio in parts-per-billion
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quality_in: Option<u32>,
    /// Outbound quality as a ratio in parts-per-billion
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quality_out: Option<u32>,
}

impl TrustSet {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        match &self.limit_amount {
            Amount::Issued(limit) => {
                if limit.issuer == self.common.account {
                    errors.insert("limit_amount".into(), "cannot extend trust to self".into());
                }
            }
            _ => {
                errors.insert(
                    "limit_amount".into(),
                    "trust lines denominate issued currencies, not the native currency".into(),
                );
            }
        }

        if let Some(flags) = self.common.flags {
            if flags.contains(TF_SET_FREEZE) && flags.contains(TF_CLEAR_FREEZE) {
                errors.insert(
                    "flags".into(),
                    "cannot set and clear freeze in the same transaction".into(),
                );
            }
        }
    }
}
