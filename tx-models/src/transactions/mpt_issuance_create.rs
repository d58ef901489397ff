//! MPTokenIssuanceCreate: define a new multi-purpose token issuance

use crate::common::CommonFields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest meaningful asset scale (decimal places of the base unit).
pub const MAX_ASSET_SCALE: u8 = 19;

/// Create a token issuance identified by an issuance id rather than a
/// currency/issuer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MptIssuanceCreate {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Decimal places relating base units to standard units
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub asset_scale: Option<u8>,
    /// Cap on the outstanding amount, as a decimal string
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub maximum_amount: Option<String>,
}

impl MptIssuanceCreate {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        if let Some(scale) = self.asset_scale {
            if scale > MAX_ASSET_SCALE {
                errors.insert(
                    "asset_scale".into(),
                    format!("cannot exceed {}", MAX_ASSET_SCALE),
                );
            }
        }
        if let Some(max) = &self.maximum_amount {
            match max.parse::<u64>() {
                Ok(v) if v <= i64::MAX as u64 => {}
                _ => {
                    errors.insert(
                        "maximum_amount".into(),
                        "must be an integer within the 63-bit range".into(),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::Transaction;

    fn base() -> MptIssuanceCreate {
        MptIssuanceCreate {
            common: CommonFields::new(address_codec::ACCOUNT_ONE),
            asset_scale: Some(6),
            maximum_amount: Some("1000000000".into()),
        }
    }

    #[test]
    fn test_valid_issuance() {
        assert!(Transaction::MptIssuanceCreate(base()).is_valid());
    }

    #[test]
    fn test_asset_scale_bound() {
        let mut tx = base();
        tx.asset_scale = Some(MAX_ASSET_SCALE + 1);
        assert!(Transaction::MptIssuanceCreate(tx)
            .get_errors()
            .contains_key("asset_scale"));
    }

    #[test]
    fn test_maximum_amount_range() {
        let mut tx = base();
        tx.maximum_amount = Some("9223372036854775807".into());
        assert!(Transaction::MptIssuanceCreate(tx.clone()).is_valid());

        tx.maximum_amount = Some("9223372036854775808".into());
        assert!(Transaction::MptIssuanceCreate(tx.clone())
            .get_errors()
            .contains_key("maximum_amount"));

        tx.maximum_amount = Some("-1".into());
        assert!(Transaction::MptIssuanceCreate(tx)
            .get_errors()
            .contains_key("maximum_amount"));
    }
}
