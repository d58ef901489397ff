//! AccountDelete: remove an account, sending its remaining balance onward

use crate::common::CommonFields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Delete the sending account and transfer its reserve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDelete {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Account receiving the deleted account's remaining balance
    pub destination: String,
    /// Receiver-side classifier
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub destination_tag: Option<u32>,
}

impl AccountDelete {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        if !address_codec::is_valid_address(&self.destination) {
            errors.insert("destination".into(), "invalid destination address".into());
        } else if self.destination == self.common.account {
            errors.insert(
                "destination".into(),
                "an account cannot be deleted into itself".into(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::Transaction;

    #[test]
    fn test_valid_account_delete() {
        let tx = AccountDelete {
            common: CommonFields::new(address_codec::ACCOUNT_ZERO),
            destination: address_codec::ACCOUNT_ONE.into(),
            destination_tag: Some(7),
        };
        assert!(Transaction::AccountDelete(tx).is_valid());
    }

    #[test]
    fn test_self_destination_rejected() {
        let tx = AccountDelete {
            common: CommonFields::new(address_codec::ACCOUNT_ONE),
            destination: address_codec::ACCOUNT_ONE.into(),
            destination_tag: None,
        };
        assert!(Transaction::AccountDelete(tx)
            .get_errors()
            .contains_key("destination"));
    }
}
