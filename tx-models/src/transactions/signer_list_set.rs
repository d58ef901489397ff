//! SignerListSet: attach or remove a multi-signing list

use crate::common::{CommonFields, SignerEntryWrapper};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Most entries a signer list may hold.
pub const MAX_SIGNER_ENTRIES: usize = 32;

/// Replace the account's signer list, or delete it with a zero quorum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerListSet {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Signature weight that must be met or exceeded; 0 deletes the list
    pub signer_quorum: u32,
    /// Participant entries; absent when deleting
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signer_entries: Option<Vec<SignerEntryWrapper>>,
}

impl SignerListSet {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        // Quorum 0 deletes the list; entries are meaningless alongside it
        if self.signer_quorum == 0 {
            if self.signer_entries.is_some() {
                errors.insert(
                    "signer_entries".into(),
                    "must be absent when deleting the signer list".into(),
                );
            }
            return;
        }

        let entries = match &self.signer_entries {
            Some(entries) => entries,
            None => {
                errors.insert(
                    "signer_entries".into(),
                    "required when setting a signer list".into(),
                );
                return;
            }
        };

        if entries.is_empty() || entries.len() > MAX_SIGNER_ENTRIES {
            errors.insert(
                "signer_entries".into(),
                format!("must have 1 to {} entries", MAX_SIGNER_ENTRIES),
            );
            return;
        }

        let mut seen = HashSet::new();
        let mut weight_sum: u64 = 0;
        for wrapper in entries {
            let entry = &wrapper.signer_entry;
            if !address_codec::is_valid_address(&entry.account) {
                errors.insert(
                    "signer_entries".into(),
                    "entry account is not a valid address".into(),
                );
                return;
            }
            if entry.account == self.common.account {
                errors.insert(
                    "signer_entries".into(),
                    "the owner cannot appear in its own signer list".into(),
                );
                return;
            }
            if !seen.insert(&entry.account) {
                errors.insert("signer_entries".into(), "duplicate entry account".into());
                return;
            }
            weight_sum += entry.signer_weight as u64;
        }

        if weight_sum < self.signer_quorum as u64 {
            errors.insert(
                "signer_quorum".into(),
                "exceeds the sum of signer weights".into(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SignerEntry;
    use crate::transactions::Transaction;

    fn entry(account: &str, weight: u16) -> SignerEntryWrapper {
        SignerEntryWrapper {
            signer_entry: SignerEntry {
                account: account.into(),
                signer_weight: weight,
            },
        }
    }

    fn base() -> SignerListSet {
        SignerListSet {
            common: CommonFields::new(address_codec::ACCOUNT_ZERO),
            signer_quorum: 2,
            signer_entries: Some(vec![
                entry(address_codec::ACCOUNT_ONE, 1),
                entry("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh", 1),
            ]),
        }
    }

    #[test]
    fn test_valid_signer_list() {
        assert!(Transaction::SignerListSet(base()).is_valid());
    }

    #[test]
    fn test_delete_requires_no_entries() {
        let mut tx = base();
        tx.signer_quorum = 0;
        assert!(Transaction::SignerListSet(tx.clone())
            .get_errors()
            .contains_key("signer_entries"));

        tx.signer_entries = None;
        assert!(Transaction::SignerListSet(tx).is_valid());
    }

    #[test]
    fn test_owner_excluded() {
        let mut tx = base();
        tx.signer_entries
            .as_mut()
            .unwrap()
            .push(entry(address_codec::ACCOUNT_ZERO, 1));
        assert!(Transaction::SignerListSet(tx)
            .get_errors()
            .contains_key("signer_entries"));
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let mut tx = base();
        tx.signer_entries = Some(vec![
            entry(address_codec::ACCOUNT_ONE, 1),
            entry(address_codec::ACCOUNT_ONE, 2),
        ]);
        assert!(Transaction::SignerListSet(tx)
            .get_errors()
            .contains_key("signer_entries"));
    }

    #[test]
    fn test_quorum_unreachable_rejected() {
        let mut tx = base();
        tx.signer_quorum = 3;
        assert!(Transaction::SignerListSet(tx)
            .get_errors()
            .contains_key("signer_quorum"));
    }
}
