//! Permissioned domains: credential-gated membership sets

use crate::common::{CommonFields, CredentialWrapper};
use crate::transactions::deposit_preauth::validate_credential_list;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Most credentials a domain may accept.
pub const MAX_ACCEPTED_CREDENTIALS: usize = 10;

/// Create or update a permissioned domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionedDomainSet {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Existing domain to update; absent when creating
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub domain_id: Option<String>,
    /// Credentials granting domain membership
    pub accepted_credentials: Vec<CredentialWrapper>,
}

impl PermissionedDomainSet {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        if let Some(id) = &self.domain_id {
            validate_domain_id(id, errors);
        }
        validate_credential_list(
            "accepted_credentials",
            &self.accepted_credentials,
            MAX_ACCEPTED_CREDENTIALS,
            errors,
        );
    }
}

/// Delete a permissioned domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionedDomainDelete {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Domain to delete
    pub domain_id: String,
}

impl PermissionedDomainDelete {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        validate_domain_id(&self.domain_id, errors);
    }
}

/// Length is checked before format so each failure reports its own cause.
fn validate_domain_id(id: &str, errors: &mut BTreeMap<String, String>) {
    if id.len() != 64 {
        errors.insert("domain_id".into(), "must be 64 characters long".into());
    } else if !id.chars().all(|c| c.is_ascii_hexdigit()) {
        errors.insert("domain_id".into(), "must be hexadecimal".into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Credential;
    use crate::transactions::Transaction;

    fn credential(n: u8) -> CredentialWrapper {
        CredentialWrapper {
            credential: Credential {
                issuer: address_codec::ACCOUNT_ONE.into(),
                credential_type: hex::encode([n]),
            },
        }
    }

    fn delete(domain_id: &str) -> Transaction {
        Transaction::PermissionedDomainDelete(PermissionedDomainDelete {
            common: CommonFields::new(address_codec::ACCOUNT_ZERO),
            domain_id: domain_id.into(),
        })
    }

    #[test]
    fn test_domain_id_length_and_format() {
        // 63 characters: length failure
        let errors = delete(&"A".repeat(63)).get_errors();
        assert_eq!(errors["domain_id"], "must be 64 characters long");

        // 64 characters but not hex: format failure
        let errors = delete(&"G".repeat(64)).get_errors();
        assert_eq!(errors["domain_id"], "must be hexadecimal");

        // 64 valid hex characters
        assert!(delete(&"A1".repeat(32)).is_valid());
    }

    #[test]
    fn test_accepted_credentials_bounds() {
        let mut tx = PermissionedDomainSet {
            common: CommonFields::new(address_codec::ACCOUNT_ZERO),
            domain_id: None,
            accepted_credentials: vec![],
        };
        assert!(Transaction::PermissionedDomainSet(tx.clone())
            .get_errors()
            .contains_key("accepted_credentials"));

        tx.accepted_credentials = (0..=10).map(credential).collect();
        assert!(Transaction::PermissionedDomainSet(tx.clone())
            .get_errors()
            .contains_key("accepted_credentials"));

        tx.accepted_credentials = (0..10).map(credential).collect();
        assert!(Transaction::PermissionedDomainSet(tx).is_valid());
    }
}
