//! DepositPreauth: preauthorize a sender or credential set for deposits

use crate::common::{CommonFields, CredentialWrapper};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Most credentials a preauthorization may name.
pub const MAX_CREDENTIALS: usize = 8;

/// Grant or revoke deposit preauthorization, either for a single account or
/// for holders of a credential set. Exactly one of the four selectors must be
/// present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositPreauth {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Account to preauthorize
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub authorize: Option<String>,
    /// Account whose preauthorization to revoke
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unauthorize: Option<String>,
    /// Credential set to preauthorize
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub authorize_credentials: Option<Vec<CredentialWrapper>>,
    /// Credential set whose preauthorization to revoke
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unauthorize_credentials: Option<Vec<CredentialWrapper>>,
}

impl DepositPreauth {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        let selectors = [
            self.authorize.is_some(),
            self.unauthorize.is_some(),
            self.authorize_credentials.is_some(),
            self.unauthorize_credentials.is_some(),
        ];
        if selectors.iter().filter(|s| **s).count() != 1 {
            errors.insert(
                "deposit_preauth".into(),
                "requires exactly one of authorize, unauthorize, \
                 authorize_credentials, or unauthorize_credentials"
                    .into(),
            );
            return;
        }

        for (name, account) in [("authorize", &self.authorize), ("unauthorize", &self.unauthorize)]
        {
            if let Some(account) = account {
                if !address_codec::is_valid_address(account) {
                    errors.insert(name.into(), "invalid account address".into());
                } else if *account == self.common.account {
                    errors.insert(name.into(), "cannot preauthorize own account".into());
                }
            }
        }

        for (name, list) in [
            ("authorize_credentials", &self.authorize_credentials),
            ("unauthorize_credentials", &self.unauthorize_credentials),
        ] {
            if let Some(list) = list {
                validate_credential_list(name, list, MAX_CREDENTIALS, errors);
            }
        }
    }
}

/// Shared rules for credential arrays: cardinality bounds, uniqueness, and
/// per-entry well-formedness.
pub(crate) fn validate_credential_list(
    field: &str,
    list: &[CredentialWrapper],
    max: usize,
    errors: &mut BTreeMap<String, String>,
) {
    if list.is_empty() {
        errors.insert(field.into(), "cannot be empty".into());
        return;
    }
    if list.len() > max {
        errors.insert(field.into(), format!("cannot have more than {} entries", max));
        return;
    }
    let mut seen = HashSet::new();
    for wrapper in list {
        let credential = &wrapper.credential;
        if !address_codec::is_valid_address(&credential.issuer) {
            errors.insert(field.into(), "credential issuer is not a valid address".into());
            return;
        }
        if credential.credential_type.is_empty()
            || hex::decode(&credential.credential_type).is_err()
        {
            errors.insert(field.into(), "credential type must be hex-encoded".into());
            return;
        }
        if !seen.insert((&credential.issuer, &credential.credential_type)) {
            errors.insert(field.into(), "contains duplicate credentials".into());
            return;
        }
    }
}
