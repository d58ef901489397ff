//! Fields and nested objects shared by every transaction type

use crate::flags::Flags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum entries in a transaction's signer array.
pub const MAX_TRANSACTION_SIGNERS: usize = 8;

/// An arbitrary memo attached to a transaction. All members are hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Memo {
    /// Hex-encoded memo type identifier
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memo_type: Option<String>,
    /// Hex-encoded memo payload
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memo_data: Option<String>,
    /// Hex-encoded memo format hint
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memo_format: Option<String>,
}

/// Wire wrapper: memos travel as `{"memo": {...}}` array elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoWrapper {
    /// The wrapped memo
    pub memo: Memo,
}

/// One signature in a multi-signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    /// Signing account address
    pub account: String,
    /// Hex-encoded public key the signature verifies under
    pub signing_pub_key: String,
    /// Hex-encoded signature over the multi-sign payload
    pub txn_signature: String,
}

/// Wire wrapper for signer array elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerWrapper {
    /// The wrapped signer
    pub signer: Signer,
}

/// One entry in an account's signer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerEntry {
    /// Participant account address
    pub account: String,
    /// Voting weight toward the quorum
    pub signer_weight: u16,
}

/// Wire wrapper for signer-list entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerEntryWrapper {
    /// The wrapped entry
    pub signer_entry: SignerEntry,
}

/// A credential reference: issuing account plus hex-encoded type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Credential issuer address
    pub issuer: String,
    /// Hex-encoded credential type
    pub credential_type: String,
}

/// Wire wrapper for credential array elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialWrapper {
    /// The wrapped credential
    pub credential: Credential,
}

/// Fields common to every transaction type.
///
/// `fee` and `sequence` are optional at construction so they can be filled
/// from the network before signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonFields {
    /// Sending account address
    pub account: String,
    /// Fee in drops, as a decimal string
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fee: Option<String>,
    /// Account sequence number
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sequence: Option<u32>,
    /// Highest ledger index this transaction can appear in
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_ledger_sequence: Option<u32>,
    /// Chain identifier, for networks that require it
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub network_id: Option<u32>,
    /// Arbitrary sender-side classifier
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_tag: Option<u32>,
    /// Hash this transaction's validity is chained to
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub account_txn_id: Option<String>,
    /// Transaction flags (bitmask, list, or name map; stored canonically)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flags: Option<Flags>,
    /// Attached memos
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memos: Option<Vec<MemoWrapper>>,
    /// Multi-signature entries
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signers: Option<Vec<SignerWrapper>>,
    /// Hex public key for single signing; empty string when multi-signed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signing_pub_key: Option<String>,
    /// Hex signature over the single-sign payload
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub txn_signature: Option<String>,
}

impl CommonFields {
    /// Construct with only the account set.
    pub fn new(account: &str) -> Self {
        Self {
            account: account.to_string(),
            fee: None,
            sequence: None,
            last_ledger_sequence: None,
            network_id: None,
            source_tag: None,
            account_txn_id: None,
            flags: None,
            memos: None,
            signers: None,
            signing_pub_key: None,
            txn_signature: None,
        }
    }

    /// Whether a signature or signer list is attached.
    pub fn is_signed(&self) -> bool {
        self.txn_signature.as_deref().is_some_and(|s| !s.is_empty())
            || self.signers.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Validation shared by every transaction type.
    pub fn collect_errors(&self, errors: &mut BTreeMap<String, String>) {
        if !address_codec::is_valid_address(&self.account) {
            errors.insert("account".into(), "invalid account address".into());
        }
        if let Some(fee) = &self.fee {
            match fee.parse::<u64>() {
                Ok(drops) if drops <= binary_codec::MAX_DROPS => {}
                _ => {
                    errors.insert("fee".into(), "fee must be a drops integer".into());
                }
            }
        }
        if let Some(id) = &self.account_txn_id {
            if !is_hex_of_len(id, 64) {
                errors.insert(
                    "account_txn_id".into(),
                    "must be 64 hexadecimal characters".into(),
                );
            }
        }
        if let Some(memos) = &self.memos {
            for wrapper in memos {
                let memo = &wrapper.memo;
                if memo.memo_type.is_none() && memo.memo_data.is_none() && memo.memo_format.is_none()
                {
                    errors.insert("memos".into(), "memo must have at least one member".into());
                    break;
                }
                let all_hex = [&memo.memo_type, &memo.memo_data, &memo.memo_format]
                    .into_iter()
                    .flatten()
                    .all(|s| hex::decode(s).is_ok());
                if !all_hex {
                    errors.insert("memos".into(), "memo members must be hex-encoded".into());
                    break;
                }
            }
        }
        if let Some(signers) = &self.signers {
            if signers.is_empty() || signers.len() > MAX_TRANSACTION_SIGNERS {
                errors.insert(
                    "signers".into(),
                    format!("must have 1 to {} entries", MAX_TRANSACTION_SIGNERS),
                );
            }
            let mut seen = std::collections::HashSet::new();
            for wrapper in signers {
                if !seen.insert(&wrapper.signer.account) {
                    errors.insert("signers".into(), "duplicate signer account".into());
                    break;
                }
            }
        }
    }
}

/// Check a string is exactly `len` hex characters.
pub fn is_hex_of_len(s: &str, len: usize) -> bool {
    s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit())
}
