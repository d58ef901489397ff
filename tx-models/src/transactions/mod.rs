//! Transaction model layer
//!
//! A closed set of transaction types behind one enum: dispatch by the
//! `transaction_type` discriminator is a compile-time match, not a runtime
//! type lookup, so an unknown discriminator is a construction error rather
//! than a latent surprise.
//!
//! Instances are immutable once constructed. Validation is a predicate
//! recomputed on demand (`get_errors`/`is_valid`), never a stored state, so
//! repeated calls can never be stale. To change a field, reconstruct.

pub mod account_delete;
pub mod account_set;
pub mod amm_create;
pub mod deposit_preauth;
pub mod escrow;
pub mod mpt_issuance_create;
pub mod offer_create;
pub mod payment;
pub mod permissioned_domain;
pub mod signer_list_set;
pub mod trust_set;

pub use account_delete::AccountDelete;
pub use account_set::AccountSet;
pub use amm_create::AmmCreate;
pub use deposit_preauth::DepositPreauth;
pub use escrow::{EscrowCancel, EscrowCreate, EscrowFinish};
pub use mpt_issuance_create::MptIssuanceCreate;
pub use offer_create::OfferCreate;
pub use payment::{PathStep, Payment};
pub use permissioned_domain::{PermissionedDomainDelete, PermissionedDomainSet};
pub use signer_list_set::SignerListSet;
pub use trust_set::TrustSet;

use crate::common::{CommonFields, SignerWrapper};
use crate::hashing::{
    sha512_half_hex, HASH_PREFIX_MULTI_SIGN, HASH_PREFIX_SINGLE_SIGN, HASH_PREFIX_TRANSACTION_ID,
};
use crate::{case, wire, ModelError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A ledger transaction, one variant per type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transaction_type")]
pub enum Transaction {
    /// Value transfer
    Payment(Payment),
    /// Lock funds behind a time or condition
    EscrowCreate(EscrowCreate),
    /// Release escrowed funds
    EscrowFinish(EscrowFinish),
    /// Cancel an expired escrow
    EscrowCancel(EscrowCancel),
    /// Adjust account settings
    AccountSet(AccountSet),
    /// Delete the account
    AccountDelete(AccountDelete),
    /// Place an exchange offer
    OfferCreate(OfferCreate),
    /// Replace or delete the signer list
    SignerListSet(SignerListSet),
    /// Preauthorize a depositor or credential set
    DepositPreauth(DepositPreauth),
    /// Create or adjust a trust line
    TrustSet(TrustSet),
    /// Fund a liquidity pool
    #[serde(rename = "AMMCreate")]
    AmmCreate(AmmCreate),
    /// Define a token issuance
    #[serde(rename = "MPTokenIssuanceCreate")]
    MptIssuanceCreate(MptIssuanceCreate),
    /// Create or update a permissioned domain
    PermissionedDomainSet(PermissionedDomainSet),
    /// Delete a permissioned domain
    PermissionedDomainDelete(PermissionedDomainDelete),
}

impl Transaction {
    /// The wire-format transaction type name.
    pub fn transaction_type(&self) -> &'static str {
        match self {
            Transaction::Payment(_) => "Payment",
            Transaction::EscrowCreate(_) => "EscrowCreate",
            Transaction::EscrowFinish(_) => "EscrowFinish",
            Transaction::EscrowCancel(_) => "EscrowCancel",
            Transaction::AccountSet(_) => "AccountSet",
            Transaction::AccountDelete(_) => "AccountDelete",
            Transaction::OfferCreate(_) => "OfferCreate",
            Transaction::SignerListSet(_) => "SignerListSet",
            Transaction::DepositPreauth(_) => "DepositPreauth",
            Transaction::TrustSet(_) => "TrustSet",
            Transaction::AmmCreate(_) => "AMMCreate",
            Transaction::MptIssuanceCreate(_) => "MPTokenIssuanceCreate",
            Transaction::PermissionedDomainSet(_) => "PermissionedDomainSet",
            Transaction::PermissionedDomainDelete(_) => "PermissionedDomainDelete",
        }
    }

    /// The fields shared by every type.
    pub fn common(&self) -> &CommonFields {
        match self {
            Transaction::Payment(t) => &t.common,
            Transaction::EscrowCreate(t) => &t.common,
            Transaction::EscrowFinish(t) => &t.common,
            Transaction::EscrowCancel(t) => &t.common,
            Transaction::AccountSet(t) => &t.common,
            Transaction::AccountDelete(t) => &t.common,
            Transaction::OfferCreate(t) => &t.common,
            Transaction::SignerListSet(t) => &t.common,
            Transaction::DepositPreauth(t) => &t.common,
            Transaction::TrustSet(t) => &t.common,
            Transaction::AmmCreate(t) => &t.common,
            Transaction::MptIssuanceCreate(t) => &t.common,
            Transaction::PermissionedDomainSet(t) => &t.common,
            Transaction::PermissionedDomainDelete(t) => &t.common,
        }
    }

    fn common_mut(&mut self) -> &mut CommonFields {
        match self {
            Transaction::Payment(t) => &mut t.common,
            Transaction::EscrowCreate(t) => &mut t.common,
            Transaction::EscrowFinish(t) => &mut t.common,
            Transaction::EscrowCancel(t) => &mut t.common,
            Transaction::AccountSet(t) => &mut t.common,
            Transaction::AccountDelete(t) => &mut t.common,
            Transaction::OfferCreate(t) => &mut t.common,
            Transaction::SignerListSet(t) => &mut t.common,
            Transaction::DepositPreauth(t) => &mut t.common,
            Transaction::TrustSet(t) => &mut t.common,
            Transaction::AmmCreate(t) => &mut t.common,
            Transaction::MptIssuanceCreate(t) => &mut t.common,
            Transaction::PermissionedDomainSet(t) => &mut t.common,
            Transaction::PermissionedDomainDelete(t) => &mut t.common,
        }
    }

    /// Construct from a model-form (snake_case) dictionary.
    ///
    /// Resolves the `transaction_type` discriminator against the closed type
    /// set first, and rejects any key absent from the field registry so an
    /// unrecognized field can never be dropped silently.
    pub fn from_dict(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| ModelError::Envelope("transaction must be an object".into()))?;

        let type_name = map
            .get("transaction_type")
            .and_then(Value::as_str)
            .ok_or(ModelError::MissingTransactionType)?;
        if binary_codec::definitions::transaction_type_code(type_name).is_err() {
            return Err(ModelError::UnknownTransactionType(type_name.to_string()));
        }

        for key in map.keys() {
            if key == "transaction_type" {
                continue;
            }
            binary_codec::definitions::lookup(&case::to_wire_name(key))?;
        }

        Ok(serde_json::from_value(value.clone())?)
    }

    /// Construct from a wire-form (PascalCase) dictionary.
    pub fn from_wire_json(value: &Value) -> Result<Self> {
        Self::from_dict(&wire::from_wire(value))
    }

    /// The model-form (snake_case) dictionary.
    pub fn to_dict(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The wire-form (PascalCase) dictionary.
    pub fn to_wire_json(&self) -> Result<Value> {
        Ok(wire::to_wire(&self.to_dict()?))
    }

    fn wire_map(&self) -> Result<Map<String, Value>> {
        match self.to_wire_json()? {
            Value::Object(map) => Ok(map),
            other => Err(ModelError::Envelope(format!(
                "transaction serialized to a non-object: {}",
                other
            ))),
        }
    }

    /// Run every validation predicate and collect the failures.
    ///
    /// Empty means valid. Keys are field names, or the transaction name for
    /// cross-field rules that belong to no single field.
    pub fn get_errors(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        self.common().collect_errors(&mut errors);
        match self {
            Transaction::Payment(t) => t.collect_type_errors(&mut errors),
            Transaction::EscrowCreate(t) => t.collect_type_errors(&mut errors),
            Transaction::EscrowFinish(t) => t.collect_type_errors(&mut errors),
            Transaction::EscrowCancel(t) => t.collect_type_errors(&mut errors),
            Transaction::AccountSet(t) => t.collect_type_errors(&mut errors),
            Transaction::AccountDelete(t) => t.collect_type_errors(&mut errors),
            Transaction::OfferCreate(t) => t.collect_type_errors(&mut errors),
            Transaction::SignerListSet(t) => t.collect_type_errors(&mut errors),
            Transaction::DepositPreauth(t) => t.collect_type_errors(&mut errors),
            Transaction::TrustSet(t) => t.collect_type_errors(&mut errors),
            Transaction::AmmCreate(t) => t.collect_type_errors(&mut errors),
            Transaction::MptIssuanceCreate(t) => t.collect_type_errors(&mut errors),
            Transaction::PermissionedDomainSet(t) => t.collect_type_errors(&mut errors),
            Transaction::PermissionedDomainDelete(t) => t.collect_type_errors(&mut errors),
        }
        errors
    }

    /// Whether every validation predicate passes.
    pub fn is_valid(&self) -> bool {
        self.get_errors().is_empty()
    }

    /// Validate, returning the full error map on failure.
    pub fn validate(&self) -> Result<()> {
        let errors = self.get_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ModelError::ValidationFailed(errors))
        }
    }

    /// Validate and serialize to the full canonical binary form.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;
        Ok(binary_codec::encode(&self.wire_map()?)?)
    }

    /// The single-signature payload: domain prefix plus the signing-field
    /// canonical encoding.
    pub fn signing_payload(&self) -> Result<Vec<u8>> {
        self.validate()?;
        let mut data = HASH_PREFIX_SINGLE_SIGN.to_vec();
        data.extend(binary_codec::encode_for_signing(&self.wire_map()?)?);
        Ok(data)
    }

    /// The multi-signature payload for one signer: domain prefix, signing
    /// fields, then the signer's account id.
    pub fn multisign_payload(&self, signer_address: &str) -> Result<Vec<u8>> {
        self.validate()?;
        let signer_id = address_codec::decode_account_id(signer_address)
            .map_err(binary_codec::EncodingError::from)?;
        let mut data = HASH_PREFIX_MULTI_SIGN.to_vec();
        data.extend(binary_codec::encode_for_signing(&self.wire_map()?)?);
        data.extend_from_slice(&signer_id);
        Ok(data)
    }

    /// Whether a signature or signer list is attached.
    pub fn is_signed(&self) -> bool {
        self.common().is_signed()
    }

    /// The transaction identifier: domain-prefixed SHA-512-half of the full
    /// canonical encoding, as 64 uppercase hex characters.
    ///
    /// Only defined for signed transactions; the identifier of an unsigned
    /// transaction would never match anything the ledger stores.
    pub fn get_hash(&self) -> Result<String> {
        if !self.is_signed() {
            return Err(ModelError::UnsignedTransaction);
        }
        let mut data = HASH_PREFIX_TRANSACTION_ID.to_vec();
        data.extend(binary_codec::encode(&self.wire_map()?)?);
        Ok(sha512_half_hex(&data))
    }

    /// Reconstruct with a single signature attached.
    pub fn with_signature(mut self, public_key_hex: &str, signature_hex: &str) -> Self {
        let common = self.common_mut();
        common.signing_pub_key = Some(public_key_hex.to_string());
        common.txn_signature = Some(signature_hex.to_string());
        self
    }

    /// Reconstruct with a signer list attached. The envelope's own signing
    /// key is set empty, as multi-signed envelopes require.
    pub fn with_signers(mut self, signers: Vec<SignerWrapper>) -> Self {
        let common = self.common_mut();
        common.signing_pub_key = Some(String::new());
        common.signers = Some(signers);
        self
    }

    /// Reconstruct with fee, sequence, and expiry filled in.
    pub fn with_autofilled(
        mut self,
        fee_drops: u64,
        sequence: u32,
        last_ledger_sequence: u32,
    ) -> Self {
        let common = self.common_mut();
        if common.fee.is_none() {
            common.fee = Some(fee_drops.to_string());
        }
        if common.sequence.is_none() {
            common.sequence = Some(sequence);
        }
        if common.last_ledger_sequence.is_none() {
            common.last_ledger_sequence = Some(last_ledger_sequence);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binary_codec::Amount;
    use serde_json::json;

    fn payment_dict() -> Value {
        json!({
            "transaction_type": "Payment",
            "account": address_codec::ACCOUNT_ZERO,
            "destination": address_codec::ACCOUNT_ONE,
            "amount": "1000",
            "fee": "10",
            "sequence": 5,
        })
    }

    #[test]
    fn test_from_dict_dispatches_by_discriminator() {
        let tx = Transaction::from_dict(&payment_dict()).unwrap();
        assert_eq!(tx.transaction_type(), "Payment");
        match &tx {
            Transaction::Payment(p) => assert_eq!(p.amount, Amount::Native(1000)),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_transaction_type() {
        let mut dict = payment_dict();
        dict["transaction_type"] = json!("Teleport");
        assert!(matches!(
            Transaction::from_dict(&dict),
            Err(ModelError::UnknownTransactionType(name)) if name == "Teleport"
        ));
    }

    #[test]
    fn test_missing_discriminator() {
        let dict = json!({"account": address_codec::ACCOUNT_ZERO});
        assert!(matches!(
            Transaction::from_dict(&dict),
            Err(ModelError::MissingTransactionType)
        ));
    }

    #[test]
    fn test_unknown_field_rejected_not_dropped() {
        let mut dict = payment_dict();
        dict["mystery_field"] = json!(1);
        assert!(matches!(
            Transaction::from_dict(&dict),
            Err(ModelError::Encoding(binary_codec::EncodingError::UnknownField(name)))
                if name == "MysteryField"
        ));
    }

    #[test]
    fn test_missing_required_field_fails_at_construction() {
        let dict = json!({
            "transaction_type": "Payment",
            "account": address_codec::ACCOUNT_ZERO,
            // no amount, no destination
        });
        assert!(matches!(
            Transaction::from_dict(&dict),
            Err(ModelError::Json(_))
        ));
    }

    #[test]
    fn test_dict_round_trip() {
        let tx = Transaction::from_dict(&payment_dict()).unwrap();
        let back = Transaction::from_dict(&tx.to_dict().unwrap()).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_wire_json_round_trip_preserves_encoding() {
        let tx = Transaction::from_dict(&payment_dict()).unwrap();
        let wire_json = tx.to_wire_json().unwrap();
        assert_eq!(wire_json["TransactionType"], "Payment");
        assert_eq!(wire_json["Account"], address_codec::ACCOUNT_ZERO);

        let back = Transaction::from_wire_json(&wire_json).unwrap();
        assert_eq!(
            back.to_canonical_bytes().unwrap(),
            tx.to_canonical_bytes().unwrap()
        );
    }

    #[test]
    fn test_flags_accepted_in_three_shapes() {
        for flags in [json!(131072), json!([131072]), json!({"tf_partial_payment": true})] {
            let mut dict = payment_dict();
            dict["flags"] = flags;
            dict["deliver_min"] = json!("500");
            let tx = Transaction::from_dict(&dict).unwrap();
            assert!(tx.is_valid());
            assert_eq!(tx.common().flags, Some(crate::flags::Flags(131072)));
        }
    }

    #[test]
    fn test_hash_requires_signature() {
        let tx = Transaction::from_dict(&payment_dict()).unwrap();
        assert!(matches!(tx.get_hash(), Err(ModelError::UnsignedTransaction)));
    }

    #[test]
    fn test_hash_is_stable_uppercase_hex() {
        let tx = Transaction::from_dict(&payment_dict())
            .unwrap()
            .with_signature("ED0102", "A1B2C3");
        let hash = tx.get_hash().unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash.to_uppercase());
        assert_eq!(tx.get_hash().unwrap(), hash);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let signed = |drops: &str| {
            let mut dict = payment_dict();
            dict["amount"] = json!(drops);
            Transaction::from_dict(&dict)
                .unwrap()
                .with_signature("ED0102", "A1B2C3")
        };
        assert_ne!(
            signed("1000").get_hash().unwrap(),
            signed("1001").get_hash().unwrap()
        );
    }

    #[test]
    fn test_signing_payload_excludes_signature() {
        let tx = Transaction::from_dict(&payment_dict()).unwrap();
        let unsigned_payload = tx.signing_payload().unwrap();
        let signed_payload = tx
            .clone()
            .with_signature("ED0102", "A1B2C3")
            .signing_payload()
            .unwrap();
        // TxnSignature is not a signing field; SigningPubKey is
        assert_ne!(unsigned_payload, signed_payload);
        let resigned = tx
            .with_signature("ED0102", "FFFFFF")
            .signing_payload()
            .unwrap();
        assert_eq!(signed_payload, resigned);
    }

    #[test]
    fn test_multisign_payload_binds_signer() {
        let tx = Transaction::from_dict(&payment_dict()).unwrap();
        let a = tx.multisign_payload(address_codec::ACCOUNT_ONE).unwrap();
        let b = tx
            .multisign_payload("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh")
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(&a[..4], &HASH_PREFIX_MULTI_SIGN);
    }

    #[test]
    fn test_autofill_fills_only_missing() {
        let tx = Transaction::from_dict(&payment_dict())
            .unwrap()
            .with_autofilled(12, 99, 1000);
        // fee and sequence were present; last_ledger_sequence was not
        assert_eq!(tx.common().fee.as_deref(), Some("10"));
        assert_eq!(tx.common().sequence, Some(5));
        assert_eq!(tx.common().last_ledger_sequence, Some(1000));
    }

    #[test]
    fn test_canonical_bytes_reject_invalid() {
        let mut dict = payment_dict();
        dict["destination"] = json!(address_codec::ACCOUNT_ZERO);
        let tx = Transaction::from_dict(&dict).unwrap();
        assert!(matches!(
            tx.to_canonical_bytes(),
            Err(ModelError::ValidationFailed(_))
        ));
    }
}
