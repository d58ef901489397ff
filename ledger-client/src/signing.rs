//! Signing capability
//!
//! The model layer produces signing payloads; this module turns them into
//! signatures. The capability is a trait so key custody can live anywhere
//! (in-process keys here; remote signers implement the same trait).

use crate::{ClientError, Result};
use ed25519_dalek::{Signature as DalekSignature, Signer as _, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};
use tx_models::{Signer, SignerWrapper, Transaction};

/// Algorithm prefix distinguishing Ed25519 public keys on the wire.
pub const ED25519_PREFIX: u8 = 0xED;

/// Something that can sign canonical bytes.
pub trait SigningCapability {
    /// Sign a message, returning the raw signature bytes.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;

    /// The wire-format public key (algorithm prefix included).
    fn public_key(&self) -> Vec<u8>;
}

/// In-process Ed25519 key pair.
#[derive(Debug)]
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&rand::random::<[u8; 32]>()),
        }
    }

    /// Deterministic construction from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The account address derived from this key pair.
    pub fn address(&self) -> String {
        derive_address(&self.public_key())
    }
}

impl SigningCapability for Ed25519Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }

    fn public_key(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(33);
        key.push(ED25519_PREFIX);
        key.extend_from_slice(&self.signing_key.verifying_key().to_bytes());
        key
    }
}

/// Derive the account address for a wire-format public key: the account id
/// is the first 20 bytes of the key's SHA-256 digest.
pub fn derive_address(public_key: &[u8]) -> String {
    let digest = Sha256::digest(public_key);
    let account_id: [u8; 20] = digest[..20].try_into().unwrap();
    address_codec::encode_account_id(&account_id)
}

/// Verify a signature over a message under a wire-format public key.
pub fn verify_signature(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let raw_key = match public_key.split_first() {
        Some((&ED25519_PREFIX, rest)) => rest,
        _ => return false,
    };
    let key_bytes: [u8; 32] = match raw_key.try_into() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let verifying_key = match VerifyingKey::from_bytes(&key_bytes) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let sig_bytes: [u8; 64] = match signature.try_into() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    verifying_key
        .verify(message, &DalekSignature::from_bytes(&sig_bytes))
        .is_ok()
}

/// Produce a singly-signed copy of a transaction.
///
/// The public key is attached before the payload is computed, since it is a
/// signing-covered field; the original transaction is left untouched.
pub fn sign_transaction<S: SigningCapability>(
    transaction: &Transaction,
    signer: &S,
) -> Result<Transaction> {
    let public_key_hex = hex::encode_upper(signer.public_key());
    let prepared = transaction.clone().with_signature(&public_key_hex, "");
    let payload = prepared.signing_payload()?;
    let signature = signer.sign(&payload)?;
    Ok(prepared.with_signature(&public_key_hex, &hex::encode_upper(signature)))
}

/// Produce one signer entry toward a multi-signed transaction.
///
/// The payload binds the signing account, so each participant signs distinct
/// bytes; entries from several participants combine via
/// [`Transaction::with_signers`].
pub fn multisign_entry<S: SigningCapability>(
    transaction: &Transaction,
    signer: &S,
    signer_address: &str,
) -> Result<SignerWrapper> {
    if !address_codec::is_valid_address(signer_address) {
        return Err(ClientError::Signing(format!(
            "invalid signer address: {}",
            signer_address
        )));
    }
    let payload = transaction.multisign_payload(signer_address)?;
    let signature = signer.sign(&payload)?;
    Ok(SignerWrapper {
        signer: Signer {
            account: signer_address.to_string(),
            signing_pub_key: hex::encode_upper(signer.public_key()),
            txn_signature: hex::encode_upper(signature),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unsigned_payment(account: &str) -> Transaction {
        Transaction::from_dict(&json!({
            "transaction_type": "Payment",
            "account": account,
            "destination": address_codec::ACCOUNT_ONE,
            "amount": "1000",
            "fee": "10",
            "sequence": 1,
        }))
        .unwrap()
    }

    #[test]
    fn test_public_key_has_prefix() {
        let signer = Ed25519Signer::generate();
        let key = signer.public_key();
        assert_eq!(key.len(), 33);
        assert_eq!(key[0], ED25519_PREFIX);
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = Ed25519Signer::from_seed(&[7u8; 32]);
        let b = Ed25519Signer::from_seed(&[7u8; 32]);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = Ed25519Signer::generate();
        let signature = signer.sign(b"canonical bytes").unwrap();
        assert!(verify_signature(
            b"canonical bytes",
            &signature,
            &signer.public_key()
        ));
        assert!(!verify_signature(
            b"other bytes",
            &signature,
            &signer.public_key()
        ));
        assert!(!verify_signature(
            b"canonical bytes",
            &signature,
            &Ed25519Signer::generate().public_key()
        ));
    }

    #[test]
    fn test_derived_address_is_valid() {
        let signer = Ed25519Signer::from_seed(&[1u8; 32]);
        let address = signer.address();
        assert!(address_codec::is_valid_address(&address));
    }

    #[test]
    fn test_sign_transaction_attaches_verifiable_signature() {
        let signer = Ed25519Signer::from_seed(&[3u8; 32]);
        let tx = unsigned_payment(&signer.address());

        let signed = sign_transaction(&tx, &signer).unwrap();
        assert!(signed.is_signed());
        // The original is untouched
        assert!(!tx.is_signed());

        let common = signed.common();
        let signature = hex::decode(common.txn_signature.as_ref().unwrap()).unwrap();
        let payload = signed.signing_payload().unwrap();
        assert!(verify_signature(&payload, &signature, &signer.public_key()));

        // A signed transaction hashes
        assert_eq!(signed.get_hash().unwrap().len(), 64);
    }

    #[test]
    fn test_signing_is_referentially_transparent() {
        let signer = Ed25519Signer::from_seed(&[9u8; 32]);
        let tx = unsigned_payment(&signer.address());
        let a = sign_transaction(&tx, &signer).unwrap();
        let b = sign_transaction(&tx, &signer).unwrap();
        // Ed25519 is deterministic: same payload, same bytes, same hash
        assert_eq!(
            a.to_canonical_bytes().unwrap(),
            b.to_canonical_bytes().unwrap()
        );
        assert_eq!(a.get_hash().unwrap(), b.get_hash().unwrap());
    }

    #[test]
    fn test_multisign_entry_binds_account() {
        let owner = Ed25519Signer::from_seed(&[4u8; 32]);
        let participant = Ed25519Signer::from_seed(&[5u8; 32]);
        let tx = unsigned_payment(&owner.address());

        let entry = multisign_entry(&tx, &participant, &participant.address()).unwrap();
        let payload = tx.multisign_payload(&participant.address()).unwrap();
        let signature = hex::decode(&entry.signer.txn_signature).unwrap();
        assert!(verify_signature(
            &payload,
            &signature,
            &participant.public_key()
        ));

        let multisigned = tx.with_signers(vec![entry]);
        assert!(multisigned.is_signed());
        assert_eq!(
            multisigned.common().signing_pub_key.as_deref(),
            Some("")
        );
    }
}
