//! Base58-check encoding of account identifiers
//!
//! Layout: `base58(version || payload || sha256(sha256(version || payload))[..4])`
//! over the ripple-ordered alphabet. The version byte pins the payload kind so
//! an account address can never be confused with other checksummed material.

use crate::{AddressError, Result, ACCOUNT_ID_VERSION};

/// Length of an account id payload in bytes
pub const ACCOUNT_ID_LEN: usize = 20;

/// The all-zero account id, rendered as an address. Used as a burn/sentinel
/// destination and reserved as an invalid issuer.
pub const ACCOUNT_ZERO: &str = "rrrrrrrrrrrrrrrrrrrrrhoLvTp";

/// The account id `0x00..01`, rendered as an address.
pub const ACCOUNT_ONE: &str = "rrrrrrrrrrrrrrrrrrrrBZbvji";

/// Encode a 20-byte account id into its checksummed address form.
pub fn encode_account_id(account_id: &[u8; ACCOUNT_ID_LEN]) -> String {
    bs58::encode(account_id)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check_version(ACCOUNT_ID_VERSION)
        .into_string()
}

/// Decode a checksummed address back into its 20-byte account id.
///
/// Verifies the checksum, the version byte, and the payload length.
pub fn decode_account_id(address: &str) -> Result<[u8; ACCOUNT_ID_LEN]> {
    let decoded = bs58::decode(address)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check(Some(ACCOUNT_ID_VERSION))
        .into_vec()
        .map_err(|e| AddressError::InvalidAddress(format!("{}: {}", address, e)))?;

    // The decoded payload still carries the version byte at index 0.
    let (version, payload) = decoded
        .split_first()
        .ok_or_else(|| AddressError::InvalidAddress("empty payload".into()))?;

    if *version != ACCOUNT_ID_VERSION {
        return Err(AddressError::InvalidVersion {
            expected: ACCOUNT_ID_VERSION,
            got: *version,
        });
    }

    let payload: [u8; ACCOUNT_ID_LEN] =
        payload
            .try_into()
            .map_err(|_| AddressError::InvalidLength {
                expected: ACCOUNT_ID_LEN,
                got: decoded.len() - 1,
            })?;

    Ok(payload)
}

/// Check whether a string is a well-formed account address.
pub fn is_valid_address(address: &str) -> bool {
    decode_account_id(address).is_ok()
}
