//! Hashing helpers for transaction identifiers
//!
//! The network derives identifiers by hashing a domain prefix plus the
//! canonical encoding with SHA-512 and keeping the first 32 bytes.

use sha2::{Digest, Sha512};

/// Domain prefix for transaction identifiers ("TXN\0").
pub const HASH_PREFIX_TRANSACTION_ID: [u8; 4] = [0x54, 0x58, 0x4E, 0x00];

/// Domain prefix for single-signature payloads ("STX\0").
pub const HASH_PREFIX_SINGLE_SIGN: [u8; 4] = [0x53, 0x54, 0x58, 0x00];

/// Domain prefix for multi-signature payloads ("SMT\0").
pub const HASH_PREFIX_MULTI_SIGN: [u8; 4] = [0x53, 0x4D, 0x54, 0x00];

/// SHA-512 truncated to its first 32 bytes.
pub fn sha512_half(data: &[u8]) -> [u8; 32] {
    let digest = Sha512::digest(data);
    digest[..32].try_into().unwrap()
}

/// SHA-512-half as 64 uppercase hex characters.
pub fn sha512_half_hex(data: &[u8]) -> String {
    hex::encode_upper(sha512_half(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha512_half_empty_vector() {
        // First half of the published SHA-512 digest of the empty string
        assert_eq!(
            sha512_half_hex(b""),
            "CF83E1357EEFB8BDF1542850D66D8007D620E4050B5715DC83F4A921D36CE9CE"
        );
    }

    #[test]
    fn test_sha512_half_abc_vector() {
        // First half of the published SHA-512 digest of "abc"
        assert_eq!(
            sha512_half_hex(b"abc"),
            "DDAF35A193617ABACC417349AE20413112E6FA4E89A97EA20A9EEEE64B55D39A"
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(sha512_half(b"payload"), sha512_half(b"payload"));
        assert_ne!(sha512_half(b"payload"), sha512_half(b"payloae"));
    }

    #[test]
    fn test_prefixes_are_distinct() {
        let prefixes = [
            HASH_PREFIX_TRANSACTION_ID,
            HASH_PREFIX_SINGLE_SIGN,
            HASH_PREFIX_MULTI_SIGN,
        ];
        for (i, a) in prefixes.iter().enumerate() {
            for b in &prefixes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
