//! Primitive codecs: fixed-width integers, length prefixes, hashes
//!
//! Everything here is big-endian and deterministic; the object codec composes
//! these with field-id headers to build the full wire form.

use crate::{EncodingError, Result};

/// Largest payload representable by the three-byte length prefix.
pub const MAX_VL_LENGTH: usize = 918_744;

/// Encode an unsigned integer into `width_bits / 8` big-endian bytes.
///
/// Fails when the value does not fit the width.
pub fn encode_uint(width_bits: u32, value: u64) -> Result<Vec<u8>> {
    let out_of_range = match width_bits {
        8 | 16 | 32 => value >> width_bits != 0,
        64 => false,
        _ => {
            return Err(EncodingError::MalformedValue(format!(
                "unsupported integer width: {}",
                width_bits
            )))
        }
    };
    if out_of_range {
        return Err(EncodingError::IntegerOutOfRange {
            width: width_bits,
            value,
        });
    }
    let bytes = value.to_be_bytes();
    Ok(bytes[8 - (width_bits as usize / 8)..].to_vec())
}

/// Encode a variable-length length prefix.
///
/// Lengths 0-192 take one byte; 193-12480 two; 12481-918744 three; anything
/// longer is rejected.
pub fn encode_vl_length(len: usize) -> Result<Vec<u8>> {
    if len <= 192 {
        Ok(vec![len as u8])
    } else if len <= 12_480 {
        let rem = len - 193;
        Ok(vec![(193 + rem / 256) as u8, (rem % 256) as u8])
    } else if len <= MAX_VL_LENGTH {
        let rem = len - 12_481;
        Ok(vec![
            (241 + rem / 65_536) as u8,
            ((rem / 256) % 256) as u8,
            (rem % 256) as u8,
        ])
    } else {
        Err(EncodingError::BlobTooLong { len })
    }
}

/// Decode a hex string into exactly `expected` bytes.
pub fn decode_hash(hex_str: &str, expected: usize) -> Result<Vec<u8>> {
    let bytes =
        hex::decode(hex_str).map_err(|_| EncodingError::InvalidHex(hex_str.to_string()))?;
    if bytes.len() != expected {
        return Err(EncodingError::WrongLength {
            expected,
            got: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Canonical byte-stream builder
///
/// A plain growable buffer with big-endian writers; kept deliberately dumb so
/// the ordering logic lives in one place (the object codec).
#[derive(Debug, Default)]
pub struct BinarySerializer {
    buffer: Vec<u8>,
}

impl BinarySerializer {
    /// Create an empty serializer.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Append one byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Append a big-endian u16.
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a big-endian u32.
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a big-endian u64.
    pub fn write_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a length prefix followed by the payload.
    pub fn write_vl(&mut self, bytes: &[u8]) -> Result<()> {
        let prefix = encode_vl_length(bytes.len())?;
        self.buffer.extend_from_slice(&prefix);
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Current length of the buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the serializer and return the bytes.
    pub fn finalize(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uint_widths() {
        assert_eq!(encode_uint(8, 0xAB).unwrap(), vec![0xAB]);
        assert_eq!(encode_uint(16, 0x0102).unwrap(), vec![0x01, 0x02]);
        assert_eq!(encode_uint(32, 5).unwrap(), vec![0, 0, 0, 5]);
        assert_eq!(
            encode_uint(64, 0x0102030405060708).unwrap(),
            vec![1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn test_encode_uint_out_of_range() {
        assert!(matches!(
            encode_uint(8, 256),
            Err(EncodingError::IntegerOutOfRange { width: 8, .. })
        ));
        assert!(matches!(
            encode_uint(16, 65_536),
            Err(EncodingError::IntegerOutOfRange { width: 16, .. })
        ));
        assert!(matches!(
            encode_uint(32, 1 << 32),
            Err(EncodingError::IntegerOutOfRange { width: 32, .. })
        ));
        // Boundary values fit exactly
        assert!(encode_uint(8, 255).is_ok());
        assert!(encode_uint(16, 65_535).is_ok());
        assert!(encode_uint(32, u32::MAX as u64).is_ok());
    }

    #[test]
    fn test_vl_length_one_byte() {
        assert_eq!(encode_vl_length(0).unwrap(), vec![0]);
        assert_eq!(encode_vl_length(1).unwrap(), vec![1]);
        assert_eq!(encode_vl_length(192).unwrap(), vec![192]);
    }

    #[test]
    fn test_vl_length_two_bytes() {
        assert_eq!(encode_vl_length(193).unwrap(), vec![193, 0]);
        assert_eq!(encode_vl_length(194).unwrap(), vec![193, 1]);
        assert_eq!(encode_vl_length(12_480).unwrap(), vec![240, 255]);
    }

    #[test]
    fn test_vl_length_three_bytes() {
        assert_eq!(encode_vl_length(12_481).unwrap(), vec![241, 0, 0]);
        assert_eq!(encode_vl_length(MAX_VL_LENGTH).unwrap(), vec![254, 212, 23]);
    }

    #[test]
    fn test_vl_length_too_long() {
        assert!(matches!(
            encode_vl_length(MAX_VL_LENGTH + 1),
            Err(EncodingError::BlobTooLong { .. })
        ));
    }

    #[test]
    fn test_decode_hash() {
        assert_eq!(decode_hash("DEADBEEF", 4).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(matches!(
            decode_hash("DEADBEEF", 5),
            Err(EncodingError::WrongLength { expected: 5, got: 4 })
        ));
        assert!(matches!(
            decode_hash("not hex!", 4),
            Err(EncodingError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_serializer_appends_in_order() {
        let mut ser = BinarySerializer::new();
        ser.write_u8(0x01);
        ser.write_u16(0x0203);
        ser.write_u32(0x04050607);
        ser.write_vl(&[0xAA, 0xBB]).unwrap();
        assert_eq!(
            ser.finalize(),
            vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x02, 0xAA, 0xBB]
        );
    }
}
