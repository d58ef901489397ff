//! Binary parser: the exact inverse of the object codec
//!
//! Reconstructs the wire-name JSON form from canonical bytes. Re-encoding
//! the parsed map reproduces the input byte-for-byte, which is what makes
//! decode/re-encode/re-hash pipelines safe.

use crate::definitions::{self, type_codes, FieldDescriptor};
use crate::{Amount, EncodingError, Result};
use serde_json::{Map, Value};

/// Cursor over a canonical byte buffer.
#[derive(Debug)]
pub struct BinaryParser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryParser<'a> {
    /// Wrap a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Whether the cursor has consumed all input.
    pub fn is_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(EncodingError::UnexpectedEnd(self.pos));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn peek(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(EncodingError::UnexpectedEnd(self.pos))
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.take(2)?.try_into().unwrap()))
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.take(8)?.try_into().unwrap()))
    }

    /// Read a variable-length length prefix.
    pub fn read_vl_length(&mut self) -> Result<usize> {
        let b1 = self.read_u8()? as usize;
        if b1 <= 192 {
            Ok(b1)
        } else if b1 <= 240 {
            let b2 = self.read_u8()? as usize;
            Ok(193 + (b1 - 193) * 256 + b2)
        } else if b1 <= 254 {
            let b2 = self.read_u8()? as usize;
            let b3 = self.read_u8()? as usize;
            Ok(12_481 + (b1 - 241) * 65_536 + b2 * 256 + b3)
        } else {
            Err(EncodingError::MalformedValue(format!(
                "invalid length prefix: {:#04x}",
                b1
            )))
        }
    }

    /// Read a length-prefixed payload.
    pub fn read_vl(&mut self) -> Result<&'a [u8]> {
        let len = self.read_vl_length()?;
        self.take(len)
    }

    /// Read a field-id header and resolve it through the registry.
    ///
    /// A zero type nibble spills the type code into the next byte, a zero
    /// field nibble spills the field code into the byte after that.
    pub fn read_field_header(&mut self) -> Result<&'static FieldDescriptor> {
        let first = self.read_u8()?;
        let mut type_code = (first >> 4) as u16;
        let mut field_code = (first & 0x0F) as u16;
        if type_code == 0 {
            type_code = self.read_u8()? as u16;
        }
        if field_code == 0 {
            field_code = self.read_u8()? as u16;
        }
        definitions::lookup_by_code(type_code, field_code)
    }

    fn read_field_value(&mut self, field: &FieldDescriptor) -> Result<Value> {
        let value = match field.type_code {
            type_codes::UINT8 => Value::from(self.read_u8()?),
            type_codes::UINT16 => {
                let n = self.read_u16()?;
                if field.name == "TransactionType" {
                    Value::from(definitions::transaction_type_name(n)?)
                } else {
                    Value::from(n)
                }
            }
            type_codes::UINT32 => Value::from(self.read_u32()?),
            // 64-bit values travel as decimal strings to stay exact in JSON
            type_codes::UINT64 => Value::from(self.read_u64()?.to_string()),
            type_codes::HASH128 => Value::from(hex::encode_upper(self.take(16)?)),
            type_codes::HASH160 => Value::from(hex::encode_upper(self.take(20)?)),
            type_codes::HASH256 => Value::from(hex::encode_upper(self.take(32)?)),
            type_codes::UINT192 => Value::from(hex::encode_upper(self.take(24)?)),
            type_codes::AMOUNT => {
                let len = Amount::wire_len(self.peek()?);
                let amount = Amount::decode(self.take(len)?)?;
                serde_json::to_value(amount)
                    .map_err(|e| EncodingError::MalformedValue(e.to_string()))?
            }
            type_codes::BLOB => Value::from(hex::encode_upper(self.read_vl()?)),
            type_codes::ACCOUNT_ID => {
                let payload = self.read_vl()?;
                let id: [u8; 20] = payload.try_into().map_err(|_| EncodingError::WrongLength {
                    expected: 20,
                    got: payload.len(),
                })?;
                Value::from(address_codec::encode_account_id(&id))
            }
            type_codes::OBJECT => Value::Object(self.read_object()?),
            type_codes::ARRAY => Value::Array(self.read_array()?),
            type_codes::PATH_SET => self.read_path_set()?,
            other => {
                return Err(EncodingError::MalformedValue(format!(
                    "unsupported type code: {}",
                    other
                )))
            }
        };
        Ok(value)
    }

    fn read_object(&mut self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        loop {
            let field = self.read_field_header()?;
            if field.name == "ObjectEndMarker" {
                return Ok(map);
            }
            let value = self
                .read_field_value(field)
                .map_err(|e| e.in_field(field.name))?;
            map.insert(field.name.to_string(), value);
        }
    }

    fn read_array(&mut self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            let field = self.read_field_header()?;
            if field.name == "ArrayEndMarker" {
                return Ok(items);
            }
            if field.type_code != type_codes::OBJECT {
                return Err(EncodingError::MalformedValue(format!(
                    "array element {} is not an object field",
                    field.name
                )));
            }
            let inner = self.read_object().map_err(|e| e.in_field(field.name))?;
            let mut wrapper = Map::new();
            wrapper.insert(field.name.to_string(), Value::Object(inner));
            items.push(Value::Object(wrapper));
        }
    }

    fn read_path_set(&mut self) -> Result<Value> {
        let mut paths: Vec<Value> = Vec::new();
        let mut steps: Vec<Value> = Vec::new();
        loop {
            let flags = self.read_u8()?;
            match flags {
                0x00 => {
                    paths.push(Value::Array(std::mem::take(&mut steps)));
                    return Ok(Value::Array(paths));
                }
                0xFF => paths.push(Value::Array(std::mem::take(&mut steps))),
                _ => {
                    let mut step = Map::new();
                    if flags & 0x01 != 0 {
                        let id: [u8; 20] = self.take(20)?.try_into().unwrap();
                        step.insert(
                            "account".into(),
                            Value::from(address_codec::encode_account_id(&id)),
                        );
                    }
                    if flags & 0x10 != 0 {
                        let raw: [u8; 20] = self.take(20)?.try_into().unwrap();
                        step.insert(
                            "currency".into(),
                            Value::from(crate::amount::currency_from_bytes(raw)?),
                        );
                    }
                    if flags & 0x20 != 0 {
                        let id: [u8; 20] = self.take(20)?.try_into().unwrap();
                        step.insert(
                            "issuer".into(),
                            Value::from(address_codec::encode_account_id(&id)),
                        );
                    }
                    steps.push(Value::Object(step));
                }
            }
        }
    }
}

/// Decode a full canonical buffer back into its wire-name JSON map.
pub fn decode(bytes: &[u8]) -> Result<Map<String, Value>> {
    let mut parser = BinaryParser::new(bytes);
    let mut map = Map::new();
    while !parser.is_end() {
        let field = parser.read_field_header()?;
        let value = parser
            .read_field_value(field)
            .map_err(|e| e.in_field(field.name))?;
        map.insert(field.name.to_string(), value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object;
    use serde_json::json;

    fn as_map(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_vl_length_round_trip() {
        for len in [0usize, 1, 192, 193, 12_480, 12_481, 918_744] {
            let encoded = crate::primitives::encode_vl_length(len).unwrap();
            let mut parser = BinaryParser::new(&encoded);
            assert_eq!(parser.read_vl_length().unwrap(), len, "len {}", len);
            assert!(parser.is_end());
        }
    }

    #[test]
    fn test_decode_reencode_identity() {
        let tx = as_map(json!({
            "TransactionType": "Payment",
            "Flags": 131072u32,
            "Sequence": 9,
            "Amount": {"currency": "USD",
                       "issuer": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
                       "value": "0.25"},
            "Fee": "12",
            "SigningPubKey": "ED".repeat(17).to_string(),
            "Account": address_codec::ACCOUNT_ZERO,
            "Destination": address_codec::ACCOUNT_ONE,
            "Memos": [
                {"Memo": {"MemoType": "DEAD", "MemoData": "BEEF"}},
            ],
        }));
        let bytes = object::encode(&tx).unwrap();
        let decoded = decode(&bytes).unwrap();
        let reencoded = object::encode(&decoded).unwrap();
        assert_eq!(reencoded, bytes);
    }

    #[test]
    fn test_decoded_fields_match() {
        let tx = as_map(json!({
            "TransactionType": "TrustSet",
            "Sequence": 1,
            "Account": address_codec::ACCOUNT_ZERO,
            "LimitAmount": {"currency": "EUR",
                            "issuer": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
                            "value": "500"},
        }));
        let decoded = decode(&object::encode(&tx).unwrap()).unwrap();
        assert_eq!(decoded["TransactionType"], "TrustSet");
        assert_eq!(decoded["Sequence"], 1);
        assert_eq!(decoded["LimitAmount"]["value"], "500");
        assert_eq!(decoded["Account"], address_codec::ACCOUNT_ZERO);
    }

    #[test]
    fn test_unknown_field_code_rejected() {
        // type 2 (UInt32), field 13 is unassigned in the registry
        let mut bytes = vec![0x2D];
        bytes.extend_from_slice(&7u32.to_be_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(EncodingError::UnknownFieldCode { .. })
        ));
    }

    #[test]
    fn test_truncated_input_rejected() {
        let tx = as_map(json!({"Account": address_codec::ACCOUNT_ZERO, "Sequence": 4}));
        let bytes = object::encode(&tx).unwrap();
        let err = decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(err.to_string().contains("Unexpected end"));
    }

    #[test]
    fn test_path_set_round_trip() {
        let tx = as_map(json!({
            "Account": address_codec::ACCOUNT_ZERO,
            "Paths": [
                [{"account": address_codec::ACCOUNT_ONE}],
                [{"currency": "USD",
                  "issuer": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"}],
            ],
        }));
        let bytes = object::encode(&tx).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(object::encode(&decoded).unwrap(), bytes);
        assert_eq!(decoded["Paths"][0][0]["account"], address_codec::ACCOUNT_ONE);
    }
}
