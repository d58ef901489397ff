//! Object codec: canonical serialization of structured field maps
//!
//! Takes a wire-name (PascalCase) JSON map and emits the deterministic
//! binary form: every key resolved through the field registry, absent-
//! sentinel fields dropped per field policy, remaining fields sorted by
//! `(type_code, field_code)`, each framed as header / optional length
//! prefix / value. Nested objects and arrays recurse with explicit end
//! markers. Unknown keys are an error, never silently skipped: a dropped
//! field would change the canonical encoding.

use crate::definitions::{self, type_codes, FieldDescriptor};
use crate::primitives::BinarySerializer;
use crate::{Amount, EncodingError, Result};
use serde_json::{Map, Value};

/// Flag byte marking an account step in a payment path.
const PATH_STEP_ACCOUNT: u8 = 0x01;
/// Flag byte marking a currency step in a payment path.
const PATH_STEP_CURRENCY: u8 = 0x10;
/// Flag byte marking an issuer step in a payment path.
const PATH_STEP_ISSUER: u8 = 0x20;
/// Separator between paths in a path set.
const PATH_SEPARATOR: u8 = 0xFF;
/// Terminator of a path set.
const PATH_SET_END: u8 = 0x00;

/// Encode a field map into its full canonical binary form.
pub fn encode(object: &Map<String, Value>) -> Result<Vec<u8>> {
    let mut ser = BinarySerializer::new();
    encode_members(&mut ser, object, false)?;
    Ok(ser.finalize())
}

/// Encode only the signing-covered fields.
pub fn encode_for_signing(object: &Map<String, Value>) -> Result<Vec<u8>> {
    let mut ser = BinarySerializer::new();
    encode_members(&mut ser, object, true)?;
    Ok(ser.finalize())
}

fn encode_members(
    ser: &mut BinarySerializer,
    object: &Map<String, Value>,
    signing_only: bool,
) -> Result<()> {
    let mut fields: Vec<(&'static FieldDescriptor, &Value)> = Vec::with_capacity(object.len());
    for (name, value) in object {
        let field = definitions::lookup(name)?;
        if value.is_null() {
            continue;
        }
        if field.omit_when_empty && value.as_str() == Some("") {
            continue;
        }
        if signing_only && !field.is_signing {
            continue;
        }
        fields.push((field, value));
    }
    fields.sort_by_key(|(f, _)| f.sort_key());

    for (field, value) in fields {
        encode_field(ser, field, value, signing_only)
            .map_err(|e| e.in_field(field.name))?;
    }
    Ok(())
}

fn encode_field(
    ser: &mut BinarySerializer,
    field: &FieldDescriptor,
    value: &Value,
    signing_only: bool,
) -> Result<()> {
    ser.write_bytes(&field.header());
    match field.type_code {
        type_codes::UINT8 => ser.write_u8(expect_uint(value, 8)? as u8),
        type_codes::UINT16 => {
            // The transaction-type discriminator may appear symbolically.
            let n = if field.name == "TransactionType" {
                match value {
                    Value::String(name) => definitions::transaction_type_code(name)? as u64,
                    other => expect_uint(other, 16)?,
                }
            } else {
                expect_uint(value, 16)?
            };
            ser.write_u16(n as u16);
        }
        type_codes::UINT32 => ser.write_u32(expect_uint(value, 32)? as u32),
        type_codes::UINT64 => ser.write_u64(expect_uint(value, 64)?),
        type_codes::HASH128 => ser.write_bytes(&expect_hash(value, 16)?),
        type_codes::HASH160 => ser.write_bytes(&expect_hash(value, 20)?),
        type_codes::HASH256 => ser.write_bytes(&expect_hash(value, 32)?),
        type_codes::UINT192 => ser.write_bytes(&expect_hash(value, 24)?),
        type_codes::AMOUNT => {
            let amount = Amount::from_json(value)?;
            ser.write_bytes(&amount.encode()?);
        }
        type_codes::BLOB => {
            let hex_str = value.as_str().ok_or_else(|| type_mismatch("hex string", value))?;
            let bytes = hex::decode(hex_str)
                .map_err(|_| EncodingError::InvalidHex(hex_str.to_string()))?;
            ser.write_vl(&bytes)?;
        }
        type_codes::ACCOUNT_ID => {
            let address = value.as_str().ok_or_else(|| type_mismatch("address", value))?;
            let id = address_codec::decode_account_id(address)?;
            ser.write_vl(&id)?;
        }
        type_codes::OBJECT => {
            let map = value
                .as_object()
                .ok_or_else(|| type_mismatch("object", value))?;
            encode_members(ser, map, signing_only)?;
            ser.write_bytes(&definitions::lookup("ObjectEndMarker")?.header());
        }
        type_codes::ARRAY => {
            let items = value
                .as_array()
                .ok_or_else(|| type_mismatch("array", value))?;
            for item in items {
                encode_array_element(ser, item, signing_only)?;
            }
            ser.write_bytes(&definitions::lookup("ArrayEndMarker")?.header());
        }
        type_codes::PATH_SET => encode_path_set(ser, value)?,
        other => {
            return Err(EncodingError::MalformedValue(format!(
                "unsupported type code: {}",
                other
            )))
        }
    }
    Ok(())
}

/// Array elements are single-key wrappers naming an object-typed field,
/// e.g. `{"Memo": {...}}` inside `Memos`.
fn encode_array_element(
    ser: &mut BinarySerializer,
    item: &Value,
    signing_only: bool,
) -> Result<()> {
    let wrapper = item
        .as_object()
        .filter(|m| m.len() == 1)
        .ok_or_else(|| type_mismatch("single-key object wrapper", item))?;
    let (name, inner) = wrapper.iter().next().unwrap();
    let field = definitions::lookup(name)?;
    if field.type_code != type_codes::OBJECT {
        return Err(EncodingError::MalformedValue(format!(
            "array element {} is not an object field",
            name
        )));
    }
    let inner_map = inner
        .as_object()
        .ok_or_else(|| type_mismatch("object", inner))?;
    ser.write_bytes(&field.header());
    encode_members(ser, inner_map, signing_only)?;
    ser.write_bytes(&definitions::lookup("ObjectEndMarker")?.header());
    Ok(())
}

fn encode_path_set(ser: &mut BinarySerializer, value: &Value) -> Result<()> {
    let paths = value
        .as_array()
        .ok_or_else(|| type_mismatch("array of paths", value))?;
    if paths.is_empty() {
        return Err(EncodingError::MalformedValue("empty path set".into()));
    }
    for (i, path) in paths.iter().enumerate() {
        if i > 0 {
            ser.write_u8(PATH_SEPARATOR);
        }
        let steps = path
            .as_array()
            .ok_or_else(|| type_mismatch("array of path steps", path))?;
        for step in steps {
            encode_path_step(ser, step)?;
        }
    }
    ser.write_u8(PATH_SET_END);
    Ok(())
}

fn encode_path_step(ser: &mut BinarySerializer, step: &Value) -> Result<()> {
    let map = step
        .as_object()
        .ok_or_else(|| type_mismatch("path step object", step))?;

    let account = map.get("account").and_then(Value::as_str);
    let currency = map.get("currency").and_then(Value::as_str);
    let issuer = map.get("issuer").and_then(Value::as_str);

    let mut flags = 0u8;
    if account.is_some() {
        flags |= PATH_STEP_ACCOUNT;
    }
    if currency.is_some() {
        flags |= PATH_STEP_CURRENCY;
    }
    if issuer.is_some() {
        flags |= PATH_STEP_ISSUER;
    }
    if flags == 0 {
        return Err(EncodingError::MalformedValue("empty path step".into()));
    }
    ser.write_u8(flags);

    if let Some(address) = account {
        ser.write_bytes(&address_codec::decode_account_id(address)?);
    }
    if let Some(code) = currency {
        ser.write_bytes(&crate::amount::currency_bytes(code)?);
    }
    if let Some(address) = issuer {
        ser.write_bytes(&address_codec::decode_account_id(address)?);
    }
    Ok(())
}

fn expect_uint(value: &Value, width: u32) -> Result<u64> {
    let n = match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| type_mismatch("unsigned integer", value))?,
        // 64-bit values travel as decimal strings to stay exact in JSON.
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|_| type_mismatch("unsigned integer", value))?,
        _ => return Err(type_mismatch("unsigned integer", value)),
    };
    if width < 64 && n >> width != 0 {
        return Err(EncodingError::IntegerOutOfRange { width, value: n });
    }
    Ok(n)
}

fn expect_hash(value: &Value, len: usize) -> Result<Vec<u8>> {
    let s = value.as_str().ok_or_else(|| type_mismatch("hex string", value))?;
    crate::primitives::decode_hash(s, len)
}

fn type_mismatch(expected: &str, got: &Value) -> EncodingError {
    EncodingError::MalformedValue(format!("expected {}, got {}", expected, got))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ZERO: &str = address_codec::ACCOUNT_ZERO;
    const ONE: &str = address_codec::ACCOUNT_ONE;

    fn as_map(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_known_payment_encoding() {
        // Hand-derived canonical bytes over the zero/one account constants.
        let tx = as_map(json!({
            "TransactionType": "Payment",
            "Flags": 0,
            "Sequence": 5,
            "Amount": "1000",
            "Fee": "10",
            "SigningPubKey": "",
            "Account": ZERO,
            "Destination": ONE,
        }));
        let expected = concat!(
            "120000",               // TransactionType = Payment
            "2200000000",           // Flags = 0
            "2400000005",           // Sequence = 5
            "614000000000000003E8", // Amount = 1000 drops
            "68400000000000000A",   // Fee = 10 drops
            "7300",                 // SigningPubKey, zero length
            "81140000000000000000000000000000000000000000", // Account
            "83140000000000000000000000000000000000000001", // Destination
        );
        assert_eq!(hex::encode_upper(encode(&tx).unwrap()), expected);
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let a = as_map(json!({
            "Account": ZERO,
            "Amount": "1000",
            "Fee": "10",
            "TransactionType": "Payment",
            "Destination": ONE,
            "Sequence": 5,
        }));
        let b = as_map(json!({
            "Fee": "10",
            "Sequence": 5,
            "Destination": ONE,
            "Amount": "1000",
            "TransactionType": "Payment",
            "Account": ZERO,
        }));
        assert_eq!(encode(&a).unwrap(), encode(&b).unwrap());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let tx = as_map(json!({"Account": ZERO, "NotARealField": 1}));
        let err = encode(&tx).unwrap_err();
        assert!(matches!(err, EncodingError::UnknownField(name) if name == "NotARealField"));
    }

    #[test]
    fn test_null_and_empty_sentinels() {
        // null is always absent; empty Domain is this field's absent form
        let with = as_map(json!({"Account": ZERO, "Domain": "", "Sequence": null}));
        let without = as_map(json!({"Account": ZERO}));
        assert_eq!(encode(&with).unwrap(), encode(&without).unwrap());

        // an empty SigningPubKey is NOT a sentinel and must serialize
        let a = as_map(json!({"Account": ZERO, "SigningPubKey": ""}));
        let b = as_map(json!({"Account": ZERO}));
        assert_ne!(encode(&a).unwrap(), encode(&b).unwrap());
    }

    #[test]
    fn test_signing_filter_drops_signature() {
        let tx = as_map(json!({
            "Account": ZERO,
            "Sequence": 1,
            "TxnSignature": "DEADBEEF",
        }));
        let full = encode(&tx).unwrap();
        let signing = encode_for_signing(&tx).unwrap();
        assert!(full.len() > signing.len());
        let unsigned = as_map(json!({"Account": ZERO, "Sequence": 1}));
        assert_eq!(signing, encode(&unsigned).unwrap());
    }

    #[test]
    fn test_nested_memo_array() {
        let tx = as_map(json!({
            "Account": ZERO,
            "Memos": [
                {"Memo": {"MemoType": "AB", "MemoData": "CD"}},
            ],
        }));
        let bytes = encode(&tx).unwrap();
        let hex_str = hex::encode_upper(&bytes);
        // Memos header (F9), Memo header (EA), MemoType (7C 01 AB),
        // MemoData (7D 01 CD), object end (E1), array end (F1)
        assert!(hex_str.ends_with("F9EA7C01AB7D01CDE1F1"));
    }

    #[test]
    fn test_array_element_must_be_wrapped() {
        let tx = as_map(json!({
            "Account": ZERO,
            "Memos": [{"MemoType": "AB", "MemoData": "CD"}],
        }));
        assert!(encode(&tx).unwrap_err().to_string().contains("Memos"));
    }

    #[test]
    fn test_path_set_encoding() {
        let tx = as_map(json!({
            "Account": ZERO,
            "Paths": [
                [{"account": ONE}],
                [{"currency": "USD", "issuer": ONE}],
            ],
        }));
        let bytes = encode(&tx).unwrap();
        let hex_str = hex::encode_upper(&bytes);
        // step flags: 0x01 account step; 0xFF separator; 0x30 currency+issuer
        let paths_part = concat!(
            "0112",
            "01",
            "0000000000000000000000000000000000000001",
            "FF",
            "30",
            "0000000000000000000000005553440000000000",
            "0000000000000000000000000000000000000001",
            "00",
        );
        assert!(hex_str.ends_with(paths_part));
    }

    #[test]
    fn test_error_annotated_with_field_name() {
        let tx = as_map(json!({"Account": ZERO, "Amount": "not-a-number"}));
        let err = encode(&tx).unwrap_err();
        assert!(matches!(err, EncodingError::Field { ref field, .. } if field == "Amount"));
    }

    #[test]
    fn test_uint64_accepts_string() {
        let a = as_map(json!({"MaximumAmount": "9223372036854775807"}));
        let bytes = encode(&a).unwrap();
        // header [0x30, 24] then the value
        assert_eq!(hex::encode_upper(&bytes), "30187FFFFFFFFFFFFFFF");
    }

    #[test]
    fn test_tick_size_three_byte_header() {
        let a = as_map(json!({"TickSize": 5}));
        assert_eq!(hex::encode_upper(encode(&a).unwrap()), "00101005");
    }
}
