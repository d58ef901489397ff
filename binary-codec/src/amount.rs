//! Amount codec: native drops, issued-currency, and token amounts
//!
//! An amount is an explicit three-variant union. The JSON shape is resolved
//! once, at parse time (`Amount::from_json`); the encoder itself never
//! inspects shapes. Wire widths: 8 bytes (native), 48 bytes (issued),
//! 33 bytes (token).
//!
//! Bit layout is a compatibility fixture, pinned byte-for-byte by the unit
//! tests below:
//! - native: bit 63 clear, bit 62 set (positive), low 62 bits = drops
//! - issued: bit 63 set, bit 62 = sign (1 positive), bits 54-61 =
//!   exponent + 97, bits 0-53 = mantissa; zero is `0x8000000000000000`;
//!   followed by 160-bit currency and 160-bit issuer
//! - token: leading byte `0x60`, u64 value, 192-bit issuance id

use crate::{EncodingError, Result};
use address_codec::{decode_account_id, encode_account_id, ACCOUNT_ID_LEN};
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::sync::OnceLock;

/// Maximum supply of the native currency, in drops (10^17).
pub const MAX_DROPS: u64 = 100_000_000_000_000_000;

/// Drops per whole unit of the native currency.
pub const DROPS_PER_NATIVE: u64 = 1_000_000;

/// Currency code reserved for the native currency; invalid in issued amounts.
pub const NATIVE_CODE: &str = "KEL";

/// Smallest normalized issued-value mantissa (10^15).
const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
/// Largest normalized issued-value mantissa (10^16 - 1).
const MAX_MANTISSA: u64 = 9_999_999_999_999_999;
/// Issued-value exponent range after normalization.
const MIN_EXPONENT: i32 = -96;
const MAX_EXPONENT: i32 = 80;

const NOT_NATIVE_BIT: u64 = 0x8000_0000_0000_0000;
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;
const MANTISSA_MASK: u64 = (1 << 54) - 1;

/// Leading byte of a positive token amount (not-native and sign bits, token
/// marker).
const MPT_LEADING_BYTE: u8 = 0x60;

/// Byte length of a token issuance id (192 bits).
pub const ISSUANCE_ID_LEN: usize = 24;

fn currency_iso_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]{3}$").unwrap())
}

fn currency_hex_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9A-Fa-f]{40}$").unwrap())
}

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?\d+(\.\d+)?([eE][+-]?\d{1,4})?$").unwrap())
}

/// An issued-currency amount: currency code, issuing account, decimal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAmount {
    /// 3-character code or 40-hex nonstandard code
    pub currency: String,
    /// Issuing account address
    pub issuer: String,
    /// Decimal value as a string
    pub value: String,
}

impl IssuedAmount {
    /// Construct with validation; the value is canonicalized (no exponent
    /// notation, no trailing zeros) so equal values compare equal.
    pub fn new(currency: &str, issuer: &str, value: &str) -> Result<Self> {
        validate_currency(currency)?;
        let issuer_id = decode_account_id(issuer)
            .map_err(|e| EncodingError::InvalidIssuer(e.to_string()))?;
        if issuer_id == [0u8; ACCOUNT_ID_LEN] {
            return Err(EncodingError::InvalidIssuer(
                "issuer must be a non-zero account".into(),
            ));
        }
        let (neg, mantissa, exponent) = parse_issued_value(value)?;
        Ok(Self {
            currency: currency.to_string(),
            issuer: issuer.to_string(),
            value: format_issued_value(neg, mantissa, exponent),
        })
    }
}

/// A token amount: issuance id plus non-negative integer value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MptAmount {
    /// 48-hex issuance identifier
    pub issuance_id: String,
    /// Integer value as a decimal string, within `[0, 2^63 - 1]`
    pub value: String,
}

impl MptAmount {
    /// Construct with validation.
    pub fn new(issuance_id: &str, value: &str) -> Result<Self> {
        let id = issuance_id_bytes(issuance_id)?;
        let v = mpt_value(value)?;
        Ok(Self {
            issuance_id: hex::encode_upper(id),
            value: v.to_string(),
        })
    }
}

/// Tagged amount union; exactly one variant is ever active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    /// Native currency, in drops
    Native(u64),
    /// Issued currency
    Issued(IssuedAmount),
    /// Multi-purpose token
    Mpt(MptAmount),
}

impl Amount {
    /// Whether this is a native-drops amount.
    pub fn is_native(&self) -> bool {
        matches!(self, Amount::Native(_))
    }

    /// Resolve an amount from its JSON interchange shape.
    ///
    /// A string is native drops; an object with `mpt_issuance_id` is a token
    /// amount; an object with `currency`/`issuer`/`value` is an issued
    /// amount. Shape detection happens here and nowhere else.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => {
                let drops: u64 = s.parse().map_err(|_| {
                    EncodingError::MalformedValue(format!("invalid drops value: {}", s))
                })?;
                if drops > MAX_DROPS {
                    return Err(EncodingError::AmountOutOfRange(format!(
                        "{} drops exceeds maximum {}",
                        drops, MAX_DROPS
                    )));
                }
                Ok(Amount::Native(drops))
            }
            Value::Object(map) => {
                let get = |key: &str| -> Result<&str> {
                    map.get(key).and_then(Value::as_str).ok_or_else(|| {
                        EncodingError::MalformedValue(format!("amount missing key: {}", key))
                    })
                };
                if map.contains_key("mpt_issuance_id") {
                    Ok(Amount::Mpt(MptAmount::new(
                        get("mpt_issuance_id")?,
                        get("value")?,
                    )?))
                } else {
                    Ok(Amount::Issued(IssuedAmount::new(
                        get("currency")?,
                        get("issuer")?,
                        get("value")?,
                    )?))
                }
            }
            other => Err(EncodingError::MalformedValue(format!(
                "not an amount: {}",
                other
            ))),
        }
    }

    /// Encode to the canonical wire bytes (8, 48, or 33 bytes).
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Amount::Native(drops) => {
                if *drops > MAX_DROPS {
                    return Err(EncodingError::AmountOutOfRange(format!(
                        "{} drops exceeds maximum {}",
                        drops, MAX_DROPS
                    )));
                }
                Ok((drops | POSITIVE_BIT).to_be_bytes().to_vec())
            }
            Amount::Issued(a) => {
                let (neg, mantissa, exponent) = parse_issued_value(&a.value)?;
                let mut bits = NOT_NATIVE_BIT;
                if mantissa != 0 {
                    if !neg {
                        bits |= POSITIVE_BIT;
                    }
                    bits |= ((exponent + 97) as u64) << 54;
                    bits |= mantissa;
                }
                let mut out = Vec::with_capacity(48);
                out.extend_from_slice(&bits.to_be_bytes());
                out.extend_from_slice(&encode_currency(&a.currency)?);
                let issuer = decode_account_id(&a.issuer)
                    .map_err(|e| EncodingError::InvalidIssuer(e.to_string()))?;
                if issuer == [0u8; ACCOUNT_ID_LEN] {
                    return Err(EncodingError::InvalidIssuer(
                        "issuer must be a non-zero account".into(),
                    ));
                }
                out.extend_from_slice(&issuer);
                Ok(out)
            }
            Amount::Mpt(a) => {
                let value = mpt_value(&a.value)?;
                let id = issuance_id_bytes(&a.issuance_id)?;
                let mut out = Vec::with_capacity(33);
                out.push(MPT_LEADING_BYTE);
                out.extend_from_slice(&value.to_be_bytes());
                out.extend_from_slice(&id);
                Ok(out)
            }
        }
    }

    /// Decode wire bytes, consuming the whole slice.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let leading = *bytes.first().ok_or(EncodingError::UnexpectedEnd(0))?;
        if leading & 0x80 != 0 {
            Self::decode_issued(bytes)
        } else if leading & 0x20 != 0 {
            Self::decode_mpt(bytes)
        } else {
            Self::decode_native(bytes)
        }
    }

    /// Wire width implied by the leading byte; used by the parser.
    pub fn wire_len(leading: u8) -> usize {
        if leading & 0x80 != 0 {
            48
        } else if leading & 0x20 != 0 {
            33
        } else {
            8
        }
    }

    fn decode_native(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| EncodingError::WrongLength {
            expected: 8,
            got: bytes.len(),
        })?;
        let bits = u64::from_be_bytes(raw);
        if bits & POSITIVE_BIT == 0 {
            return Err(EncodingError::AmountOutOfRange(
                "negative native amount".into(),
            ));
        }
        let drops = bits & !POSITIVE_BIT;
        if drops > MAX_DROPS {
            return Err(EncodingError::AmountOutOfRange(format!(
                "{} drops exceeds maximum {}",
                drops, MAX_DROPS
            )));
        }
        Ok(Amount::Native(drops))
    }

    fn decode_issued(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 48 {
            return Err(EncodingError::WrongLength {
                expected: 48,
                got: bytes.len(),
            });
        }
        let bits = u64::from_be_bytes(bytes[..8].try_into().unwrap());
        let value = if bits == NOT_NATIVE_BIT {
            format_issued_value(false, 0, 0)
        } else {
            let neg = bits & POSITIVE_BIT == 0;
            let exponent = ((bits >> 54) & 0xFF) as i32 - 97;
            let mantissa = bits & MANTISSA_MASK;
            if !(MIN_MANTISSA..=MAX_MANTISSA).contains(&mantissa)
                || !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent)
            {
                return Err(EncodingError::MalformedValue(
                    "non-canonical issued amount".into(),
                ));
            }
            format_issued_value(neg, mantissa, exponent)
        };
        let currency = decode_currency(bytes[8..28].try_into().unwrap())?;
        let issuer: [u8; ACCOUNT_ID_LEN] = bytes[28..48].try_into().unwrap();
        Ok(Amount::Issued(IssuedAmount {
            currency,
            issuer: encode_account_id(&issuer),
            value,
        }))
    }

    fn decode_mpt(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 33 {
            return Err(EncodingError::WrongLength {
                expected: 33,
                got: bytes.len(),
            });
        }
        if bytes[0] != MPT_LEADING_BYTE {
            return Err(EncodingError::MalformedValue(format!(
                "unexpected token amount marker: {:#04x}",
                bytes[0]
            )));
        }
        let value = u64::from_be_bytes(bytes[1..9].try_into().unwrap());
        if value > i64::MAX as u64 {
            return Err(EncodingError::ValueOutOfRange(value.to_string()));
        }
        Ok(Amount::Mpt(MptAmount {
            issuance_id: hex::encode_upper(&bytes[9..33]),
            value: value.to_string(),
        }))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Amount::Native(drops) => serializer.serialize_str(&drops.to_string()),
            Amount::Issued(a) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("currency", &a.currency)?;
                map.serialize_entry("issuer", &a.issuer)?;
                map.serialize_entry("value", &a.value)?;
                map.end()
            }
            Amount::Mpt(a) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("mpt_issuance_id", &a.issuance_id)?;
                map.serialize_entry("value", &a.value)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Amount::from_json(&value).map_err(D::Error::custom)
    }
}

/// Validate an issued-currency code without encoding it.
pub fn validate_currency(code: &str) -> Result<()> {
    encode_currency(code).map(|_| ())
}

/// Encode a currency code into its 160-bit layout (used for path steps and
/// order-book keys as well as issued amounts).
pub fn currency_bytes(code: &str) -> Result<[u8; 20]> {
    encode_currency(code)
}

/// Decode a 160-bit currency layout back to its code string.
pub fn currency_from_bytes(bytes: [u8; 20]) -> Result<String> {
    decode_currency(bytes)
}

/// Encode a currency code into its 160-bit layout.
fn encode_currency(code: &str) -> Result<[u8; 20]> {
    let mut out = [0u8; 20];
    if currency_iso_re().is_match(code) {
        if code == NATIVE_CODE {
            return Err(EncodingError::InvalidCurrencyCode(format!(
                "{} is the native currency and cannot be issued",
                code
            )));
        }
        out[12..15].copy_from_slice(code.as_bytes());
        Ok(out)
    } else if currency_hex_re().is_match(code) {
        let bytes = hex::decode(code).map_err(|_| {
            EncodingError::InvalidCurrencyCode(code.to_string())
        })?;
        // A zero first byte is the standard-format marker; nonstandard codes
        // must not collide with it.
        if bytes[0] == 0 {
            return Err(EncodingError::InvalidCurrencyCode(format!(
                "nonstandard code must not start with 0x00: {}",
                code
            )));
        }
        out.copy_from_slice(&bytes);
        Ok(out)
    } else {
        Err(EncodingError::InvalidCurrencyCode(code.to_string()))
    }
}

/// Decode a 160-bit currency layout back to its code string.
fn decode_currency(bytes: [u8; 20]) -> Result<String> {
    if bytes[0] != 0 {
        return Ok(hex::encode_upper(bytes));
    }
    let code = std::str::from_utf8(&bytes[12..15])
        .map_err(|_| EncodingError::InvalidCurrencyCode(hex::encode_upper(bytes)))?
        .to_string();
    if !currency_iso_re().is_match(&code) || code == NATIVE_CODE {
        return Err(EncodingError::InvalidCurrencyCode(hex::encode_upper(bytes)));
    }
    // Standard layout allows nothing outside the three code bytes.
    let mut expected = [0u8; 20];
    expected[12..15].copy_from_slice(code.as_bytes());
    if expected != bytes {
        return Err(EncodingError::InvalidCurrencyCode(hex::encode_upper(bytes)));
    }
    Ok(code)
}

fn issuance_id_bytes(issuance_id: &str) -> Result<[u8; ISSUANCE_ID_LEN]> {
    if issuance_id.len() != ISSUANCE_ID_LEN * 2 {
        return Err(EncodingError::InvalidIssuanceId(issuance_id.to_string()));
    }
    let bytes = hex::decode(issuance_id)
        .map_err(|_| EncodingError::InvalidIssuanceId(issuance_id.to_string()))?;
    Ok(bytes.try_into().unwrap())
}

fn mpt_value(value: &str) -> Result<u64> {
    let v: u64 = value
        .parse()
        .map_err(|_| EncodingError::ValueOutOfRange(value.to_string()))?;
    if v > i64::MAX as u64 {
        return Err(EncodingError::ValueOutOfRange(value.to_string()));
    }
    Ok(v)
}

// =========================================================================
// ISSUED-VALUE NORMALIZATION
// =========================================================================

/// Parse a decimal string into normalized `(negative, mantissa, exponent)`.
///
/// The mantissa lands in `[10^15, 10^16)` (or zero); values needing more
/// than 16 significant digits fail rather than round.
pub fn parse_issued_value(value: &str) -> Result<(bool, u64, i32)> {
    if !decimal_re().is_match(value) {
        return Err(EncodingError::MalformedValue(format!(
            "invalid decimal value: {}",
            value
        )));
    }

    let (sign_part, rest) = match value.as_bytes()[0] {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };
    let (number, exp_part) = match rest.find(['e', 'E']) {
        Some(i) => (&rest[..i], rest[i + 1..].parse::<i32>().unwrap_or(0)),
        None => (rest, 0),
    };
    let (int_part, frac_part) = match number.find('.') {
        Some(i) => (&number[..i], &number[i + 1..]),
        None => (number, ""),
    };

    let mut digits = String::with_capacity(int_part.len() + frac_part.len());
    digits.push_str(int_part);
    digits.push_str(frac_part);
    let mut exponent = exp_part - frac_part.len() as i32;

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok((false, 0, 0));
    }
    let trimmed = digits.trim_end_matches('0');
    exponent += (digits.len() - trimmed.len()) as i32;

    if trimmed.len() > 16 {
        return Err(EncodingError::PrecisionLoss(format!(
            "{} has more than 16 significant digits",
            value
        )));
    }
    let mut mantissa: u64 = trimmed
        .parse()
        .map_err(|_| EncodingError::MalformedValue(value.to_string()))?;

    while mantissa < MIN_MANTISSA {
        mantissa *= 10;
        exponent -= 1;
    }

    if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
        return Err(EncodingError::AmountOutOfRange(format!(
            "exponent {} outside [{}, {}]",
            exponent, MIN_EXPONENT, MAX_EXPONENT
        )));
    }
    Ok((sign_part, mantissa, exponent))
}

/// Render a normalized `(negative, mantissa, exponent)` canonically: plain
/// decimal notation, no trailing zeros, no exponent marker.
pub fn format_issued_value(negative: bool, mantissa: u64, exponent: i32) -> String {
    if mantissa == 0 {
        return "0".to_string();
    }
    let digits = mantissa.to_string();
    let trimmed = digits.trim_end_matches('0');
    let exponent = exponent + (digits.len() - trimmed.len()) as i32;

    let body = if exponent >= 0 {
        let mut s = trimmed.to_string();
        s.extend(std::iter::repeat('0').take(exponent as usize));
        s
    } else {
        let point = trimmed.len() as i32 + exponent;
        if point > 0 {
            format!("{}.{}", &trimmed[..point as usize], &trimmed[point as usize..])
        } else {
            let mut s = String::from("0.");
            s.extend(std::iter::repeat('0').take((-point) as usize));
            s.push_str(trimmed);
            s
        }
    };
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

// =========================================================================
// NATIVE-UNIT CONVERSIONS
// =========================================================================

/// Convert a whole-unit native value to drops, exactly.
pub fn native_to_drops(value: Decimal) -> Result<u64> {
    if value.is_sign_negative() {
        return Err(EncodingError::AmountOutOfRange(value.to_string()));
    }
    let scaled = value
        .checked_mul(Decimal::from(DROPS_PER_NATIVE))
        .ok_or_else(|| EncodingError::AmountOutOfRange(value.to_string()))?;
    if scaled.fract() != Decimal::ZERO {
        return Err(EncodingError::PrecisionLoss(format!(
            "{} is finer than one drop",
            value
        )));
    }
    let drops = scaled
        .to_u64()
        .ok_or_else(|| EncodingError::AmountOutOfRange(value.to_string()))?;
    if drops > MAX_DROPS {
        return Err(EncodingError::AmountOutOfRange(format!(
            "{} drops exceeds maximum {}",
            drops, MAX_DROPS
        )));
    }
    Ok(drops)
}

/// Convert drops to a whole-unit native value.
pub fn drops_to_native(drops: u64) -> Result<Decimal> {
    if drops > MAX_DROPS {
        return Err(EncodingError::AmountOutOfRange(format!(
            "{} drops exceeds maximum {}",
            drops, MAX_DROPS
        )));
    }
    Ok(Decimal::new(drops as i64, 6).normalize())
}
