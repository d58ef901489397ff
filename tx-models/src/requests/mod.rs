//! Request model layer
//!
//! RPC requests follow the same validate-then-serialize discipline as
//! transactions, without signing or hashing. One canonical field map derives
//! both wire shapes losslessly: the HTTP form (`method` + single-element
//! `params` array) and the message-oriented form (`command` + inline fields
//! + correlation id).

use crate::{ModelError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// A ledger identifier: numeric index or a named shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerIndex {
    /// Explicit ledger index
    Number(u32),
    /// One of "validated", "closed", or "current"
    Shortcut(String),
}

impl LedgerIndex {
    fn collect_errors(&self, errors: &mut BTreeMap<String, String>) {
        if let LedgerIndex::Shortcut(s) = self {
            if !matches!(s.as_str(), "validated" | "closed" | "current") {
                errors.insert(
                    "ledger_index".into(),
                    "must be a number, or one of validated, closed, current".into(),
                );
            }
        }
    }
}

/// An RPC request, one variant per server method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    /// Account balance and settings
    AccountInfo {
        /// Account to look up
        account: String,
        /// Ledger to read from
        #[serde(skip_serializing_if = "Option::is_none", default)]
        ledger_index: Option<LedgerIndex>,
    },
    /// Trust lines attached to an account
    AccountLines {
        /// Account to look up
        account: String,
        /// Restrict to lines shared with this counterparty
        #[serde(skip_serializing_if = "Option::is_none", default)]
        peer: Option<String>,
        /// Ledger to read from
        #[serde(skip_serializing_if = "Option::is_none", default)]
        ledger_index: Option<LedgerIndex>,
    },
    /// Current fee levels
    Fee {},
    /// Ledger header information
    Ledger {
        /// Ledger to read
        #[serde(skip_serializing_if = "Option::is_none", default)]
        ledger_index: Option<LedgerIndex>,
    },
    /// Submit a signed transaction blob
    Submit {
        /// Hex-encoded signed transaction
        tx_blob: String,
        /// Reject instead of retrying on provisional failure
        #[serde(skip_serializing_if = "Option::is_none", default)]
        fail_hard: Option<bool>,
    },
    /// Look up a transaction by hash
    Tx {
        /// 64-hex transaction identifier
        transaction: String,
    },
}

impl Request {
    /// The server method name.
    pub fn method(&self) -> &'static str {
        match self {
            Request::AccountInfo { .. } => "account_info",
            Request::AccountLines { .. } => "account_lines",
            Request::Fee {} => "fee",
            Request::Ledger { .. } => "ledger",
            Request::Submit { .. } => "submit",
            Request::Tx { .. } => "tx",
        }
    }

    /// The canonical field map, without any envelope.
    fn fields(&self) -> Result<Map<String, Value>> {
        let mut map = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(ModelError::Envelope(format!(
                    "request serialized to a non-object: {}",
                    other
                )))
            }
        };
        map.remove("command");
        Ok(map)
    }

    /// The HTTP wire shape: `{"method": ..., "params": [{...}]}`.
    pub fn to_rpc(&self) -> Result<Value> {
        self.validate()?;
        Ok(json!({
            "method": self.method(),
            "params": [Value::Object(self.fields()?)],
        }))
    }

    /// The message-oriented wire shape: `{"command": ..., "id": ..., ...}`.
    pub fn to_websocket(&self, id: u64) -> Result<Value> {
        self.validate()?;
        let mut map = self.fields()?;
        map.insert("command".into(), json!(self.method()));
        map.insert("id".into(), json!(id));
        Ok(Value::Object(map))
    }

    /// Run every validation predicate and collect the failures.
    pub fn get_errors(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        match self {
            Request::AccountInfo {
                account,
                ledger_index,
            } => {
                check_account(account, &mut errors);
                if let Some(index) = ledger_index {
                    index.collect_errors(&mut errors);
                }
            }
            Request::AccountLines {
                account,
                peer,
                ledger_index,
            } => {
                check_account(account, &mut errors);
                if let Some(peer) = peer {
                    if !address_codec::is_valid_address(peer) {
                        errors.insert("peer".into(), "invalid account address".into());
                    }
                }
                if let Some(index) = ledger_index {
                    index.collect_errors(&mut errors);
                }
            }
            Request::Fee {} => {}
            Request::Ledger { ledger_index } => {
                if let Some(index) = ledger_index {
                    index.collect_errors(&mut errors);
                }
            }
            Request::Submit { tx_blob, .. } => {
                if tx_blob.is_empty() || hex::decode(tx_blob).is_err() {
                    errors.insert("tx_blob".into(), "must be non-empty hex".into());
                }
            }
            Request::Tx { transaction } => {
                if !crate::common::is_hex_of_len(transaction, 64) {
                    errors.insert(
                        "transaction".into(),
                        "must be 64 hexadecimal characters".into(),
                    );
                }
            }
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
}

fn check_account(account: &str, errors: &mut BTreeMap<String, String>) {
    if !address_codec::is_valid_address(account) {
        errors.insert("account".into(), "invalid account address".into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_shape() {
        let request = Request::AccountInfo {
            account: address_codec::ACCOUNT_ONE.into(),
            ledger_index: Some(LedgerIndex::Shortcut("validated".into())),
        };
        let rpc = request.to_rpc().unwrap();
        assert_eq!(rpc["method"], "account_info");
        assert_eq!(rpc["params"][0]["account"], address_codec::ACCOUNT_ONE);
        assert_eq!(rpc["params"][0]["ledger_index"], "validated");
        assert!(rpc["params"][0].get("command").is_none());
    }

    #[test]
    fn test_websocket_shape() {
        let request = Request::Submit {
            tx_blob: "DEADBEEF".into(),
            fail_hard: Some(true),
        };
        let ws = request.to_websocket(7).unwrap();
        assert_eq!(ws["command"], "submit");
        assert_eq!(ws["id"], 7);
        assert_eq!(ws["tx_blob"], "DEADBEEF");
        assert_eq!(ws["fail_hard"], true);
    }

    #[test]
    fn test_both_shapes_carry_the_same_fields() {
        let request = Request::AccountLines {
            account: address_codec::ACCOUNT_ONE.into(),
            peer: Some(address_codec::ACCOUNT_ZERO.into()),
            ledger_index: Some(LedgerIndex::Number(70_000_000)),
        };
        let rpc = request.to_rpc().unwrap();
        let mut ws = request.to_websocket(1).unwrap();
        let ws_map = ws.as_object_mut().unwrap();
        ws_map.remove("command");
        ws_map.remove("id");
        assert_eq!(&rpc["params"][0], &Value::Object(ws_map.clone()));
    }

    #[test]
    fn test_invalid_account_rejected() {
        let request = Request::AccountInfo {
            account: "garbage".into(),
            ledger_index: None,
        };
        assert!(request.get_errors().contains_key("account"));
        assert!(request.to_rpc().is_err());
    }

    #[test]
    fn test_bad_ledger_shortcut_rejected() {
        let request = Request::Ledger {
            ledger_index: Some(LedgerIndex::Shortcut("latest".into())),
        };
        assert!(request.get_errors().contains_key("ledger_index"));
    }

    #[test]
    fn test_submit_blob_must_be_hex() {
        for blob in ["", "xyz"] {
            let request = Request::Submit {
                tx_blob: blob.into(),
                fail_hard: None,
            };
            assert!(request.get_errors().contains_key("tx_blob"), "{:?}", blob);
        }
    }

    #[test]
    fn test_tx_hash_length() {
        let request = Request::Tx {
            transaction: "AB".repeat(32),
        };
        assert!(request.is_valid());

        let request = Request::Tx {
            transaction: "AB".repeat(31),
        };
        assert!(request.get_errors().contains_key("transaction"));
    }

    #[test]
    fn test_serde_round_trip() {
        let request = Request::Fee {};
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["command"], "fee");
        let back: Request = serde_json::from_value(value).unwrap();
        assert_eq!(back, request);
    }
}
