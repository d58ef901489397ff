//! Escrow transactions: create, finish, cancel

use crate::common::CommonFields;
use binary_codec::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lock native currency until a time or crypto-condition releases it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscrowCreate {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Amount to lock; escrows hold native currency only
    pub amount: Amount,
    /// Account to release the funds to
    pub destination: String,
    /// Receiver-side classifier
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub destination_tag: Option<u32>,
    /// Time after which the escrow may be cancelled
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cancel_after: Option<u32>,
    /// Time before which the escrow cannot be finished
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub finish_after: Option<u32>,
    /// Hex-encoded crypto-condition gating release
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub condition: Option<String>,
}

impl EscrowCreate {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        if !self.amount.is_native() {
            errors.insert("amount".into(), "escrows hold the native currency only".into());
        }
        if !address_codec::is_valid_address(&self.destination) {
            errors.insert("destination".into(), "invalid destination address".into());
        }
        if let (Some(cancel), Some(finish)) = (self.cancel_after, self.finish_after) {
            if finish >= cancel {
                errors.insert(
                    "cancel_after".into(),
                    "must be later than finish_after".into(),
                );
            }
        }
        if self.finish_after.is_none() && self.condition.is_none() {
            errors.insert(
                "escrow_create".into(),
                "requires at least one of finish_after or condition".into(),
            );
        }
    }
}

/// Release an escrow once its condition or time gate is satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscrowFinish {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Account that created the escrow
    pub owner: String,
    /// Sequence of the escrow-creating transaction
    pub offer_sequence: u32,
    /// Hex-encoded condition matching the escrow's
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub condition: Option<String>,
    /// Hex-encoded fulfillment of the condition
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fulfillment: Option<String>,
}

impl EscrowFinish {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        if !address_codec::is_valid_address(&self.owner) {
            errors.insert("owner".into(), "invalid owner address".into());
        }
        // The condition and its fulfillment only make sense together
        match (&self.condition, &self.fulfillment) {
            (Some(_), None) => {
                errors.insert(
                    "fulfillment".into(),
                    "required when condition is present".into(),
                );
            }
            (None, Some(_)) => {
                errors.insert(
                    "condition".into(),
                    "required when fulfillment is present".into(),
                );
            }
            _ => {}
        }
    }
}

/// Cancel an expired escrow, returning the funds to its creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscrowCancel {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Account that created the escrow
    pub owner: String,
    /// Sequence of the escrow-creating transaction
    pub offer_sequence: u32,
}

impl EscrowCancel {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        if !address_codec::is_valid_address(&self.owner) {
            errors.insert("owner".into(), "invalid owner address".into());
        }
    }
}
