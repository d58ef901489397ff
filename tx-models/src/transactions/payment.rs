//! Payment: move value from one account to another

use crate::common::CommonFields;
use crate::flags::payment::TF_PARTIAL_PAYMENT;
use binary_codec::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One step in a cross-currency payment path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathStep {
    /// Intermediary account to route through
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub account: Option<String>,
    /// Currency to convert into at this step
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub currency: Option<String>,
    /// Issuer of the currency at this step
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub issuer: Option<String>,
}

/// A value transfer, optionally cross-currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Amount to deliver to the destination
    pub amount: Amount,
    /// Receiving account address
    pub destination: String,
    /// Receiver-side classifier
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub destination_tag: Option<u32>,
    /// Hash tying this payment to an invoice
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub invoice_id: Option<String>,
    /// Most the sender is willing to spend
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub send_max: Option<Amount>,
    /// Least the receiver must get for a partial payment to succeed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deliver_min: Option<Amount>,
    /// Cross-currency routing paths
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub paths: Option<Vec<Vec<PathStep>>>,
}

impl Payment {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        if !address_codec::is_valid_address(&self.destination) {
            errors.insert("destination".into(), "invalid destination address".into());
        } else if self.destination == self.common.account
            && self.paths.is_none()
            && self.send_max.is_none()
        {
            errors.insert(
                "destination".into(),
                "cannot send a payment back to the sender without a cross-currency path".into(),
            );
        }

        if self.deliver_min.is_some() {
            let partial = self
                .common
                .flags
                .map(|f| f.contains(TF_PARTIAL_PAYMENT))
                .unwrap_or(false);
            if !partial {
                errors.insert(
                    "deliver_min".into(),
                    "requires the partial payment flag".into(),
                );
            }
        }

        if let Some(id) = &self.invoice_id {
            if !crate::common::is_hex_of_len(id, 64) {
                errors.insert(
                    "invoice_id".into(),
                    "must be 64 hexadecimal characters".into(),
                );
            }
        }
    }
}
