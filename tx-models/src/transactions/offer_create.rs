//! OfferCreate: place an order on the decentralized exchange

use crate::common::CommonFields;
use crate::flags::offer_create::{TF_FILL_OR_KILL, TF_IMMEDIATE_OR_CANCEL};
use binary_codec::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An exchange offer: what the taker pays for what the taker gets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferCreate {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// Amount the taker must pay
    pub taker_pays: Amount,
    /// Amount the taker receives
    pub taker_gets: Amount,
    /// Time after which the offer is no longer active
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expiration: Option<u32>,
    /// Sequence of an existing offer to replace
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub offer_sequence: Option<u32>,
}

/// Asset identity of an amount, for same-asset comparisons.
fn asset_key(amount: &Amount) -> String {
    match amount {
        Amount::Native(_) => "native".into(),
        Amount::Issued(a) => format!("{}/{}", a.currency, a.issuer),
        Amount::Mpt(a) => a.issuance_id.clone(),
    }
}

impl OfferCreate {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        if asset_key(&self.taker_pays) == asset_key(&self.taker_gets) {
            errors.insert(
                "taker_gets".into(),
                "taker_pays and taker_gets must name different assets".into(),
            );
        }

        if let Some(flags) = self.common.flags {
            if flags.contains(TF_IMMEDIATE_OR_CANCEL) && flags.contains(TF_FILL_OR_KILL) {
                errors.insert(
                    "flags".into(),
                    "immediate-or-cancel and fill-or-kill are mutually exclusive".into(),
                );
            }
        }
    }
}
