//! AMMCreate: fund a new automated market maker pool

use crate::common::CommonFields;
use binary_codec::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest allowed trading fee, in units of 1/100,000 (1000 = 1%).
pub const MAX_TRADING_FEE: u16 = 1000;

/// Create a two-asset liquidity pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmmCreate {
    /// Common transaction fields
    #[serde(flatten)]
    pub common: CommonFields,
    /// First pool asset deposit
    pub amount: Amount,
    /// Second pool asset deposit
    pub amount2: Amount,
    /// Fee charged on trades against the pool
    pub trading_fee: u16,
}

fn asset_key(amount: &Amount) -> String {
    match amount {
        Amount::Native(_) => "native".into(),
        Amount::Issued(a) => format!("{}/{}", a.currency, a.issuer),
        Amount::Mpt(a) => a.issuance_id.clone(),
    }
}

impl AmmCreate {
    pub(crate) fn collect_type_errors(&self, errors: &mut BTreeMap<String, String>) {
        if self.trading_fee > MAX_TRADING_FEE {
            errors.insert(
                "trading_fee".into(),
                format!("cannot exceed {}", MAX_TRADING_FEE),
            );
        }
        if asset_key(&self.amount) == asset_key(&self.amount2) {
            errors.insert(
                "amount2".into(),
                "pool assets must be different".into(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::Transaction;
    use binary_codec::IssuedAmount;
    use serde_json::json;

    const ISSUER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    fn base() -> AmmCreate {
        AmmCreate {
            common: CommonFields::new(address_codec::ACCOUNT_ONE),
            amount: Amount::Native(10_000_000),
            amount2: Amount::Issued(IssuedAmount::new("USD", ISSUER, "10").unwrap()),
            trading_fee: 500,
        }
    }

    #[test]
    fn test_trading_fee_boundaries() {
        let mut tx = base();

        tx.trading_fee = 1000;
        assert!(Transaction::AmmCreate(tx.clone()).is_valid());

        tx.trading_fee = 1001;
        assert!(Transaction::AmmCreate(tx.clone())
            .get_errors()
            .contains_key("trading_fee"));

        tx.trading_fee = 0;
        assert!(Transaction::AmmCreate(tx).is_valid());
    }

    #[test]
    fn test_negative_trading_fee_fails_at_construction() {
        // The unsigned field rejects -1 before validation ever runs
        let result = Transaction::from_dict(&json!({
            "transaction_type": "AMMCreate",
            "account": address_codec::ACCOUNT_ONE,
            "amount": "10000000",
            "amount2": {"currency": "USD", "issuer": ISSUER, "value": "10"},
            "trading_fee": -1,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_identical_assets_rejected() {
        let mut tx = base();
        tx.amount2 = tx.amount.clone();
        assert!(Transaction::AmmCreate(tx)
            .get_errors()
            .contains_key("amount2"));
    }
}
