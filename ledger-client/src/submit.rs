//! Submission orchestration: autofill, sign, submit
//!
//! The core's contract here is referential transparency: encode, validate,
//! and hash are pure over the immutable transaction, so a retry submits the
//! byte-identical blob. The network client owns timeouts and retries; this
//! module only sequences the steps.

use crate::config::ClientConfig;
use crate::network::NetworkClient;
use crate::signing::{sign_transaction, SigningCapability};
use crate::{ClientError, Result};
use serde_json::Value;
use tracing::{debug, info};
use tx_models::{LedgerIndex, Request, Response, Transaction};

/// Fill fee, sequence, and expiry from the network, where not already set.
///
/// Returns a new transaction; the input is untouched.
pub async fn autofill<C: NetworkClient>(
    client: &C,
    transaction: Transaction,
    config: &ClientConfig,
) -> Result<Transaction> {
    let account = transaction.common().account.clone();

    let account_info = client
        .request(Request::AccountInfo {
            account,
            ledger_index: Some(LedgerIndex::Shortcut("validated".into())),
        })
        .await?;
    let sequence = read_u64(&account_info, &["account_data", "Sequence"])? as u32;

    let fee_info = client.request(Request::Fee {}).await?;
    let base_fee: u64 = fee_info.result["drops"]["base_fee"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ClientError::Response("fee reply carries no base_fee".into()))?;
    let fee = config.cushioned_fee(base_fee);

    let ledger = client
        .request(Request::Ledger {
            ledger_index: Some(LedgerIndex::Shortcut("validated".into())),
        })
        .await?;
    let current = read_u64(&ledger, &["ledger_index"])? as u32;

    debug!(sequence, fee, current, "autofill complete");
    Ok(transaction.with_autofilled(fee, sequence, current + config.ledger_offset))
}

/// Submit an already-signed transaction.
pub async fn submit<C: NetworkClient>(
    client: &C,
    transaction: &Transaction,
) -> Result<Response> {
    if !transaction.is_signed() {
        return Err(ClientError::Model(tx_models::ModelError::UnsignedTransaction));
    }
    let blob = hex::encode_upper(transaction.to_canonical_bytes()?);
    let hash = transaction.get_hash()?;
    info!(%hash, transaction_type = transaction.transaction_type(), "submitting transaction");
    submit_blob(client, &blob).await
}

/// Submit a pre-encoded signed blob.
pub async fn submit_blob<C: NetworkClient>(client: &C, tx_blob: &str) -> Result<Response> {
    client
        .request(Request::Submit {
            tx_blob: tx_blob.to_string(),
            fail_hard: None,
        })
        .await
}

/// The full pipeline: autofill, sign, submit.
pub async fn sign_and_submit<C: NetworkClient, S: SigningCapability>(
    client: &C,
    transaction: Transaction,
    signer: &S,
    config: &ClientConfig,
) -> Result<Response> {
    let filled = autofill(client, transaction, config).await?;
    let signed = sign_transaction(&filled, signer)?;
    submit(client, &signed).await
}

fn read_u64(response: &Response, path: &[&str]) -> Result<u64> {
    let mut value: &Value = &response.result;
    for key in path {
        value = value
            .get(key)
            .ok_or_else(|| ClientError::Response(format!("reply missing {}", path.join("."))))?;
    }
    value
        .as_u64()
        .ok_or_else(|| ClientError::Response(format!("{} is not an integer", path.join("."))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::MockNetworkClient;
    use crate::signing::Ed25519Signer;
    use serde_json::json;

    async fn canned_client() -> MockNetworkClient {
        let mock = MockNetworkClient::new();
        mock.respond_to(
            "account_info",
            json!({"account_data": {"Sequence": 42}, "validated": true}),
        )
        .await;
        mock.respond_to("fee", json!({"drops": {"base_fee": "10"}})).await;
        mock.respond_to("ledger", json!({"ledger_index": 70_000_000})).await;
        mock.respond_to(
            "submit",
            json!({"engine_result": "tesSUCCESS", "accepted": true}),
        )
        .await;
        mock
    }

    fn unsigned_payment(account: &str) -> Transaction {
        Transaction::from_dict(&json!({
            "transaction_type": "Payment",
            "account": account,
            "destination": address_codec::ACCOUNT_ONE,
            "amount": "1000",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_autofill_fills_from_network() {
        let mock = canned_client().await;
        let config = ClientConfig::default();
        let signer = Ed25519Signer::from_seed(&[8u8; 32]);

        let filled = autofill(&mock, unsigned_payment(&signer.address()), &config)
            .await
            .unwrap();
        assert_eq!(filled.common().sequence, Some(42));
        assert_eq!(filled.common().fee.as_deref(), Some("12"));
        assert_eq!(
            filled.common().last_ledger_sequence,
            Some(70_000_000 + config.ledger_offset)
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_unsigned() {
        let mock = canned_client().await;
        let signer = Ed25519Signer::from_seed(&[8u8; 32]);
        let result = submit(&mock, &unsigned_payment(&signer.address())).await;
        assert!(matches!(
            result,
            Err(ClientError::Model(tx_models::ModelError::UnsignedTransaction))
        ));
    }

    #[tokio::test]
    async fn test_sign_and_submit_pipeline() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
        let mock = canned_client().await;
        let config = ClientConfig::default();
        let signer = Ed25519Signer::from_seed(&[8u8; 32]);

        let response = sign_and_submit(
            &mock,
            unsigned_payment(&signer.address()),
            &signer,
            &config,
        )
        .await
        .unwrap();
        assert!(response.is_successful());
        assert_eq!(response.result["engine_result"], "tesSUCCESS");

        // The submitted blob is a decodable canonical encoding
        let seen = mock.requests_seen().await;
        let blob = match seen.last().unwrap() {
            Request::Submit { tx_blob, .. } => tx_blob.clone(),
            other => panic!("unexpected request: {:?}", other),
        };
        let bytes = hex::decode(blob).unwrap();
        let decoded = binary_codec::decode(&bytes).unwrap();
        assert_eq!(decoded["TransactionType"], "Payment");
        assert!(decoded.contains_key("TxnSignature"));
    }

    #[tokio::test]
    async fn test_missing_reply_field_is_a_response_error() {
        let mock = MockNetworkClient::new();
        mock.respond_to("account_info", json!({"validated": true})).await;
        let config = ClientConfig::default();
        let signer = Ed25519Signer::from_seed(&[8u8; 32]);

        let result = autofill(&mock, unsigned_payment(&signer.address()), &config).await;
        assert!(matches!(result, Err(ClientError::Response(_))));
    }
}
