//! Client configuration

use serde::{Deserialize, Serialize};

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server endpoint URL
    pub endpoint: String,

    /// Per-request timeout (milliseconds)
    pub request_timeout_ms: u64,

    /// How many ledgers past the current one a transaction stays valid
    pub ledger_offset: u32,

    /// Fee configuration
    pub fee: FeeConfig,
}

/// Fee configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Hard ceiling on the fee this client will attach, in drops
    pub max_fee_drops: u64,

    /// Multiplier applied to the server's base fee
    pub fee_cushion: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://localhost:5005".to_string(),
            request_timeout_ms: 10_000,
            ledger_offset: 20,
            fee: FeeConfig::default(),
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            max_fee_drops: 2_000_000,
            fee_cushion: 1.2,
        }
    }
}

impl ClientConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> crate::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply the cushion and cap to a server-reported base fee.
    pub fn cushioned_fee(&self, base_fee_drops: u64) -> u64 {
        let cushioned = (base_fee_drops as f64 * self.fee.fee_cushion).ceil() as u64;
        cushioned.min(self.fee.max_fee_drops)
    }
}
