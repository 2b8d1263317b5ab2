//! Required network descriptor and chain id helpers.

use serde::{Deserialize, Serialize};

use crate::config::schema::NativeCurrency;

// Re-export NetworkConfig from config module to avoid duplication
pub use crate::config::schema::NetworkConfig as NetworkDescriptor;

/// Parameters of a `wallet_addEthereumChain` request (EIP-3085).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    /// Hex-encoded chain id, e.g. `0xaa36a7`.
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl NetworkDescriptor {
    /// Chain id as the `0x`-prefixed lowercase hex string wallets expect.
    pub fn chain_id_hex(&self) -> String {
        to_hex_chain_id(self.chain_id)
    }

    /// Full descriptor for an add-network request.
    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.chain_id_hex(),
            chain_name: self.chain_name.clone(),
            native_currency: self.native_currency.clone(),
            rpc_urls: self.rpc_urls.clone(),
            block_explorer_urls: vec![self.block_explorer_url.clone()],
        }
    }
}

/// Format a chain id as `0x`-prefixed hex.
pub fn to_hex_chain_id(chain_id: u64) -> String {
    format!("{:#x}", chain_id)
}

/// Parse a chain id as reported by a wallet.
///
/// Wallets report hex (`0xaa36a7`); some report decimal strings.
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}
