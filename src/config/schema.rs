//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a wallet
//! session. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Chain id of the Sepolia test network.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Root configuration for a wallet session.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// The single network this application accepts.
    pub network: NetworkConfig,

    /// Wallet endpoint and polling settings.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Required network descriptor.
///
/// Mirrors the parameters of `wallet_addEthereumChain`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Chain ID (11155111 for Sepolia).
    pub chain_id: u64,

    /// Display name shown by the wallet.
    pub chain_name: String,

    /// Native currency of the chain.
    pub native_currency: NativeCurrency,

    /// Public JSON-RPC endpoints handed to the wallet on add-network.
    pub rpc_urls: Vec<String>,

    /// Block explorer base URL.
    pub block_explorer_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: SEPOLIA_CHAIN_ID,
            chain_name: "Sepolia".to_string(),
            native_currency: NativeCurrency::default(),
            rpc_urls: vec!["https://rpc.sepolia.org".to_string()],
            block_explorer_url: "https://sepolia.etherscan.io".to_string(),
        }
    }
}

/// Native currency of a network.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for NativeCurrency {
    fn default() -> Self {
        Self {
            name: "Sepolia Ether".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }
}

/// Wallet adapter configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of the wallet (e.g., a local dev node with unlocked accounts).
    pub rpc_url: String,

    /// Timeout for a single wallet request in seconds.
    pub request_timeout_secs: u64,

    /// Interval between account/chain polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Silently reconnect on startup when accounts are already authorized.
    pub auto_connect: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            request_timeout_secs: 30,
            poll_interval_ms: 2000,
            auto_connect: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as single-line compact records instead of the full format.
    pub compact: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            compact: false,
        }
    }
}
