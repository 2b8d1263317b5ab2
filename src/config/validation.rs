//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the required network descriptor (ids, names, URLs)
//! - Validate value ranges (timeouts > 0, poll interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SessionConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{NetworkConfig, SessionConfig, WalletConfig};

/// Largest decimals value a wallet will accept for a native currency.
const MAX_DECIMALS: u8 = 36;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("network.chain_id must be non-zero")]
    ZeroChainId,

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("network.native_currency.decimals {0} exceeds 36")]
    Decimals(u8),

    #[error("{field} is not a valid http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Validate a whole session configuration.
pub fn validate_config(config: &SessionConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_network(&config.network, &mut errors);
    validate_wallet(&config.wallet, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_network(network: &NetworkConfig, errors: &mut Vec<ValidationError>) {
    if network.chain_id == 0 {
        errors.push(ValidationError::ZeroChainId);
    }
    if network.chain_name.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "network.chain_name",
        });
    }
    if network.native_currency.symbol.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "network.native_currency.symbol",
        });
    }
    if network.native_currency.decimals > MAX_DECIMALS {
        errors.push(ValidationError::Decimals(network.native_currency.decimals));
    }
    if network.rpc_urls.is_empty() {
        errors.push(ValidationError::Empty {
            field: "network.rpc_urls",
        });
    }
    for rpc in &network.rpc_urls {
        check_url("network.rpc_urls", rpc, errors);
    }
    check_url("network.block_explorer_url", &network.block_explorer_url, errors);
}

fn validate_wallet(wallet: &WalletConfig, errors: &mut Vec<ValidationError>) {
    check_url("wallet.rpc_url", &wallet.rpc_url, errors);
    if wallet.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "wallet.request_timeout_secs",
        });
    }
    if wallet.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero {
            field: "wallet.poll_interval_ms",
        });
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let ok = Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !ok {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
