//! Error taxonomy for wallet sessions.
//!
//! # Layers
//! ```text
//! ProviderError  (raw adapter failure, carries wallet error code)
//!     → SessionError::from_provider (classification)
//!     → Notifier (user-facing message) + tracing (structured log)
//! ```

use thiserror::Error;

/// Wallet error code for a request the user declined (EIP-1193).
pub const USER_REJECTED_CODE: i64 = 4001;

/// Wallet error code for a chain the wallet has never been told about.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Failures reported by a wallet provider adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The wallet answered with a JSON-RPC error object.
    #[error("wallet error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// No wallet is reachable behind the adapter.
    #[error("wallet provider unavailable")]
    Unavailable,

    /// The wallet did not answer in time.
    #[error("wallet request timed out after {0} seconds")]
    Timeout(u64),

    /// Transport-level failure (connection refused, broken pipe, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The wallet answered with something we could not decode.
    #[error("invalid wallet response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Wallet-reported error code, if any.
    pub fn code(&self) -> Option<i64> {
        match self {
            ProviderError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_user_rejected(&self) -> bool {
        self.code() == Some(USER_REJECTED_CODE)
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code() == Some(UNRECOGNIZED_CHAIN_CODE)
    }
}

/// Result type for adapter calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Closed set of session-level failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No wallet capability present.
    #[error("no wallet provider available")]
    ProviderUnavailable,

    /// The user declined account access or a switch/add prompt.
    #[error("request rejected by user (code {code})")]
    UserRejected { code: i64 },

    /// The wallet does not know the required chain.
    #[error("chain {chain_id} is not recognized by the wallet")]
    NetworkUnrecognized { chain_id: u64 },

    /// Switching to the required chain failed.
    #[error("failed to switch to chain {chain_id}: {reason}")]
    NetworkSwitchFailed { chain_id: u64, reason: String },

    /// Adding the required chain to the wallet failed.
    #[error("failed to add chain {chain_id}: {reason}")]
    NetworkAddFailed { chain_id: u64, reason: String },

    /// Any other adapter failure.
    #[error("wallet error: {message}")]
    Unknown { code: Option<i64>, message: String },
}

impl SessionError {
    /// Classify an adapter failure that happened outside the network
    /// switch protocol.
    pub fn from_provider(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable => SessionError::ProviderUnavailable,
            ref e if e.is_user_rejected() => SessionError::UserRejected {
                code: USER_REJECTED_CODE,
            },
            other => SessionError::Unknown {
                code: other.code(),
                message: other.to_string(),
            },
        }
    }

    /// Message shown through the notification sink.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::ProviderUnavailable => {
                "No wallet detected. Please install a browser wallet.".to_string()
            }
            SessionError::UserRejected { .. } => "Request rejected in wallet.".to_string(),
            SessionError::NetworkUnrecognized { chain_id } => {
                format!("Wallet does not know network {}.", chain_id)
            }
            SessionError::NetworkSwitchFailed { .. } => "Failed to switch network.".to_string(),
            SessionError::NetworkAddFailed { .. } => {
                "Failed to add network to wallet.".to_string()
            }
            SessionError::Unknown { .. } => "Failed to connect wallet.".to_string(),
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::ProviderUnavailable => "provider_unavailable",
            SessionError::UserRejected { .. } => "user_rejected",
            SessionError::NetworkUnrecognized { .. } => "network_unrecognized",
            SessionError::NetworkSwitchFailed { .. } => "network_switch_failed",
            SessionError::NetworkAddFailed { .. } => "network_add_failed",
            SessionError::Unknown { .. } => "unknown",
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
