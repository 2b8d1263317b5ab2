//! Wallet session management for an injected blockchain wallet.
//!
//! Connects to a wallet, keeps it on one required network and reconciles
//! account / network changes the wallet makes on its own.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod network;
pub mod notify;
pub mod observability;
pub mod provider;
pub mod session;

pub use config::schema::SessionConfig;
pub use error::{ProviderError, SessionError};
pub use notify::Notifier;
pub use provider::WalletProvider;
pub use session::{AutoConnectProbe, ConnectionManager, EventBridge, SessionSnapshot, SessionStatus};
