//! Required-network enforcement.
//!
//! # Switch Protocol
//! ```text
//! wallet_switchEthereumChain(required)
//!     ok                    → Switched
//!     4902 (unrecognized)   → wallet_addEthereumChain(full descriptor)
//!                               ok    → Added
//!                               4001  → UserRejected
//!                               other → NetworkAddFailed
//!     4001 (user rejected)  → UserRejected
//!     other                 → NetworkSwitchFailed
//! ```
//!
//! Switching never marks the session connected; the caller re-attempts
//! the connection.

use std::sync::Arc;

use crate::error::{ProviderError, SessionError, SessionResult, USER_REJECTED_CODE};
use crate::network::descriptor::NetworkDescriptor;
use crate::notify::Notifier;
use crate::observability::metrics;
use crate::provider::WalletProvider;

/// How a successful switch was achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The wallet already knew the network and switched to it.
    Switched,
    /// The network had to be added to the wallet first.
    Added,
}

/// Decides whether a chain is acceptable and drives the switch/add protocol.
pub struct NetworkEnforcer {
    descriptor: NetworkDescriptor,
    notifier: Arc<dyn Notifier>,
}

impl NetworkEnforcer {
    pub fn new(descriptor: NetworkDescriptor, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            descriptor,
            notifier,
        }
    }

    pub fn descriptor(&self) -> &NetworkDescriptor {
        &self.descriptor
    }

    pub fn required_chain_id(&self) -> u64 {
        self.descriptor.chain_id
    }

    /// True if `chain_id` is the required network.
    pub fn verify(&self, chain_id: u64) -> bool {
        chain_id == self.descriptor.chain_id
    }

    /// Read the wallet's active chain id.
    pub async fn current_chain(&self, provider: &dyn WalletProvider) -> SessionResult<u64> {
        provider.chain_id().await.map_err(SessionError::from_provider)
    }

    /// Ask the wallet to move to the required network, adding it if the
    /// wallet has never seen it. Failures are reported to the notifier.
    pub async fn switch(&self, provider: &dyn WalletProvider) -> SessionResult<SwitchOutcome> {
        let chain_id = self.descriptor.chain_id;
        self.notifier
            .loading(&format!("Switching to {}...", self.descriptor.chain_name));

        match provider.switch_chain(&self.descriptor.chain_id_hex()).await {
            Ok(()) => {
                tracing::info!(chain_id, "Wallet switched network");
                metrics::record_network_switch("switched");
                Ok(SwitchOutcome::Switched)
            }
            Err(e) if e.is_unrecognized_chain() => {
                tracing::info!(chain_id, "Network unknown to wallet, requesting add");
                self.add(provider).await
            }
            Err(e) => Err(self.fail(e, |reason| SessionError::NetworkSwitchFailed {
                chain_id,
                reason,
            })),
        }
    }

    async fn add(&self, provider: &dyn WalletProvider) -> SessionResult<SwitchOutcome> {
        let chain_id = self.descriptor.chain_id;
        match provider.add_chain(&self.descriptor.add_chain_params()).await {
            Ok(()) => {
                tracing::info!(chain_id, "Network added to wallet");
                metrics::record_network_switch("added");
                self.notifier
                    .success(&format!("{} added to wallet.", self.descriptor.chain_name));
                Ok(SwitchOutcome::Added)
            }
            Err(e) => Err(self.fail(e, |reason| SessionError::NetworkAddFailed {
                chain_id,
                reason,
            })),
        }
    }

    fn fail(
        &self,
        err: ProviderError,
        otherwise: impl FnOnce(String) -> SessionError,
    ) -> SessionError {
        let session_err = if err.is_user_rejected() {
            SessionError::UserRejected {
                code: USER_REJECTED_CODE,
            }
        } else {
            otherwise(err.to_string())
        };

        tracing::warn!(error = %err, kind = session_err.kind(), "Network switch failed");
        metrics::record_network_switch(session_err.kind());
        self.notifier.error(&session_err.user_message());
        session_err
    }
}

impl std::fmt::Debug for NetworkEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkEnforcer")
            .field("chain_id", &self.descriptor.chain_id)
            .field("chain_name", &self.descriptor.chain_name)
            .finish()
    }
}
