//! Session state.
//!
//! # Invariants
//! - `Connected` ⇔ account, chain id, provider and signer handles all present
//! - `Disconnected` and `Connecting` ⇒ every field absent
//!
//! Fields are private; a `Session` can only be built through the three
//! constructors, so the invariants hold for every value in existence.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::provider::{SignerHandle, WalletProvider};

/// Lifecycle state of the wallet connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Disconnected => "disconnected",
            SessionStatus::Connecting => "connecting",
            SessionStatus::Connected => "connected",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-side view of a session, published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub is_connected: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Session::disconnected().snapshot()
    }
}

/// The single wallet session of an application instance.
#[derive(Clone)]
pub struct Session {
    status: SessionStatus,
    account: Option<Address>,
    chain_id: Option<u64>,
    provider: Option<Arc<dyn WalletProvider>>,
    signer: Option<SignerHandle>,
}

impl Session {
    pub fn disconnected() -> Self {
        Self::empty(SessionStatus::Disconnected)
    }

    pub fn connecting() -> Self {
        Self::empty(SessionStatus::Connecting)
    }

    pub fn connected(
        account: Address,
        chain_id: u64,
        provider: Arc<dyn WalletProvider>,
        signer: SignerHandle,
    ) -> Self {
        Self {
            status: SessionStatus::Connected,
            account: Some(account),
            chain_id: Some(chain_id),
            provider: Some(provider),
            signer: Some(signer),
        }
    }

    fn empty(status: SessionStatus) -> Self {
        Self {
            status,
            account: None,
            chain_id: None,
            provider: None,
            signer: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn provider(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.provider.as_ref()
    }

    pub fn signer(&self) -> Option<&SignerHandle> {
        self.signer.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.status == SessionStatus::Connected
    }

    /// Replace the selected account of a connected session.
    ///
    /// Returns false (and changes nothing) unless connected.
    pub(crate) fn select_account(&mut self, account: Address) -> bool {
        if !self.is_connected() {
            return false;
        }
        self.account = Some(account);
        true
    }

    /// Check the state invariants against the required chain.
    pub fn is_consistent(&self, required_chain_id: u64) -> bool {
        let populated = self.account.is_some()
            && self.chain_id == Some(required_chain_id)
            && self.provider.is_some()
            && self.signer.is_some();
        let empty = self.account.is_none()
            && self.chain_id.is_none()
            && self.provider.is_none()
            && self.signer.is_none();

        match self.status {
            SessionStatus::Connected => populated,
            SessionStatus::Connecting | SessionStatus::Disconnected => empty,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            account: self.account,
            chain_id: self.chain_id,
            is_connected: self.is_connected(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .field("has_provider", &self.provider.is_some())
            .field("signer", &self.signer)
            .finish()
    }
}
