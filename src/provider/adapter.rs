//! The wallet capability consumed by the session layer.

use alloy::primitives::Address;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ProviderResult;
use crate::network::AddChainParams;

/// Identifier handed out by [`WalletProvider::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Change notifications a wallet fires on its own initiative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    AccountsChanged,
    ChainChanged,
}

impl ProviderEventKind {
    /// EIP-1193 event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderEventKind::AccountsChanged => "accountsChanged",
            ProviderEventKind::ChainChanged => "chainChanged",
        }
    }
}

/// A single wallet-originated event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// New account set, currently selected account first. Empty on logout.
    AccountsChanged(Vec<Address>),
    /// Raw chain id as reported by the wallet (usually hex).
    ChainChanged(String),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => ProviderEventKind::ChainChanged,
        }
    }
}

/// Handler side of a subscription.
pub type EventSender = mpsc::UnboundedSender<ProviderEvent>;

/// Capability to authorize actions on behalf of one account.
///
/// Opaque to the session; only the owning account is exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerHandle {
    address: Address,
}

impl SignerHandle {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

/// Narrow interface over an injected wallet.
///
/// Every async method is a suspension point; wallet events may be
/// processed between any two of them.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the user for account access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>>;

    /// Accounts already authorized, without prompting (`eth_accounts`).
    async fn authorized_accounts(&self) -> ProviderResult<Vec<Address>>;

    /// Currently active chain id.
    async fn chain_id(&self) -> ProviderResult<u64>;

    /// Signer for an authorized account.
    async fn signer(&self, account: Address) -> ProviderResult<SignerHandle>;

    /// Ask the wallet to switch networks (`wallet_switchEthereumChain`).
    async fn switch_chain(&self, chain_id_hex: &str) -> ProviderResult<()>;

    /// Ask the wallet to learn a network (`wallet_addEthereumChain`).
    async fn add_chain(&self, params: &AddChainParams) -> ProviderResult<()>;

    /// Register a handler for one event kind.
    fn subscribe(&self, kind: ProviderEventKind, handler: EventSender) -> ListenerId;

    /// Remove a handler. Returns false if it was not registered.
    fn unsubscribe(&self, kind: ProviderEventKind, id: ListenerId) -> bool;
}
