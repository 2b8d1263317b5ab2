//! JSON-RPC backed wallet adapter.
//!
//! # Responsibilities
//! - Forward wallet methods (`eth_requestAccounts`, `wallet_switchEthereumChain`, ...)
//!   to a JSON-RPC endpoint
//! - Handle timeouts and map wallet error payloads to [`ProviderError`]
//! - Poll accounts and chain id and emit change events to subscribers

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::{RpcError, TransportError, TransportResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::config::schema::WalletConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::network::{to_hex_chain_id, AddChainParams};
use crate::provider::adapter::{
    EventSender, ListenerId, ProviderEvent, ProviderEventKind, SignerHandle, WalletProvider,
};
use crate::provider::listeners::ListenerRegistry;

/// Wallet adapter talking to a JSON-RPC endpoint that holds the accounts
/// (a dev node with unlocked accounts, a remote signer, ...).
pub struct RpcWalletProvider {
    provider: DynProvider,
    rpc_url: String,
    timeout_duration: Duration,
    listeners: ListenerRegistry,
}

impl RpcWalletProvider {
    /// Create an adapter for the configured endpoint.
    ///
    /// No request is sent; an unreachable endpoint surfaces on first use.
    pub fn new(config: &WalletConfig) -> ProviderResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            ProviderError::Transport(format!("Invalid wallet URL '{}': {}", config.rpc_url, e))
        })?;

        Ok(Self {
            provider: ProviderBuilder::new().connect_http(url).erased(),
            rpc_url: config.rpc_url.clone(),
            timeout_duration: Duration::from_secs(config.request_timeout_secs),
            listeners: ListenerRegistry::new(),
        })
    }

    /// Start polling the endpoint for account and chain changes.
    ///
    /// The task holds a weak reference and ends once the adapter is dropped.
    pub fn spawn_watcher(self: &Arc<Self>, poll_interval: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut state = WatchState::default();

            loop {
                ticker.tick().await;
                let Some(adapter) = weak.upgrade() else {
                    tracing::debug!("Wallet adapter dropped, stopping watcher");
                    break;
                };
                adapter.poll_once(&mut state).await;
            }
        })
    }

    async fn poll_once(&self, state: &mut WatchState) {
        match self.authorized_accounts().await {
            Ok(accounts) => {
                if let Some(event) = state.observe_accounts(accounts) {
                    self.listeners.emit(&event);
                }
            }
            Err(e) => tracing::debug!(error = %e, "Account poll failed"),
        }

        match self.chain_id().await {
            Ok(chain_id) => {
                if let Some(event) = state.observe_chain(chain_id) {
                    self.listeners.emit(&event);
                }
            }
            Err(e) => tracing::debug!(error = %e, "Chain poll failed"),
        }
    }

    async fn call<T, F>(&self, method: &'static str, fut: F) -> ProviderResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::debug!(method, error = %e, "Wallet request failed");
                Err(map_transport_error(e))
            }
            Err(_) => {
                tracing::warn!(method, rpc_url = %self.rpc_url, "Wallet request timed out");
                Err(ProviderError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        let fut = self
            .provider
            .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), json!([]));
        self.call("eth_requestAccounts", fut).await
    }

    async fn authorized_accounts(&self) -> ProviderResult<Vec<Address>> {
        let fut = self
            .provider
            .raw_request::<_, Vec<Address>>("eth_accounts".into(), json!([]));
        self.call("eth_accounts", fut).await
    }

    async fn chain_id(&self) -> ProviderResult<u64> {
        self.call("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn signer(&self, account: Address) -> ProviderResult<SignerHandle> {
        // Signing happens remotely (eth_sign / eth_sendTransaction) under the
        // account's authorization; the handle only pins the account.
        Ok(SignerHandle::new(account))
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> ProviderResult<()> {
        let fut = self.provider.raw_request::<_, Value>(
            "wallet_switchEthereumChain".into(),
            json!([{ "chainId": chain_id_hex }]),
        );
        self.call("wallet_switchEthereumChain", fut).await.map(|_| ())
    }

    async fn add_chain(&self, params: &AddChainParams) -> ProviderResult<()> {
        let fut = self
            .provider
            .raw_request::<_, Value>("wallet_addEthereumChain".into(), json!([params]));
        self.call("wallet_addEthereumChain", fut).await.map(|_| ())
    }

    fn subscribe(&self, kind: ProviderEventKind, handler: EventSender) -> ListenerId {
        self.listeners.add(kind, handler)
    }

    fn unsubscribe(&self, kind: ProviderEventKind, id: ListenerId) -> bool {
        self.listeners.remove(kind, id)
    }
}

impl std::fmt::Debug for RpcWalletProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcWalletProvider")
            .field("rpc_url", &self.rpc_url)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn map_transport_error(err: TransportError) -> ProviderError {
    if let Some(payload) = err.as_error_resp() {
        return ProviderError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        };
    }
    match err {
        RpcError::DeserError { .. } | RpcError::NullResp => {
            ProviderError::InvalidResponse(err.to_string())
        }
        other => ProviderError::Transport(other.to_string()),
    }
}

/// Last observed wallet state, used to turn polls into change events.
#[derive(Debug, Default)]
struct WatchState {
    accounts: Option<Vec<Address>>,
    chain_id: Option<u64>,
}

impl WatchState {
    /// First observation sets the baseline without firing.
    fn observe_accounts(&mut self, accounts: Vec<Address>) -> Option<ProviderEvent> {
        let changed = matches!(&self.accounts, Some(prev) if *prev != accounts);
        self.accounts = Some(accounts.clone());
        changed.then(|| ProviderEvent::AccountsChanged(accounts))
    }

    fn observe_chain(&mut self, chain_id: u64) -> Option<ProviderEvent> {
        let changed = matches!(self.chain_id, Some(prev) if prev != chain_id);
        self.chain_id = Some(chain_id);
        changed.then(|| ProviderEvent::ChainChanged(to_hex_chain_id(chain_id)))
    }
}
