//! Forwarding of wallet-originated events into the connection manager.
//!
//! # Lifecycle
//! ```text
//! attach():  subscribe accountsChanged + chainChanged → spawn forwarder
//! forwarder: recv event → ConnectionManager::handle_event (in arrival order)
//! detach() / drop: unsubscribe both → stop forwarder
//! ```
//!
//! The bridge is the only path by which external events mutate the session.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::provider::{ListenerId, ProviderEventKind, WalletProvider};
use crate::session::manager::ConnectionManager;

const EVENT_KINDS: [ProviderEventKind; 2] = [
    ProviderEventKind::AccountsChanged,
    ProviderEventKind::ChainChanged,
];

/// Scoped subscription to a wallet's change events.
pub struct EventBridge {
    provider: Arc<dyn WalletProvider>,
    subscriptions: Vec<(ProviderEventKind, ListenerId)>,
    task: Option<JoinHandle<()>>,
}

impl EventBridge {
    /// Attach to the manager's wallet. Returns `None` if no wallet is installed.
    pub fn attach(manager: Arc<ConnectionManager>) -> Option<Self> {
        let provider = manager.provider()?.clone();
        Some(Self::attach_to(manager, provider))
    }

    /// Subscribe to `provider` and forward its events to `manager`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn attach_to(manager: Arc<ConnectionManager>, provider: Arc<dyn WalletProvider>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscriptions = EVENT_KINDS
            .iter()
            .map(|kind| (*kind, provider.subscribe(*kind, tx.clone())))
            .collect();
        drop(tx);

        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracing::debug!(event = event.kind().as_str(), "Forwarding wallet event");
                manager.handle_event(event);
            }
            tracing::debug!("Wallet event stream closed");
        });

        tracing::info!("Event bridge attached");
        Self {
            provider,
            subscriptions,
            task: Some(task),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Remove all listeners and stop forwarding.
    pub async fn detach(mut self) {
        self.release();
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        tracing::info!("Event bridge detached");
    }

    fn release(&mut self) {
        for (kind, id) in self.subscriptions.drain(..) {
            if !self.provider.unsubscribe(kind, id) {
                tracing::debug!(event = kind.as_str(), listener = id.0, "Listener already gone");
            }
        }
    }
}

impl Drop for EventBridge {
    fn drop(&mut self) {
        self.release();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("subscriptions", &self.subscriptions)
            .field("attached", &self.is_attached())
            .finish()
    }
}
