//! Connection state machine.
//!
//! # State Transitions
//! ```text
//! Disconnected → Connecting: connect()
//! Connecting → Connected:    accounts granted, required chain, signer obtained
//! Connecting → Disconnected: rejection, cancellation, wrong chain, adapter failure
//! Connected → Disconnected:  disconnect(), empty account list, foreign chain
//! ```
//!
//! # Concurrency
//! Wallet events may be handled between any two suspension points of an
//! in-flight `connect()`. Every reset and every new attempt bumps an epoch;
//! a finishing `connect()` only writes `Connected` if the epoch it started
//! with is still current, so a mid-connect reset is never overwritten.
//! The lock is never held across an `.await`.

use alloy::primitives::Address;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::error::{SessionError, SessionResult};
use crate::network::{parse_chain_id, NetworkDescriptor, NetworkEnforcer, SwitchOutcome};
use crate::notify::Notifier;
use crate::observability::metrics;
use crate::provider::{ProviderEvent, SignerHandle, WalletProvider};
use crate::session::state::{Session, SessionSnapshot, SessionStatus};

/// Who asked for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOrigin {
    /// Explicit user action; failures are notified.
    User,
    /// Silent startup reconnection; failures are only logged.
    AutoConnect,
}

/// Result of a `connect()` call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Session is now connected.
    Connected(SessionSnapshot),
    /// The wallet granted no accounts.
    Cancelled,
    /// Another attempt was already running; nothing was done.
    InProgress,
    /// Wallet was on another network; a switch was issued and the session
    /// stays disconnected until the wallet reports the required chain.
    SwitchRequested(SwitchOutcome),
    /// Wallet was on another network during a silent reconnect; no prompt
    /// was shown.
    WrongNetwork { chain_id: u64 },
    /// The session was reset while this attempt was in flight; its result
    /// was discarded.
    Superseded,
}

struct Inner {
    session: Session,
    epoch: u64,
    pending_switch: bool,
}

/// Owns the wallet session and every transition of it.
pub struct ConnectionManager {
    provider: Option<Arc<dyn WalletProvider>>,
    enforcer: NetworkEnforcer,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<Inner>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl ConnectionManager {
    /// Create a manager with a disconnected session.
    ///
    /// `provider` is `None` when no wallet is installed.
    pub fn new(
        provider: Option<Arc<dyn WalletProvider>>,
        network: NetworkDescriptor,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (snapshots, _) = watch::channel(SessionSnapshot::default());
        Self {
            provider,
            enforcer: NetworkEnforcer::new(network, notifier.clone()),
            notifier,
            inner: Mutex::new(Inner {
                session: Session::disconnected(),
                epoch: 0,
                pending_switch: false,
            }),
            snapshots,
        }
    }

    // --- Read side ---

    /// Wallet capability, if one is installed.
    pub fn provider(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.provider.as_ref()
    }

    pub fn enforcer(&self) -> &NetworkEnforcer {
        &self.enforcer
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().session.snapshot()
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().session.status()
    }

    pub fn account(&self) -> Option<Address> {
        self.lock().session.account()
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.lock().session.chain_id()
    }

    pub fn is_connected(&self) -> bool {
        self.lock().session.is_connected()
    }

    /// Provider handle owned by a connected session.
    pub fn provider_handle(&self) -> Option<Arc<dyn WalletProvider>> {
        self.lock().session.provider().cloned()
    }

    /// Signer owned by a connected session.
    pub fn signer(&self) -> Option<SignerHandle> {
        self.lock().session.signer().cloned()
    }

    /// True while a switch issued by `connect()` awaits the wallet's confirmation.
    pub fn has_pending_switch(&self) -> bool {
        self.lock().pending_switch
    }

    /// Check the session invariants against the required chain.
    pub fn is_consistent(&self) -> bool {
        self.lock()
            .session
            .is_consistent(self.enforcer.required_chain_id())
    }

    // --- Operations ---

    /// Connect on behalf of the user.
    ///
    /// Failures are already reported to the notifier when `Err` is returned.
    pub async fn connect(&self) -> SessionResult<ConnectOutcome> {
        self.connect_with(ConnectOrigin::User).await
    }

    pub async fn connect_with(&self, origin: ConnectOrigin) -> SessionResult<ConnectOutcome> {
        let Some(provider) = self.provider.clone() else {
            let err = SessionError::ProviderUnavailable;
            self.report(origin, &err);
            metrics::record_connect_attempt(err.kind());
            return Err(err);
        };

        let Some((epoch, previous)) = self.begin_attempt() else {
            tracing::debug!("Connect already in progress, ignoring");
            return Ok(ConnectOutcome::InProgress);
        };
        if origin == ConnectOrigin::User {
            self.notifier.loading("Connecting wallet...");
        }

        let accounts = match provider.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => return Err(self.abort(epoch, origin, SessionError::from_provider(e))),
        };
        let Some(account) = accounts.first().copied() else {
            tracing::info!("Wallet granted no accounts");
            self.restore_if_current(epoch, previous);
            metrics::record_connect_attempt("cancelled");
            return Ok(ConnectOutcome::Cancelled);
        };

        let chain_id = match self.enforcer.current_chain(provider.as_ref()).await {
            Ok(chain_id) => chain_id,
            Err(e) => return Err(self.abort(epoch, origin, e)),
        };
        if !self.enforcer.verify(chain_id) {
            return self.wrong_network(epoch, origin, chain_id, provider.as_ref()).await;
        }

        let signer = match provider.signer(account).await {
            Ok(signer) => signer,
            Err(e) => return Err(self.abort(epoch, origin, SessionError::from_provider(e))),
        };

        let snapshot = {
            let mut inner = self.lock();
            if inner.epoch != epoch || inner.session.status() != SessionStatus::Connecting {
                drop(inner);
                tracing::info!(%account, "Session changed during connect, discarding result");
                metrics::record_connect_attempt("superseded");
                return Ok(ConnectOutcome::Superseded);
            }
            inner.session = Session::connected(account, chain_id, provider, signer);
            inner.pending_switch = false;
            self.publish(&inner)
        };

        tracing::info!(%account, chain_id, "Wallet connected");
        metrics::record_connect_attempt("connected");
        self.notifier
            .success(&format!("Connected {}", short_address(&account)));
        Ok(ConnectOutcome::Connected(snapshot))
    }

    /// Clear the session. Idempotent.
    pub fn disconnect(&self) {
        self.reset("user");
        self.notifier.success("Wallet disconnected.");
    }

    /// Ask the wallet to move to the required network.
    ///
    /// Does not connect; call `connect()` once the wallet has switched.
    pub async fn switch_network(&self) -> SessionResult<SwitchOutcome> {
        let Some(provider) = self.provider.clone() else {
            let err = SessionError::ProviderUnavailable;
            self.report(ConnectOrigin::User, &err);
            return Err(err);
        };
        self.enforcer.switch(provider.as_ref()).await
    }

    /// Route a wallet event to its handler.
    pub fn handle_event(self: &Arc<Self>, event: ProviderEvent) {
        metrics::record_provider_event(event.kind().as_str());
        match event {
            ProviderEvent::AccountsChanged(accounts) => self.on_accounts_changed(&accounts),
            ProviderEvent::ChainChanged(raw) => self.on_chain_changed(&raw),
        }
    }

    /// Wallet reported a new account set, selected account first.
    pub fn on_accounts_changed(&self, accounts: &[Address]) {
        let Some(selected) = accounts.first().copied() else {
            tracing::info!("Wallet revoked all accounts");
            self.disconnect();
            return;
        };

        let mut inner = self.lock();
        if inner.session.select_account(selected) {
            self.publish(&inner);
            drop(inner);
            tracing::info!(account = %selected, "Selected account changed");
        } else {
            tracing::debug!(
                account = %selected,
                status = %inner.session.status(),
                "Account change ignored, session not connected"
            );
        }
    }

    /// Wallet reported a network change.
    ///
    /// Any chain other than the required one resets the session. Arriving
    /// on the required chain after a switch issued by `connect()` starts
    /// one follow-up connection attempt.
    pub fn on_chain_changed(self: &Arc<Self>, raw_chain_id: &str) {
        let chain_id = parse_chain_id(raw_chain_id);

        match chain_id {
            Some(id) if self.enforcer.verify(id) => {
                let reconnect = {
                    let mut inner = self.lock();
                    let reconnect = inner.pending_switch
                        && inner.session.status() == SessionStatus::Disconnected;
                    if reconnect {
                        inner.pending_switch = false;
                    }
                    reconnect
                };
                tracing::info!(chain_id = id, "Wallet on required network");
                if reconnect {
                    self.spawn_reconnect();
                }
            }
            _ => {
                tracing::warn!(
                    raw_chain_id,
                    chain_id = ?chain_id,
                    required = self.enforcer.required_chain_id(),
                    "Wallet moved to unsupported network"
                );
                self.notifier.warning(&format!(
                    "Unsupported network. Please switch to {}.",
                    self.enforcer.descriptor().chain_name
                ));
                if self.reset("chain_changed") != SessionStatus::Disconnected {
                    self.notifier.success("Wallet disconnected.");
                }
            }
        }
    }

    // --- Internals ---

    fn spawn_reconnect(self: &Arc<Self>) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, cannot reconnect after network switch");
            return;
        };
        let manager = Arc::clone(self);
        handle.spawn(async move {
            if let Err(e) = manager.connect().await {
                tracing::warn!(error = %e, "Reconnect after network switch failed");
            }
        });
    }

    async fn wrong_network(
        &self,
        epoch: u64,
        origin: ConnectOrigin,
        chain_id: u64,
        provider: &dyn WalletProvider,
    ) -> SessionResult<ConnectOutcome> {
        let required = self.enforcer.required_chain_id();
        tracing::warn!(chain_id, required, "Wallet on wrong network");

        if origin == ConnectOrigin::AutoConnect {
            self.reset_if_current(epoch, "wrong_network");
            metrics::record_connect_attempt("wrong_network");
            return Ok(ConnectOutcome::WrongNetwork { chain_id });
        }

        self.notifier.warning(&format!(
            "Wrong network. Please switch to {}.",
            self.enforcer.descriptor().chain_name
        ));
        if !self.reset_if_current(epoch, "wrong_network") {
            metrics::record_connect_attempt("superseded");
            return Ok(ConnectOutcome::Superseded);
        }
        self.lock().pending_switch = true;
        metrics::record_connect_attempt("switch_requested");

        match self.enforcer.switch(provider).await {
            Ok(outcome) => Ok(ConnectOutcome::SwitchRequested(outcome)),
            Err(e) => {
                self.lock().pending_switch = false;
                Err(e)
            }
        }
    }

    /// Enter `Connecting` unless an attempt is already running.
    ///
    /// Returns the new epoch and the session it replaced.
    fn begin_attempt(&self) -> Option<(u64, Session)> {
        let mut inner = self.lock();
        if inner.session.status() == SessionStatus::Connecting {
            return None;
        }
        inner.epoch += 1;
        let previous = std::mem::replace(&mut inner.session, Session::connecting());
        self.publish(&inner);
        Some((inner.epoch, previous))
    }

    /// Put back the session an attempt replaced, if nothing else has
    /// touched it since.
    fn restore_if_current(&self, epoch: u64, previous: Session) {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            return;
        }
        inner.session = previous;
        self.publish(&inner);
    }

    /// Fail an attempt: reset if still current, then report.
    fn abort(&self, epoch: u64, origin: ConnectOrigin, err: SessionError) -> SessionError {
        self.reset_if_current(epoch, err.kind());
        metrics::record_connect_attempt(err.kind());
        self.report(origin, &err);
        err
    }

    fn report(&self, origin: ConnectOrigin, err: &SessionError) {
        match origin {
            ConnectOrigin::User => {
                tracing::warn!(error = %err, kind = err.kind(), "Wallet connection failed");
                self.notifier.error(&err.user_message());
            }
            ConnectOrigin::AutoConnect => {
                tracing::warn!(error = %err, kind = err.kind(), "Auto-connect failed");
            }
        }
    }

    /// Clear the session, returning the status it had before.
    fn reset(&self, reason: &'static str) -> SessionStatus {
        let mut inner = self.lock();
        let was = inner.session.status();
        inner.epoch += 1;
        inner.pending_switch = false;
        inner.session = Session::disconnected();
        self.publish(&inner);
        drop(inner);

        if was != SessionStatus::Disconnected {
            tracing::info!(reason, from = %was, "Session reset");
            metrics::record_disconnect(reason);
        }
        was
    }

    /// Reset to `Disconnected` only if `epoch` is still the current attempt.
    fn reset_if_current(&self, epoch: u64, reason: &'static str) -> bool {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            return false;
        }
        inner.session = Session::disconnected();
        self.publish(&inner);
        drop(inner);
        tracing::debug!(reason, "Connect attempt ended without a session");
        true
    }

    fn publish(&self, inner: &Inner) -> SessionSnapshot {
        let snapshot = inner.session.snapshot();
        metrics::set_session_connected(snapshot.is_connected);
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("has_provider", &self.provider.is_some())
            .field("enforcer", &self.enforcer)
            .field("session", &self.lock().session)
            .finish()
    }
}

/// `0x1234…abcd` form for messages.
fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}
