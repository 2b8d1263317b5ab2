//! Shared fakes for session integration tests.

#![allow(dead_code)]

use alloy::primitives::{address, Address};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{oneshot, Notify};

use wallet_session::config::schema::SEPOLIA_CHAIN_ID;
use wallet_session::error::{ProviderError, ProviderResult};
use wallet_session::network::{parse_chain_id, AddChainParams, NetworkDescriptor};
use wallet_session::notify::Notifier;
use wallet_session::provider::{
    EventSender, ListenerId, ListenerRegistry, ProviderEvent, ProviderEventKind, SignerHandle,
    WalletProvider,
};
use wallet_session::session::{ConnectionManager, SessionSnapshot};

pub const ALICE: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
pub const BOB: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
pub const MAINNET: u64 = 1;

/// Adapter call log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RequestAccounts,
    AuthorizedAccounts,
    ChainId,
    Signer(Address),
    SwitchChain(String),
    AddChain(AddChainParams),
}

#[derive(Default)]
struct Script {
    accounts: Vec<Address>,
    authorized: Vec<Address>,
    chain_id: u64,
    request_error: Option<ProviderError>,
    authorized_error: Option<ProviderError>,
    signer_error: Option<ProviderError>,
    switch_error: Option<ProviderError>,
    add_error: Option<ProviderError>,
    signer_gate: Option<oneshot::Receiver<()>>,
}

/// In-memory wallet driven by a script.
///
/// A successful switch/add moves the wallet to the requested chain and fires
/// `chainChanged`, as a browser wallet does.
pub struct ScriptedWallet {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
    listeners: ListenerRegistry,
    signer_entered: Arc<Notify>,
}

impl ScriptedWallet {
    pub fn new(accounts: Vec<Address>, chain_id: u64) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Script {
                authorized: accounts.clone(),
                accounts,
                chain_id,
                ..Script::default()
            }),
            calls: Mutex::new(Vec::new()),
            listeners: ListenerRegistry::new(),
            signer_entered: Arc::new(Notify::new()),
        })
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.script.lock().unwrap().accounts = accounts;
    }

    pub fn set_authorized(&self, accounts: Vec<Address>) {
        self.script.lock().unwrap().authorized = accounts;
    }

    pub fn fail_request(&self, err: ProviderError) {
        self.script.lock().unwrap().request_error = Some(err);
    }

    pub fn fail_authorized(&self, err: ProviderError) {
        self.script.lock().unwrap().authorized_error = Some(err);
    }

    pub fn fail_signer(&self, err: ProviderError) {
        self.script.lock().unwrap().signer_error = Some(err);
    }

    pub fn fail_switch(&self, err: ProviderError) {
        self.script.lock().unwrap().switch_error = Some(err);
    }

    pub fn fail_add(&self, err: ProviderError) {
        self.script.lock().unwrap().add_error = Some(err);
    }

    /// Make the next `signer()` call wait until the returned sender fires.
    ///
    /// The returned `Notify` is signalled when `signer()` is entered.
    pub fn gate_signer(&self) -> (oneshot::Sender<()>, Arc<Notify>) {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().signer_gate = Some(rx);
        (tx, self.signer_entered.clone())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn chain(&self) -> u64 {
        self.script.lock().unwrap().chain_id
    }

    /// Fire an event as the wallet would.
    pub fn emit(&self, event: ProviderEvent) -> usize {
        self.listeners.emit(&event)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn move_to(&self, chain_hex: &str) {
        if let Some(id) = parse_chain_id(chain_hex) {
            self.script.lock().unwrap().chain_id = id;
            self.listeners
                .emit(&ProviderEvent::ChainChanged(chain_hex.to_string()));
        }
    }
}

#[async_trait]
impl WalletProvider for ScriptedWallet {
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        self.record(Call::RequestAccounts);
        let script = self.script.lock().unwrap();
        match &script.request_error {
            Some(err) => Err(err.clone()),
            None => Ok(script.accounts.clone()),
        }
    }

    async fn authorized_accounts(&self) -> ProviderResult<Vec<Address>> {
        self.record(Call::AuthorizedAccounts);
        let script = self.script.lock().unwrap();
        match &script.authorized_error {
            Some(err) => Err(err.clone()),
            None => Ok(script.authorized.clone()),
        }
    }

    async fn chain_id(&self) -> ProviderResult<u64> {
        self.record(Call::ChainId);
        Ok(self.script.lock().unwrap().chain_id)
    }

    async fn signer(&self, account: Address) -> ProviderResult<SignerHandle> {
        self.record(Call::Signer(account));
        let gate = self.script.lock().unwrap().signer_gate.take();
        if let Some(gate) = gate {
            self.signer_entered.notify_one();
            let _ = gate.await;
        }
        match self.script.lock().unwrap().signer_error.clone() {
            Some(err) => Err(err),
            None => Ok(SignerHandle::new(account)),
        }
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> ProviderResult<()> {
        self.record(Call::SwitchChain(chain_id_hex.to_string()));
        if let Some(err) = self.script.lock().unwrap().switch_error.clone() {
            return Err(err);
        }
        self.move_to(chain_id_hex);
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> ProviderResult<()> {
        self.record(Call::AddChain(params.clone()));
        if let Some(err) = self.script.lock().unwrap().add_error.clone() {
            return Err(err);
        }
        self.move_to(&params.chain_id);
        Ok(())
    }

    fn subscribe(&self, kind: ProviderEventKind, handler: EventSender) -> ListenerId {
        self.listeners.add(kind, handler)
    }

    fn unsubscribe(&self, kind: ProviderEventKind, id: ListenerId) -> bool {
        self.listeners.remove(kind, id)
    }
}

/// A notification as received by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
    Loading(String),
    Warning(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.filter(|n| match n {
            Notice::Error(m) => Some(m.clone()),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.filter(|n| match n {
            Notice::Warning(m) => Some(m.clone()),
            _ => None,
        })
    }

    pub fn successes(&self) -> Vec<String> {
        self.filter(|n| match n {
            Notice::Success(m) => Some(m.clone()),
            _ => None,
        })
    }

    fn filter(&self, f: impl Fn(&Notice) -> Option<String>) -> Vec<String> {
        self.notices.lock().unwrap().iter().filter_map(f).collect()
    }

    fn push(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Notice::Error(message.to_string()));
    }

    fn loading(&self, message: &str) {
        self.push(Notice::Loading(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(Notice::Warning(message.to_string()));
    }
}

/// Manager over a scripted wallet requiring Sepolia.
pub fn manager_with(
    wallet: &Arc<ScriptedWallet>,
) -> (Arc<ConnectionManager>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let provider: Arc<dyn WalletProvider> = wallet.clone();
    let manager = Arc::new(ConnectionManager::new(
        Some(provider),
        NetworkDescriptor::default(),
        notifier.clone(),
    ));
    (manager, notifier)
}

pub fn sepolia() -> u64 {
    SEPOLIA_CHAIN_ID
}

/// Wait until a published snapshot satisfies `pred`.
pub async fn wait_for_snapshot(
    manager: &ConnectionManager,
    pred: impl FnMut(&SessionSnapshot) -> bool,
) -> SessionSnapshot {
    let mut rx = manager.subscribe();
    let result = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(pred)).await;
    let snapshot = result
        .expect("timed out waiting for session state")
        .expect("session channel closed")
        .clone();
    snapshot
}
