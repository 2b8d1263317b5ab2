//! Wallet event forwarding and auto-connect tests.

use std::time::Duration;

use wallet_session::error::{ProviderError, SessionError};
use wallet_session::network::SwitchOutcome;
use wallet_session::provider::ProviderEvent;
use wallet_session::session::{
    AutoConnectProbe, ConnectOutcome, EventBridge, ProbeOutcome, SessionStatus,
};

mod common;
use common::{
    manager_with, sepolia, wait_for_snapshot, Call, ScriptedWallet, ALICE, BOB, MAINNET,
};

#[tokio::test]
async fn test_bridge_forwards_events_in_order() {
    let wallet = ScriptedWallet::new(vec![ALICE], sepolia());
    let (manager, _) = manager_with(&wallet);
    manager.connect().await.unwrap();
    let bridge = EventBridge::attach(manager.clone()).unwrap();

    wallet.emit(ProviderEvent::AccountsChanged(vec![BOB]));
    wallet.emit(ProviderEvent::AccountsChanged(vec![ALICE]));
    wallet.emit(ProviderEvent::AccountsChanged(vec![BOB]));

    let snapshot = wait_for_snapshot(&manager, |s| s.account == Some(BOB)).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(manager.account(), Some(BOB));
    assert!(snapshot.is_connected);

    bridge.detach().await;
}

#[tokio::test]
async fn test_bridge_chain_change_disconnects() {
    let wallet = ScriptedWallet::new(vec![ALICE], sepolia());
    let (manager, notifier) = manager_with(&wallet);
    manager.connect().await.unwrap();
    let _bridge = EventBridge::attach(manager.clone()).unwrap();

    wallet.emit(ProviderEvent::ChainChanged("0x1".into()));

    let snapshot = wait_for_snapshot(&manager, |s| !s.is_connected).await;
    assert_eq!(snapshot.status, SessionStatus::Disconnected);
    assert_eq!(notifier.warnings().len(), 1);
}

#[tokio::test]
async fn test_bridge_logout_disconnects() {
    let wallet = ScriptedWallet::new(vec![ALICE], sepolia());
    let (manager, _) = manager_with(&wallet);
    manager.connect().await.unwrap();
    let _bridge = EventBridge::attach(manager.clone()).unwrap();

    wallet.emit(ProviderEvent::AccountsChanged(vec![]));

    let snapshot = wait_for_snapshot(&manager, |s| !s.is_connected).await;
    assert_eq!(snapshot.account, None);
}

#[tokio::test]
async fn test_detach_removes_listeners() {
    let wallet = ScriptedWallet::new(vec![ALICE], sepolia());
    let (manager, _) = manager_with(&wallet);
    manager.connect().await.unwrap();

    let bridge = EventBridge::attach(manager.clone()).unwrap();
    assert_eq!(wallet.listener_count(), 2);
    assert!(bridge.is_attached());

    bridge.detach().await;
    assert_eq!(wallet.listener_count(), 0);

    assert_eq!(wallet.emit(ProviderEvent::ChainChanged("0x1".into())), 0);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(manager.is_connected());
}

#[tokio::test]
async fn test_drop_releases_listeners() {
    let wallet = ScriptedWallet::new(vec![ALICE], sepolia());
    let (manager, _) = manager_with(&wallet);

    {
        let _bridge = EventBridge::attach(manager.clone()).unwrap();
        assert_eq!(wallet.listener_count(), 2);
    }
    assert_eq!(wallet.listener_count(), 0);

    let _again = EventBridge::attach(manager.clone()).unwrap();
    assert_eq!(wallet.listener_count(), 2);
}

#[tokio::test]
async fn test_switch_confirmation_reconnects() {
    let wallet = ScriptedWallet::new(vec![ALICE], MAINNET);
    let (manager, notifier) = manager_with(&wallet);
    let _bridge = EventBridge::attach(manager.clone()).unwrap();

    let outcome = manager.connect().await.unwrap();
    assert_eq!(outcome, ConnectOutcome::SwitchRequested(SwitchOutcome::Switched));

    // The wallet fired chainChanged(0xaa36a7) when it switched.
    let snapshot = wait_for_snapshot(&manager, |s| s.is_connected).await;
    assert_eq!(snapshot.account, Some(ALICE));
    assert_eq!(snapshot.chain_id, Some(sepolia()));
    assert!(!manager.has_pending_switch());
    assert_eq!(wallet.count(|c| *c == Call::RequestAccounts), 2);
    assert_eq!(notifier.warnings().len(), 1);
}

#[tokio::test]
async fn test_required_chain_without_pending_switch_does_not_connect() {
    let wallet = ScriptedWallet::new(vec![ALICE], MAINNET);
    let (manager, _) = manager_with(&wallet);
    let _bridge = EventBridge::attach(manager.clone()).unwrap();

    wallet.emit(ProviderEvent::ChainChanged("0xaa36a7".into()));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(manager.status(), SessionStatus::Disconnected);
    assert_eq!(wallet.count(|c| *c == Call::RequestAccounts), 0);
}

#[tokio::test]
async fn test_probe_reconnects_authorized_wallet() {
    let wallet = ScriptedWallet::new(vec![ALICE], sepolia());
    let (manager, _) = manager_with(&wallet);

    let outcome = AutoConnectProbe::new(manager.clone()).run().await;

    assert!(matches!(
        outcome,
        ProbeOutcome::Attempted(ConnectOutcome::Connected(_))
    ));
    assert!(manager.is_connected());
    assert_eq!(wallet.calls()[0], Call::AuthorizedAccounts);
}

#[tokio::test]
async fn test_probe_without_authorization_does_nothing() {
    let wallet = ScriptedWallet::new(vec![ALICE], sepolia());
    wallet.set_authorized(vec![]);
    let (manager, notifier) = manager_with(&wallet);

    let outcome = AutoConnectProbe::new(manager.clone()).run().await;

    assert_eq!(outcome, ProbeOutcome::NoAuthorizedAccounts);
    assert_eq!(wallet.calls(), vec![Call::AuthorizedAccounts]);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_probe_failures_are_silent() {
    let wallet = ScriptedWallet::new(vec![ALICE], sepolia());
    wallet.fail_request(ProviderError::Timeout(30));
    let (manager, notifier) = manager_with(&wallet);

    let outcome = AutoConnectProbe::new(manager.clone()).run().await;

    assert!(matches!(
        outcome,
        ProbeOutcome::Failed(SessionError::Unknown { .. })
    ));
    assert_eq!(manager.status(), SessionStatus::Disconnected);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_probe_adapter_error_is_silent() {
    let wallet = ScriptedWallet::new(vec![ALICE], sepolia());
    wallet.fail_authorized(ProviderError::Unavailable);
    let (manager, notifier) = manager_with(&wallet);

    let outcome = AutoConnectProbe::new(manager.clone()).run().await;

    assert_eq!(outcome, ProbeOutcome::Failed(SessionError::ProviderUnavailable));
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_probe_on_wrong_network_does_not_prompt() {
    let wallet = ScriptedWallet::new(vec![ALICE], MAINNET);
    let (manager, notifier) = manager_with(&wallet);

    let outcome = AutoConnectProbe::new(manager.clone()).run().await;

    assert_eq!(
        outcome,
        ProbeOutcome::Attempted(ConnectOutcome::WrongNetwork { chain_id: MAINNET })
    );
    assert_eq!(wallet.count(|c| matches!(c, Call::SwitchChain(_))), 0);
    assert!(notifier.notices().is_empty());
    assert_eq!(manager.status(), SessionStatus::Disconnected);
}

#[tokio::test]
async fn test_probe_without_wallet() {
    let manager = std::sync::Arc::new(wallet_session::ConnectionManager::new(
        None,
        Default::default(),
        std::sync::Arc::new(wallet_session::notify::NullNotifier),
    ));

    let outcome = AutoConnectProbe::new(manager).run().await;

    assert_eq!(outcome, ProbeOutcome::NoProvider);
}
