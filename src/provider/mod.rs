//! Wallet provider boundary.
//!
//! # Data Flow
//! ```text
//! injected wallet / JSON-RPC endpoint
//!     → adapter.rs (WalletProvider capability, events, signer handle)
//!     → listeners.rs (subscribe / unsubscribe bookkeeping)
//!     → rpc.rs (alloy-backed implementation with polling watcher)
//! ```
//!
//! # Design Decisions
//! - The session layer only sees `Arc<dyn WalletProvider>`
//! - Event handlers are channel senders, so delivery order is the send order

pub mod adapter;
pub mod listeners;
pub mod rpc;

pub use adapter::{
    EventSender, ListenerId, ProviderEvent, ProviderEventKind, SignerHandle, WalletProvider,
};
pub use listeners::ListenerRegistry;
pub use rpc::RpcWalletProvider;
