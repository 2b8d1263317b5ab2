//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! startup:  probe.rs (authorized accounts?) → manager.connect_with(AutoConnect)
//! user:     manager.connect() / disconnect() / switch_network()
//! wallet:   provider events → bridge.rs → manager.on_accounts_changed / on_chain_changed
//!
//! manager.rs:
//!     → network enforcer (verify / switch / add)
//!     → state.rs (Session, the only mutable shared state)
//!     → watch channel (SessionSnapshot for readers)
//!     → Notifier (user-facing messages)
//! ```
//!
//! # Design Decisions
//! - All mutation funnels through ConnectionManager
//! - Adapter failures become a notification plus a reset, never a panic
//! - Auto-connect failures are logged only

pub mod bridge;
pub mod manager;
pub mod probe;
pub mod state;

pub use bridge::EventBridge;
pub use manager::{ConnectOrigin, ConnectOutcome, ConnectionManager};
pub use probe::{AutoConnectProbe, ProbeOutcome};
pub use state::{Session, SessionSnapshot, SessionStatus};
