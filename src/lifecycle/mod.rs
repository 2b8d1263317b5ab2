//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! watch command:
//!     auto-connect probe → attach event bridge → wait for signal
//!     SIGTERM/SIGINT → detach event bridge → disconnect → exit
//! ```

pub mod signals;

pub use signals::{wait_for_shutdown, ShutdownSignal};
