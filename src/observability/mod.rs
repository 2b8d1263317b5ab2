//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! session / network / provider modules produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges via the metrics facade)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (account, chain_id, reason) rather than formatted strings
//! - Metrics are cheap and no-ops when no recorder is installed

pub mod logging;
pub mod metrics;
