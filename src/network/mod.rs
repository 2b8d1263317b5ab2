//! Required-network subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkConfig (config/schema.rs)
//!     → descriptor.rs (hex ids, add-chain parameters)
//!     → enforcer.rs (verify chain id, switch / add protocol)
//! ```

pub mod descriptor;
pub mod enforcer;

pub use descriptor::{parse_chain_id, to_hex_chain_id, AddChainParams, NetworkDescriptor};
pub use enforcer::{NetworkEnforcer, SwitchOutcome};
