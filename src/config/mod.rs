//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SessionConfig (validated, immutable)
//!     → NetworkConfig handed to the network enforcer,
//!       WalletConfig handed to the wallet adapter
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the required network never changes mid-session
//! - All fields have defaults (Sepolia) to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{NativeCurrency, NetworkConfig, ObservabilityConfig, SessionConfig, WalletConfig};
pub use validation::ValidationError;
