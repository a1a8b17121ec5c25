//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (CONFIRMATIONS, VERIFY_MAX_ATTEMPTS, ...)
//!     → validation.rs (semantic checks)
//!     → DeployerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::ConfirmationConfig;
pub use schema::DeployerConfig;
pub use schema::NetworkConfig;
pub use schema::ObservabilityConfig;
pub use schema::VerificationConfig;
