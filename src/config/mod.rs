//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (optional TOML file, then environment overrides)
//!     → validation.rs (semantic checks, required API keys)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs, except API keys
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ApiKey;
pub use schema::CorsConfig;
pub use schema::ListenerConfig;
pub use schema::ProviderConfig;
pub use schema::ProxyConfig;
pub use schema::RateLimitConfig;
pub use schema::TimeoutConfig;
