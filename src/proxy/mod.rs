//! News proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound query string
//!     → params.rs (coerce country/language onto allow-lists)
//!     → provider.rs (dispatch table: base URL, param names, key)
//!     → client.rs (single outbound GET, explicit timeout)
//!     → handler.rs (relay JSON or map error)
//!     → error.rs (401 / 500 JSON bodies, key never echoed)
//! ```
//!
//! # Design Decisions
//! - Coerce, don't reject: bad input yields defaults, never a 4xx
//! - One generic handler parameterized by a provider record
//! - No retries, caching or circuit breaking

pub mod client;
pub mod error;
pub mod handler;
pub mod params;
pub mod provider;

pub use client::UpstreamClient;
pub use error::ProxyError;
pub use params::{NewsQuery, ValidatedParams};
pub use provider::{Provider, ProviderEndpoint, ProviderTable};
