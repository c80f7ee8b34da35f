//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (origin allow-list, preflight)
//!     → rate_limit.rs (per-IP token bucket on /api/*)
//!     → Pass to handlers
//! Outgoing response:
//!     → headers.rs (hardening headers)
//! ```
//!
//! # Design Decisions
//! - Defense in depth: multiple layers of protection
//! - Rejections are JSON, like every other error
//! - No trust in client input

pub mod cors;
pub mod headers;
pub mod rate_limit;

pub use cors::cors_layer;
pub use headers::apply_security_headers;
pub use rate_limit::{rate_limit_middleware, RateLimiter};
