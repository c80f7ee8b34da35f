//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → info.rs (`/`, `/health`) or proxy handler (`/api/{provider}`)
//!     → response.rs (JSON errors, 404 fallback, panic recovery)
//!     → Send to client
//! ```

pub mod info;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
