//! News API proxy library.
//!
//! Fronts NewsAPI, NewsData, GNews and Currents behind one HTTP surface,
//! keeping provider keys server-side.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
