//! AciTracker Gateway Library
//!
//! Authenticated, allowlisted, caching reverse proxy in front of a single
//! read-only upstream.

pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
