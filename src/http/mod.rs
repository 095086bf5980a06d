//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → security::limits (header budget, GET only)
//!     → request.rs (request ID)
//!     → server.rs gateway_handler
//!         → routing (allowlist) → security::auth → cache → upstream
//!     → response.rs (envelope + X-Cache, or JSON error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use response::{ErrorBody, GatewayError, ResponseEnvelope};
pub use server::{AppState, HttpServer};
