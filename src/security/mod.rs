//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (header size budget, GET only)   every path
//!     → [routing: unknown path → 404]
//!     → auth.rs (bearer token vs configured secret) allowlisted paths
//!     → Pass to cache / upstream
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - A missing secret is a server fault (500), never a silent deny-all
//! - Token comparison is constant-time

pub mod auth;
pub mod limits;

pub use auth::Authenticator;
pub use limits::RequestGuard;
