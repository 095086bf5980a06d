//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → router.rs (exact path lookup, query strings rejected)
//!     → table.rs (Route → upstream path, default content type)
//!     → Return: matched Route or NoMatch (404)
//! ```
//!
//! # Design Decisions
//! - The allowlist is a Rust enum, fixed at compile time
//! - No templating, no prefixes, no parameters
//! - Deterministic: same input always matches same route

pub mod router;
pub mod table;

pub use router::RouteTable;
pub use table::{Route, RouteDescriptor};
