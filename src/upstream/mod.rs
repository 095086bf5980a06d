//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Route (cache MISS)
//!     → forwarder.rs GET upstream_base + upstream_path
//!         User-Agent: AciTracker-Gateway/1.0
//!         no query, body or client headers forwarded
//!     → ResponseEnvelope { status, content type (or route default), full body }
//!     → transport failure → UpstreamError (handler answers 502)
//! ```
//!
//! # Design Decisions
//! - One shared reqwest client (connection pooling)
//! - No retries and no timeout unless configured
//! - Upstream statuses are data, not errors

pub mod forwarder;

pub use forwarder::{UpstreamError, UpstreamForwarder};
