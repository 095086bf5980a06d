//! Response cache subsystem.
//!
//! # Data Flow
//! ```text
//! Authorized request for Route
//!     → store.rs lookup(public path)
//!         fresh entry  → HIT, served without an upstream call
//!         stale entry  → removed, treated as MISS
//!         no entry     → MISS
//!     → on MISS, after a completed upstream round trip:
//!         store.rs store(public path, envelope)
//! ```
//!
//! # Design Decisions
//! - Key is the public path verbatim; no query or header variation
//! - Expiry is lazy (checked on lookup), no background sweeper
//! - Upstream error statuses are cached like successes
//! - No single-flight: concurrent misses may both forward, last store wins

pub mod store;

use axum::http::{HeaderName, HeaderValue};

pub use store::{CachedEntry, ResponseCache};

/// Diagnostic response header carrying [`CacheStatus`].
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Whether a proxied response was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }

    pub fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}
