//! Request guard: method restriction and header size budget.
//!
//! # Responsibilities
//! - Enforce maximum serialized header size (413)
//! - Reject every method other than GET (405)
//!
//! # Design Decisions
//! - Runs before routing and auth, on every path
//! - Header size is measured as the JSON object `{"name":"value",...}`,
//!   repeated headers joined with ", "
//! - A size exactly at the budget is accepted

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::config::LimitsConfig;
use crate::http::response::GatewayError;
use crate::observability::metrics;

/// Floor for [`RequestGuard::max_header_count`].
pub const MIN_HEADER_COUNT: usize = 2000;

#[derive(Debug, Clone, Copy)]
pub struct RequestGuard {
    max_header_bytes: usize,
}

impl RequestGuard {
    pub fn new(config: &LimitsConfig) -> Self {
        Self {
            max_header_bytes: config.max_header_bytes,
        }
    }

    /// Header-line count the HTTP/1 parser must accept so that the byte
    /// budget, not the parser, decides every rejection.
    ///
    /// One header serializes to at least `{"a":""}` (8 bytes) and each further
    /// line adds at least 2 (a repeat joined with `", "`), so a request within
    /// budget carries at most `(budget - 6) / 2` lines. Never below the
    /// customary 2000.
    pub fn max_header_count(&self) -> usize {
        (self.max_header_bytes / 2 + 1).max(MIN_HEADER_COUNT)
    }

    /// Check header size, then method.
    pub fn check(&self, method: &Method, headers: &HeaderMap) -> Result<(), GatewayError> {
        if serialized_header_size(headers) > self.max_header_bytes {
            return Err(GatewayError::HeaderTooLarge);
        }
        if *method != Method::GET {
            return Err(GatewayError::MethodNotAllowed);
        }
        Ok(())
    }
}

/// Length in bytes of the headers serialized as a flat JSON object.
pub fn serialized_header_size(headers: &HeaderMap) -> usize {
    let mut merged = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
            .collect::<Vec<_>>()
            .join(", ");
        merged.insert(name.as_str().to_owned(), Value::String(joined));
    }
    serde_json::to_vec(&merged).map_or(usize::MAX, |bytes| bytes.len())
}

/// Middleware applying [`RequestGuard`] to every request.
pub async fn request_guard_middleware(
    State(guard): State<RequestGuard>,
    request: Request,
    next: Next,
) -> Response {
    match guard.check(request.method(), request.headers()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = e.reason(),
                "Request rejected by guard"
            );
            metrics::record_rejection(e.reason());
            e.into_response()
        }
    }
}
