//! Response handling and transformation.
//!
//! # Responsibilities
//! - Carry an upstream result as a [`ResponseEnvelope`]
//! - Render envelopes for the client with the cache marker
//! - Map gateway failures to status codes and JSON error bodies
//!
//! # Design Decisions
//! - Upstream error statuses pass through verbatim; 502 only for failed forwards
//! - Error bodies are `{"error": "..."}` and never carry internal detail

use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheStatus, X_CACHE};

/// A complete upstream response: one status, one content type, one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: Bytes,
}

impl ResponseEnvelope {
    /// Render for the client, marking whether it came from the cache.
    pub fn into_response_with(self, cache: CacheStatus) -> Response {
        let mut response = (self.status, self.body).into_response();
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, self.content_type);
        headers.insert(X_CACHE, cache.header_value());
        response
    }
}

/// Terminal failures of the gateway pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// No bearer secret configured.
    #[error("Server configuration error: GATEWAY_BEARER_TOKEN not set")]
    ServerMisconfigured,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request headers too large")]
    HeaderTooLarge,

    #[error("Not found")]
    NotFound,

    /// The forwarding attempt itself failed.
    #[error("Bad gateway")]
    BadGateway,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::ServerMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::HeaderTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::BadGateway => StatusCode::BAD_GATEWAY,
        }
    }

    /// Label for the rejection metric.
    pub fn reason(&self) -> &'static str {
        match self {
            GatewayError::ServerMisconfigured => "misconfigured",
            GatewayError::Unauthorized => "unauthorized",
            GatewayError::MethodNotAllowed => "method_not_allowed",
            GatewayError::HeaderTooLarge => "header_too_large",
            GatewayError::NotFound => "not_found",
            GatewayError::BadGateway => "bad_gateway",
        }
    }
}

/// JSON body of every gateway-generated error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
