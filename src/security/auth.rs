//! Bearer token authentication.

use std::sync::Arc;

use axum::http::HeaderValue;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;
use crate::http::response::GatewayError;

/// Literal scheme prefix, case-sensitive.
pub const BEARER_PREFIX: &[u8] = b"Bearer ";

/// Validates `Authorization: Bearer <token>` against the configured secret.
#[derive(Clone)]
pub struct Authenticator {
    secret: Option<Arc<[u8]>>,
}

impl Authenticator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.secret().map(|s| Arc::from(s.as_bytes())),
        }
    }

    /// Admit or reject a request given its `Authorization` header.
    ///
    /// A missing secret fails before the credential is looked at.
    pub fn authorize(&self, header: Option<&HeaderValue>) -> Result<(), GatewayError> {
        let secret = self
            .secret
            .as_deref()
            .ok_or(GatewayError::ServerMisconfigured)?;

        let token = header
            .and_then(|value| value.as_bytes().strip_prefix(BEARER_PREFIX))
            .ok_or(GatewayError::Unauthorized)?;

        if constant_time_eq(token, secret) {
            Ok(())
        } else {
            Err(GatewayError::Unauthorized)
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Compare two byte strings without leaking content or length through timing.
///
/// Both sides are hashed to fixed-length digests before the constant-time compare.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.as_slice().ct_eq(hb.as_slice()).into()
}
