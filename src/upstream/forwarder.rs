//! Outbound GET to the fixed upstream.

use axum::http::{header::CONTENT_TYPE, HeaderValue};

use crate::config::UpstreamConfig;
use crate::http::response::ResponseEnvelope;
use crate::routing::Route;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Forwards allowlisted routes to `base_url + upstream_path`.
#[derive(Debug, Clone)]
pub struct UpstreamForwarder {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamForwarder {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full upstream URL for a route.
    pub fn url_for(&self, route: Route) -> String {
        format!("{}{}", self.base_url, route.upstream_path())
    }

    /// Issue the GET and read the whole body.
    ///
    /// Any status the upstream answers with is a success here; only failures
    /// to complete the exchange are errors.
    pub async fn forward(&self, route: Route) -> Result<ResponseEnvelope, UpstreamError> {
        let url = self.url_for(route);
        tracing::debug!(route = route.name(), url = %url, "Forwarding to upstream");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(route.default_content_type()));
        let body = response.bytes().await?;

        tracing::debug!(
            route = route.name(),
            status = status.as_u16(),
            bytes = body.len(),
            "Upstream responded"
        );

        Ok(ResponseEnvelope {
            status,
            content_type,
            body,
        })
    }
}
