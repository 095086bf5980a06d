use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};

/// What the gateway answered, flattened for easy assertions and printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// `X-Cache` marker: "HIT" or "MISS" on proxied responses.
    pub cache: Option<String>,
    pub body: String,
}

impl GatewayResponse {
    pub fn is_hit(&self) -> bool {
        self.cache.as_deref() == Some("HIT")
    }

    pub fn is_miss(&self) -> bool {
        self.cache.as_deref() == Some("MISS")
    }

    /// The `error` field of a gateway-generated JSON error body.
    pub fn error_message(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }
        serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .map(|e| e.error)
    }
}

pub struct GatewayClient {
    client: Client,
    gateway_url: String,
    token: Option<String>,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Self {
        Self {
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_default(),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// GET a gateway path (path and optional query, e.g. "/report").
    pub async fn fetch(&self, path: &str) -> Result<GatewayResponse, reqwest::Error> {
        self.request(Method::GET, path, HeaderMap::new()).await
    }

    /// Arbitrary method and extra headers, for exercising rejections.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
    ) -> Result<GatewayResponse, reqwest::Error> {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.gateway_url, path))
            .headers(headers);
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let resp = req.send().await?;
        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let status = resp.status().as_u16();
        let content_type = header(CONTENT_TYPE.as_str());
        let cache = header("x-cache");
        let body = resp.text().await?;

        Ok(GatewayResponse {
            status,
            content_type,
            cache,
            body,
        })
    }
}
