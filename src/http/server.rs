//! HTTP server setup and the gateway handler.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all gateway handler
//! - Wire up middleware (tracing, body limit, request guard, request ID)
//! - Match the allowlist, authenticate, consult the cache
//! - Forward misses upstream and store the result
//! - Accept HTTP/1 connections until the shutdown signal fires, then drain

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper::server::conn::http1;
use hyper_util::{
    rt::{TokioIo, TokioTimer},
    server::graceful::GracefulShutdown,
    service::TowerToHyperService,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    body::Limited,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::cache::{CacheStatus, ResponseCache};
use crate::config::GatewayConfig;
use crate::http::request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
use crate::http::response::GatewayError;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{Route, RouteTable};
use crate::security::limits::request_guard_middleware;
use crate::security::{Authenticator, RequestGuard};
use crate::upstream::{UpstreamError, UpstreamForwarder};

/// How long in-flight connections get to finish after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub authenticator: Authenticator,
    pub cache: ResponseCache,
    pub forwarder: UpstreamForwarder,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    cache: ResponseCache,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let forwarder = UpstreamForwarder::new(&config.upstream)?;
        let cache = ResponseCache::new(config.cache.ttl());

        let state = AppState {
            routes: Arc::new(RouteTable::new()),
            authenticator: Authenticator::new(&config.auth),
            cache: cache.clone(),
            forwarder,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            cache,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer order, outermost first: trace → body limit → guard → request ID → handler.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let guard = RequestGuard::new(&config.limits);

        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
                    .map_request(|req: Request<Limited<Body>>| req.map(Body::new))
                    .layer(middleware::from_fn_with_state(guard, request_guard_middleware))
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the response cache shared with the handler.
    pub fn cache(&self) -> ResponseCache {
        self.cache.clone()
    }

    /// Run the server until `shutdown` fires, then drain open connections.
    ///
    /// Connections are served over HTTP/1 with the parser's header-count cap
    /// raised to [`RequestGuard::max_header_count`], so oversized header sets
    /// reach the guard and get its 413 instead of a parser-level 431.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let max_headers = RequestGuard::new(&self.config.limits).max_header_count();
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            cache_ttl_ms = self.config.cache.ttl_ms,
            max_header_bytes = self.config.limits.max_header_bytes,
            max_headers,
            "HTTP server starting"
        );

        let mut builder = http1::Builder::new();
        builder.timer(TokioTimer::new()).max_headers(max_headers);

        let graceful = GracefulShutdown::new();
        let mut stop = std::pin::pin!(shutdown::wait(shutdown));

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            continue;
                        }
                    };

                    let service = TowerToHyperService::new(self.router.clone());
                    let conn = graceful.watch(builder.serve_connection(TokioIo::new(stream), service));
                    tokio::spawn(async move {
                        if let Err(e) = conn.await {
                            tracing::debug!(peer = %peer, error = %e, "Connection ended with error");
                        }
                    });
                }
                _ = &mut stop => break,
            }
        }

        drop(listener);
        tracing::info!("Draining open connections");
        tokio::select! {
            _ = graceful.shutdown() => {}
            _ = tokio::time::sleep(DRAIN_TIMEOUT) => {
                tracing::warn!(timeout_secs = DRAIN_TIMEOUT.as_secs(), "Drain timed out");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main gateway handler.
/// Matches the allowlist, then authenticates and serves from cache or upstream.
async fn gateway_handler(State(state): State<AppState>, request: Request) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();
    let request_id = parts.headers.request_id().unwrap_or("unknown");

    tracing::debug!(
        request_id = %request_id,
        path = %parts.uri.path(),
        "Handling request"
    );

    let Some(route) = state.routes.match_uri(&parts.uri) else {
        tracing::warn!(request_id = %request_id, uri = %parts.uri, "No route matched");
        let error = GatewayError::NotFound;
        metrics::record_rejection(error.reason());
        metrics::record_request("none", error.status_code().as_u16(), start_time);
        return error.into_response();
    };

    let response = match serve_route(&state, route, &parts, request_id).await {
        Ok(response) => response,
        Err(error) => {
            metrics::record_rejection(error.reason());
            error.into_response()
        }
    };

    metrics::record_request(route.name(), response.status().as_u16(), start_time);
    response
}

async fn serve_route(
    state: &AppState,
    route: Route,
    parts: &Parts,
    request_id: &str,
) -> Result<Response, GatewayError> {
    // 1. Authenticate
    if let Err(error) = state
        .authenticator
        .authorize(parts.headers.get(AUTHORIZATION))
    {
        match error {
            GatewayError::ServerMisconfigured => {
                tracing::error!(request_id = %request_id, "GATEWAY_BEARER_TOKEN not set; refusing request")
            }
            _ => tracing::warn!(request_id = %request_id, route = route.name(), "Unauthorized request"),
        }
        return Err(error);
    }

    // 2. Cache lookup
    let key = route.public_path();
    if let Some(entry) = state.cache.lookup(key) {
        tracing::debug!(
            request_id = %request_id,
            route = route.name(),
            age_ms = entry.age().as_millis() as u64,
            "Cache hit"
        );
        return Ok(entry.envelope.into_response_with(CacheStatus::Hit));
    }

    // 3. Forward and store
    match state.forwarder.forward(route).await {
        Ok(envelope) => {
            state.cache.store(key, envelope.clone());
            tracing::info!(
                request_id = %request_id,
                route = route.name(),
                status = envelope.status.as_u16(),
                "Fetched from upstream"
            );
            Ok(envelope.into_response_with(CacheStatus::Miss))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, route = route.name(), error = %e, "Upstream error");
            metrics::record_upstream_failure(route.name());
            Err(GatewayError::BadGateway)
        }
    }
}
