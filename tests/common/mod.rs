//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use acitracker_gateway::config::GatewayConfig;
use acitracker_gateway::{HttpServer, Shutdown};
use gateway_sdk::GatewayClient;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-gateway-token";

/// What the mock upstream should answer. `None` drops the connection unanswered.
pub struct MockReply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl MockReply {
    pub fn ok(content_type: &'static str, body: impl Into<String>) -> Option<Self> {
        Some(Self {
            status: 200,
            content_type: Some(content_type),
            body: body.into(),
        })
    }
}

/// A request as the mock upstream saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub user_agent: Option<String>,
    pub authorization: Option<String>,
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start a programmable upstream on an ephemeral port.
///
/// `f` receives the request target (path and query) and decides the reply.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> MockUpstream
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<MockReply>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let (c, r) = (calls.clone(), requests.clone());
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let calls = c.clone();
                    let requests = r.clone();
                    tokio::spawn(async move {
                        let Some(recorded) = read_request_head(&mut socket).await else {
                            return;
                        };
                        calls.fetch_add(1, Ordering::SeqCst);
                        let target = recorded.target.clone();
                        requests.lock().unwrap().push(recorded);

                        let Some(reply) = f(target).await else {
                            // Simulated network failure: close without a response.
                            return;
                        };

                        let mut head = format!("HTTP/1.1 {} Mock\r\n", reply.status);
                        if let Some(ct) = reply.content_type {
                            head.push_str(&format!("Content-Type: {}\r\n", ct));
                        }
                        head.push_str(&format!(
                            "Content-Length: {}\r\nConnection: close\r\n\r\n",
                            reply.body.len()
                        ));
                        let _ = socket.write_all(head.as_bytes()).await;
                        let _ = socket.write_all(reply.body.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockUpstream {
        addr,
        calls,
        requests,
    }
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let mut user_agent = None;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim().to_string();
            match name.to_ascii_lowercase().as_str() {
                "user-agent" => user_agent = Some(value),
                "authorization" => authorization = Some(value),
                _ => {}
            }
        }
    }

    Some(RecordedRequest {
        method,
        target,
        user_agent,
        authorization,
    })
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub fn dead_upstream_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Gateway config pointed at `upstream_base`, with [`TOKEN`] as the secret.
pub fn gateway_config(upstream_base: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.upstream.base_url = upstream_base.to_string();
    config.auth.bearer_token = Some(TOKEN.to_string());
    config
}

pub struct RunningGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningGateway {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client carrying the valid token.
    pub fn client(&self) -> GatewayClient {
        GatewayClient::new(&self.url()).with_token(TOKEN)
    }

    /// Client with no credentials.
    #[allow(dead_code)]
    pub fn anonymous(&self) -> GatewayClient {
        GatewayClient::new(&self.url())
    }
}

impl Drop for RunningGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Bind on an ephemeral port and serve in the background.
pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let listener = TcpListener::bind(config.listener.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningGateway { addr, shutdown }
}
