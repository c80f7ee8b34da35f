//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use news_proxy::config::{ApiKey, ProxyConfig};
use news_proxy::proxy::Provider;
use news_proxy::{HttpServer, Shutdown};

/// A raw-TCP stand-in for a news API.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request targets (path + query) received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock upstream that always answers `status` with `body`.
pub async fn start_mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    start_programmable_upstream(move |_target| async move { (status, body.to_string()) }).await
}

/// Start a programmable mock upstream. `f` receives the request target.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> MockUpstream
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let seen = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let seen = seen.clone();
                    tokio::spawn(async move {
                        let Some(target) = read_request_target(&mut socket).await else {
                            return;
                        };
                        seen.lock().unwrap().push(target.clone());

                        let (status, body) = f(target).await;
                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            if status == 200 { "OK" } else { "Mock" },
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockUpstream { addr, requests }
}

async fn read_request_target(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(String::from)
}

pub fn test_key(provider: Provider) -> String {
    format!("secret-{}-key", provider)
}

/// A valid config whose providers all point at `upstream`, under
/// `/{provider}` paths. Rate limiting is off.
pub fn test_config(upstream: &MockUpstream) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.rate_limit.enabled = false;
    config.timeouts.upstream_ms = 2_000;
    for provider in Provider::ALL {
        let p = config.providers.get_mut(provider);
        p.api_key = Some(ApiKey::new(test_key(provider)));
        p.base_url = Some(format!("{}/{}", upstream.base_url(), provider));
    }
    config
}

/// Start the proxy on an ephemeral port and return its base URL.
pub async fn start_proxy(config: ProxyConfig) -> (String, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (format!("http://{}", addr), shutdown)
}
