//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use feature_proxy::config::ProxyConfig;
use feature_proxy::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const FEATURE_COLLECTION: &str = r#"{
    "type": "FeatureCollection",
    "totalFeatures": 3,
    "features": [
        {"type": "Feature", "id": "reportarea_atco.1", "geometry": {"type": "Point", "coordinates": [-98.5, 39.8]}, "properties": {"name": "North"}},
        {"type": "Feature", "id": "reportarea_atco.2", "geometry": {"type": "Point", "coordinates": [-97.1, 38.2]}, "properties": {"name": "South"}},
        {"type": "Feature", "id": "reportarea_atco.3", "geometry": null, "properties": {"name": "Unplaced"}}
    ],
    "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::4326"}}
}"#;

/// A programmable stand-in for the GIS feature server.
pub struct StubUpstream {
    pub addr: SocketAddr,
    targets: Arc<Mutex<Vec<String>>>,
}

impl StubUpstream {
    /// Base OWS URL to put in `upstream.base_url`.
    pub fn base_url(&self) -> String {
        format!("http://{}/geoserver/pcubedgis/ows", self.addr)
    }

    /// Request targets (path + query) received so far.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

/// Start a stub upstream; `f` maps the request target to `(status, body)`.
pub async fn start_upstream<F>(f: F) -> StubUpstream
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    start_upstream_with_delay(Duration::ZERO, f).await
}

/// Like `start_upstream`, but waits `delay` before answering.
pub async fn start_upstream_with_delay<F>(delay: Duration, f: F) -> StubUpstream
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let targets = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = targets.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let target = read_request_target(&mut socket).await;
                recorded.lock().unwrap().push(target.clone());

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                let (status, body) = f(&target);
                let content_type = if serde_json::from_str::<serde_json::Value>(&body).is_ok() {
                    "application/json"
                } else {
                    "text/plain"
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    content_type,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    StubUpstream { addr, targets }
}

async fn read_request_target(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let head = String::from_utf8_lossy(&buf);
    head.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// An address nothing is listening on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Default config pointed at `base_url`.
pub fn proxy_config(base_url: String) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = base_url;
    config
}

/// A started proxy; shuts down when dropped.
pub struct RunningProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_proxy(config: ProxyConfig) -> RunningProxy {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningProxy { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
