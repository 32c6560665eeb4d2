//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

use edge_router::config::{RouterConfig, SiteConfig};
use edge_router::storage::MemoryObjectStore;
use edge_router::upstream::{FetchError, Fetcher, UpstreamResponse};
use edge_router::HttpServer;

/// Site layout shared by the tests.
pub fn site() -> SiteConfig {
    SiteConfig {
        domain: "example.com".into(),
        marketing_subdomain: "marketing".into(),
        subdomains: "blog,shop,resources,seo".into(),
        bucket_host: "b.example".into(),
        bucket_app_root: "app-root".into(),
        compute_base_url: "compute.internal".into(),
    }
}

pub fn config() -> RouterConfig {
    RouterConfig {
        site: site(),
        ..RouterConfig::default()
    }
}

/// One canned upstream answer.
#[derive(Debug, Clone)]
struct Scripted {
    final_url: String,
    status: u16,
    content_type: String,
    body: String,
}

/// Scripted upstream: canned responses by URL, with a log of every fetch.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    responses: HashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` directly.
    pub fn respond(self, url: &str, status: u16, content_type: &str, body: &str) -> Self {
        self.script(url, url, status, content_type, body)
    }

    /// Answer `url` as if a redirect to `final_url` had been followed.
    pub fn redirect(self, url: &str, final_url: &str, content_type: &str, body: &str) -> Self {
        self.script(url, final_url, 200, content_type, body)
    }

    fn script(
        mut self,
        url: &str,
        final_url: &str,
        status: u16,
        content_type: &str,
        body: &str,
    ) -> Self {
        self.responses.insert(
            url.to_string(),
            Scripted {
                final_url: final_url.to_string(),
                status,
                content_type: content_type.to_string(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn upstream(url: &str, scripted: Scripted) -> UpstreamResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, scripted.content_type.parse().unwrap());
    headers.insert(
        header::CONTENT_LENGTH,
        scripted.body.len().to_string().parse().unwrap(),
    );

    UpstreamResponse {
        status: StatusCode::from_u16(scripted.status).unwrap(),
        headers,
        redirected: url != scripted.final_url,
        url: Url::parse(&scripted.final_url).unwrap(),
        body: Body::from(scripted.body),
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &Url) -> Result<UpstreamResponse, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let scripted = self.responses.get(url.as_str()).cloned().unwrap_or_else(|| Scripted {
            final_url: url.to_string(),
            status: 404,
            content_type: "text/plain".to_string(),
            body: "missing".to_string(),
        });
        Ok(upstream(url.as_str(), scripted))
    }
}

/// Server over scripted collaborators.
pub fn server(fetcher: Arc<ScriptedFetcher>, store: MemoryObjectStore) -> HttpServer {
    server_with(config(), fetcher, store)
}

pub fn server_with(
    config: RouterConfig,
    fetcher: Arc<ScriptedFetcher>,
    store: MemoryObjectStore,
) -> HttpServer {
    HttpServer::new(config, fetcher, Arc::new(store))
}

/// Send one request through the router without a socket.
pub async fn send(
    server: &HttpServer,
    method: &str,
    host: &str,
    path_and_query: &str,
) -> (StatusCode, HeaderMap, Bytes) {
    let request = Request::builder()
        .method(method)
        .uri(path_and_query)
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap();

    let response = server.router().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    (parts.status, parts.headers, body)
}

pub async fn get(server: &HttpServer, host: &str, path_and_query: &str) -> (StatusCode, HeaderMap, Bytes) {
    send(server, "GET", host, path_and_query).await
}

/// Start a raw HTTP/1.1 backend on an ephemeral port. `respond` receives the
/// request path and returns `(status line, extra headers, body)`.
pub async fn start_backend<F>(respond: F) -> SocketAddr
where
    F: Fn(&str) -> (&'static str, Vec<(String, String)>, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let respond = respond.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let path = request
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();

                        let (status, headers, body) = respond(&path);
                        let mut response = format!("HTTP/1.1 {status}\r\n");
                        for (name, value) in headers {
                            response.push_str(&format!("{name}: {value}\r\n"));
                        }
                        response.push_str(&format!(
                            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        ));
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that answers `200` with `first`, stalls for `pause`, then
/// sends `rest`. `Content-Length` covers both halves.
pub async fn start_stalling_backend(
    first: &'static str,
    pause: Duration,
    rest: &'static str,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await;

                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    first.len() + rest.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(first.as_bytes()).await;
                let _ = socket.flush().await;
                tokio::time::sleep(pause).await;
                let _ = socket.write_all(rest.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a backend that accepts connections but never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
