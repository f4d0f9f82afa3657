//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

use inertia_server::config::ServerConfig;
use inertia_server::lifecycle::{startup, Shutdown};
use inertia_server::{AppState, HttpServer};

pub const TEMPLATE: &str = "<!DOCTYPE html>\n<html>\n<head><title>App</title></head>\n<body>\n<div id=\"app\"></div>\n</body>\n</html>\n";

/// A server configuration rooted in a fresh template directory.
pub struct TestApp {
    pub dir: TempDir,
    pub config: ServerConfig,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_version("1.0.0")
    }

    pub fn with_version(version: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), TEMPLATE).unwrap();

        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.inertia.root = dir.path().to_path_buf();
        config.inertia.version = version.into();

        let state = startup::build_state(&config).unwrap();
        Self { dir, config, state }
    }

    /// The application router with the full middleware stack.
    pub fn router(&self) -> Router {
        HttpServer::new(self.config.clone(), self.state.clone()).router()
    }
}

/// Serve `router` on an ephemeral port until the returned handle is triggered.
pub async fn spawn_server(router: Router) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(signal.wait())
            .await
            .unwrap();
    });

    (addr, shutdown)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// A protocol GET carrying the given client version.
pub fn inertia_get(uri: &str, version: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Inertia", "true")
        .header("X-Inertia-Version", version)
        .body(Body::empty())
        .unwrap()
}

pub fn partial_get(uri: &str, version: &str, component: &str, only: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Inertia", "true")
        .header("X-Inertia-Version", version)
        .header("X-Inertia-Partial-Component", component)
        .header("X-Inertia-Partial-Data", only)
        .body(Body::empty())
        .unwrap()
}

pub fn json_post(uri: &str, body: &Value, inertia_version: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(version) = inertia_version {
        builder = builder
            .header("X-Inertia", "true")
            .header("X-Inertia-Version", version);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
