//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

use fantasy_gateway::config::GatewayConfig;
use fantasy_gateway::lifecycle::Shutdown;
use fantasy_gateway::HttpServer;

/// One request the mock upstream received, with the `/api` prefix removed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

/// What the mock upstream answers: status and optional JSON body.
pub type Reply = (u16, Option<Value>);

type Responder = dyn Fn(&Method, &str) -> Reply + Send + Sync;

#[derive(Clone)]
struct MockState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    respond: Arc<Responder>,
    latency: Duration,
}

/// A running mock of the fantasy API.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// `METHOD /path?query` for every call, in arrival order.
    pub fn summary(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|call| match call.query {
                Some(query) => format!("{} {}?{}", call.method, call.path, query),
                None => format!("{} {}", call.method, call.path),
            })
            .collect()
    }
}

/// Start a programmable mock upstream on an ephemeral port.
pub async fn start_mock_upstream<F>(respond: F) -> MockUpstream
where
    F: Fn(&Method, &str) -> Reply + Send + Sync + 'static,
{
    start_slow_upstream(Duration::ZERO, respond).await
}

/// Like [`start_mock_upstream`], delaying every reply by `latency`.
pub async fn start_slow_upstream<F>(latency: Duration, respond: F) -> MockUpstream
where
    F: Fn(&Method, &str) -> Reply + Send + Sync + 'static,
{
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        calls: calls.clone(),
        respond: Arc::new(respond),
        latency,
    };

    let app = Router::new().fallback(mock_handler).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { addr, calls }
}

async fn mock_handler(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_string();
    let body = serde_json::from_slice(&body).ok();
    state.calls.lock().unwrap().push(RecordedCall {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        body,
    });

    if !state.latency.is_zero() {
        tokio::time::sleep(state.latency).await;
    }

    let (status, payload) = (state.respond)(&method, &path);
    let status = StatusCode::from_u16(status).unwrap();
    match payload {
        Some(payload) => (status, Json(payload)).into_response(),
        None => status.into_response(),
    }
}

/// Canned fantasy API: two teams, a roster, a few players.
pub fn fantasy_api(method: &Method, path: &str) -> Reply {
    use serde_json::json;

    let team = json!({"id": 12, "name": "Hawks", "budget": 100.0});
    let qb = json!({"id": 7, "name": "Patrick Mahomes", "position": "QB"});
    let wr = json!({"id": 8, "name": "Tyreek Hill", "position": "WR"});

    match (method.as_str(), path) {
        ("GET", "/teams") => (200, Some(json!([team, {"id": 13, "name": "Owls"}]))),
        ("GET", "/teams/12") => (200, Some(team)),
        ("GET", "/teams/12/roster") => (200, Some(json!([qb, wr]))),
        ("GET", "/teams/12/starters") => (200, Some(json!([qb]))),
        ("GET", "/teams/12/bench") => (200, Some(json!([wr]))),
        ("GET", "/players/active") => (200, Some(json!([qb, wr]))),
        ("GET", "/players/search") => (200, Some(json!([qb]))),
        ("GET", p) if p.starts_with("/players/position/") => (200, Some(json!([qb]))),
        ("GET", p) if p.starts_with("/players/available/") => (200, Some(json!([wr]))),
        ("GET", "/players/7/with-stats") => (200, Some(json!({"id": 7, "name": "Patrick Mahomes", "stats": {"passingYards": 4183}}))),
        ("POST", "/teams") => (201, Some(json!({"id": 14, "name": "Created"}))),
        ("POST", p) if p.starts_with("/teams/12/players/") => (200, Some(json!({"teamId": 12, "playerId": 7}))),
        ("PUT", p) if p.starts_with("/teams/12/players/") => (200, Some(json!({"rosterPosition": "STARTER"}))),
        ("DELETE", p) if p.starts_with("/teams/12/players/") => (204, None),
        _ => (404, Some(json!({"message": "Not found"}))),
    }
}

/// A gateway configuration pointing at `upstream_base_url`.
pub fn gateway_config(upstream_base_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.upstream.base_url = upstream_base_url.to_string();
    config
}

/// A running gateway. Shuts down when dropped.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the gateway on an ephemeral port against `upstream_base_url`.
pub async fn start_gateway(upstream_base_url: &str) -> TestGateway {
    let server = HttpServer::new(gateway_config(upstream_base_url)).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway { addr, shutdown }
}

/// An address nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}
