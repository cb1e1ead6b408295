//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use matrix_gateway::config::GatewayConfig;
use matrix_gateway::http::HttpServer;
use matrix_gateway::lifecycle::Shutdown;

/// One request as seen by the mock peer.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_id_header: Option<String>,
    pub body: Value,
}

/// Handle to a running mock peer.
pub struct MockPeer {
    pub addr: SocketAddr,
    calls: Arc<AtomicU32>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockPeer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }
}

/// Start a programmable mock peer on an ephemeral port.
///
/// `f` receives the zero-based call index and returns the status and body to reply with.
pub async fn start_programmable_peer<F, Fut>(f: F) -> MockPeer
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    let captured = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let handler = {
        let calls = calls.clone();
        let captured = captured.clone();
        move |headers: HeaderMap, body: Bytes| {
            let calls = calls.clone();
            let captured = captured.clone();
            let f = f.clone();
            async move {
                let index = calls.fetch_add(1, Ordering::SeqCst);
                captured.lock().unwrap().push(CapturedRequest {
                    request_id_header: headers
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_owned),
                    body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                });

                let (status, body) = f(index).await;
                (StatusCode::from_u16(status).unwrap(), body)
            }
        }
    };

    let app = Router::new().route("/process", post(handler));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockPeer { addr, calls, captured }
}

/// A well-formed statistics reply for a 3x3 grid of 1..=9.
pub fn statistics_reply(request_id: &str) -> String {
    json!({
        "rotated_matrix": [[7, 4, 1], [8, 5, 2], [9, 6, 3]],
        "statistics": {
            "max_value": 9,
            "min_value": 1,
            "average": 5.0,
            "total_sum": 45,
            "original_is_diagonal": false,
            "rotated_is_diagonal": false,
            "calculation_time_ms": 0.25
        },
        "request_id": request_id,
    })
    .to_string()
}

/// Gateway config pointed at `peer_url`, with short backoff for fast tests.
pub fn test_config(peer_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.auth.jwt_secret = "integration-test-secret".into();
    config.peer.base_url = peer_url.into();
    config.peer.base_delay_ms = 20;
    config.peer.request_timeout_secs = 2;
    config.peer.connect_timeout_secs = 1;
    config
}

/// Run a gateway on an ephemeral port until the returned `Shutdown` fires.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Log in with the default credentials and return the bearer token.
pub async fn login(client: &reqwest::Client, gateway: SocketAddr) -> String {
    let res = client
        .post(format!("http://{}/auth/login", gateway))
        .json(&json!({ "username": "admin", "password": "admin123" }))
        .send()
        .await
        .expect("Gateway unreachable");
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_owned()
}
