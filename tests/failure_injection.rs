//! Failure injection tests: a real gateway in front of a misbehaving peer.

use std::time::{Duration, Instant};

use serde_json::{json, Value};

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

async fn rotate(
    client: &reqwest::Client,
    gateway: std::net::SocketAddr,
    token: &str,
    request_id: Option<&str>,
) -> reqwest::Response {
    let mut req = client
        .post(format!("http://{}/rotate", gateway))
        .bearer_auth(token)
        .json(&json!({ "matrix": [[1, 2, 3], [4, 5, 6], [7, 8, 9]] }));
    if let Some(id) = request_id {
        req = req.header("x-request-id", id);
    }
    req.send().await.expect("Gateway unreachable")
}

#[tokio::test]
async fn test_retry_on_unavailable_peer() {
    let peer = common::start_programmable_peer(|index| async move {
        if index < 2 {
            (503, "Service Unavailable".into())
        } else {
            (200, common::statistics_reply("retried"))
        }
    })
    .await;

    let (gateway, shutdown) = common::start_gateway(common::test_config(&peer.base_url())).await;
    let client = client();
    let token = common::login(&client, gateway).await;

    let started = Instant::now();
    let res = rotate(&client, gateway, &token, None).await;
    assert_eq!(res.status(), 200, "Should eventually succeed after retries");
    assert_eq!(peer.calls(), 3, "Should have attempted 3 times");
    // Two backoff sleeps of 20ms and 40ms.
    assert!(started.elapsed() >= Duration::from_millis(60));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["rotated_matrix"], json!([[7, 4, 1], [8, 5, 2], [9, 6, 3]]));
    assert_eq!(body["original_matrix"], json!([[1, 2, 3], [4, 5, 6], [7, 8, 9]]));
    assert_eq!(body["statistics"]["total_sum"], 45);
    assert!(body["processing_time_ms"].as_f64().unwrap() >= 0.0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_exhausted_retries_report_unavailable() {
    let peer = common::start_programmable_peer(|_| async { (500, "boom".into()) }).await;

    let (gateway, shutdown) = common::start_gateway(common::test_config(&peer.base_url())).await;
    let client = client();
    let token = common::login(&client, gateway).await;

    let res = rotate(&client, gateway, &token, Some("exhaust-1")).await;
    assert_eq!(res.status(), 503);
    assert_eq!(peer.calls(), 4, "One initial attempt plus three retries");

    let body: Value = res.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("failed to process matrix with statistics service"));
    assert_eq!(body["request_id"], "exhaust-1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let peer = common::start_programmable_peer(|_| async { (400, "bad matrix".into()) }).await;

    let (gateway, shutdown) = common::start_gateway(common::test_config(&peer.base_url())).await;
    let client = client();
    let token = common::login(&client, gateway).await;

    let res = rotate(&client, gateway, &token, None).await;
    assert_eq!(res.status(), 503);
    assert_eq!(peer.calls(), 1, "4xx from the peer must fail fast");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_peer() {
    // Bind then drop to get a port with nothing listening.
    let vacant = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let peer_url = format!("http://{}", vacant.local_addr().unwrap());
    drop(vacant);

    let mut config = common::test_config(&peer_url);
    config.peer.max_retries = 1;
    let (gateway, shutdown) = common::start_gateway(config).await;
    let client = client();
    let token = common::login(&client, gateway).await;

    let res = rotate(&client, gateway, &token, None).await;
    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert!(body["request_id"].as_str().is_some_and(|id| !id.is_empty()));

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_reaches_peer() {
    let peer = common::start_programmable_peer(|_| async {
        (200, common::statistics_reply("trace-42"))
    })
    .await;

    let (gateway, shutdown) = common::start_gateway(common::test_config(&peer.base_url())).await;
    let client = client();
    let token = common::login(&client, gateway).await;

    let res = rotate(&client, gateway, &token, Some("trace-42")).await;
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-request-id"], "trace-42");

    let captured = peer.captured();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].request_id_header.as_deref(), Some("trace-42"));
    assert_eq!(captured[0].body["request_id"], "trace-42");
    assert_eq!(captured[0].body["original_matrix"], json!([[1, 2, 3], [4, 5, 6], [7, 8, 9]]));
    assert_eq!(captured[0].body["rotated_matrix"], json!([[7, 4, 1], [8, 5, 2], [9, 6, 3]]));

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_peer_reply_is_retried() {
    let peer = common::start_programmable_peer(|index| async move {
        if index == 0 {
            (200, "{not json".into())
        } else {
            (200, common::statistics_reply("decode"))
        }
    })
    .await;

    let (gateway, shutdown) = common::start_gateway(common::test_config(&peer.base_url())).await;
    let client = client();
    let token = common::login(&client, gateway).await;

    let res = rotate(&client, gateway, &token, None).await;
    assert_eq!(res.status(), 200);
    assert_eq!(peer.calls(), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_hung_peer_hits_per_call_deadline() {
    let peer = common::start_programmable_peer(|_| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, common::statistics_reply("late"))
    })
    .await;

    let mut config = common::test_config(&peer.base_url());
    config.peer.request_timeout_secs = 1;
    config.peer.max_retries = 1;
    let (gateway, shutdown) = common::start_gateway(config).await;
    let client = client();
    let token = common::login(&client, gateway).await;

    let started = Instant::now();
    let res = rotate(&client, gateway, &token, None).await;
    let elapsed = started.elapsed();

    assert_eq!(res.status(), 503);
    assert_eq!(peer.calls(), 2, "Initial attempt plus one retry");
    // Two 1s deadlines and a 20ms backoff.
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(4), "took {:?}", elapsed);

    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("did not respond within"));

    shutdown.trigger();
}
