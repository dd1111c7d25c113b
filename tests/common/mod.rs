#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;

use movelead::relay::{self, RelayState};
use movelead_config::RelayConfig;

/// Relay configuration in simulated mode; `overrides` replace or add keys.
pub fn relay_config(overrides: &[(&str, &str)]) -> RelayConfig {
    let mut env: HashMap<String, String> = [
        ("CAMPAIGN_ID", "campaign-1"),
        ("CAMPAIGN_KEY", "secret-key"),
        ("API_URL", "http://127.0.0.1:9/leads"),
        ("USE_MOCK_API", "true"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();
    for (key, value) in overrides {
        env.insert(key.to_string(), value.to_string());
    }
    RelayConfig::from_lookup(|key| env.get(key).cloned()).expect("test relay config")
}

/// Serves the relay on an ephemeral port for the rest of the test.
pub async fn spawn_relay(config: RelayConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind relay");
    let addr = listener.local_addr().expect("relay addr");
    let state = RelayState::new(config).expect("relay state");
    tokio::spawn(relay::serve_with_shutdown(
        listener,
        state,
        std::future::pending(),
    ));
    addr
}

/// A stand-in lead-distribution API that records every payload it receives.
#[derive(Clone)]
pub struct FakeUpstream {
    pub status: StatusCode,
    pub body: &'static str,
    pub seen: Arc<Mutex<Vec<Value>>>,
}

async fn accept_lead(
    State(upstream): State<FakeUpstream>,
    Json(payload): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    upstream.seen.lock().push(payload);
    (
        upstream.status,
        [(header::CONTENT_TYPE, "application/json")],
        upstream.body,
    )
}

/// Starts a fake upstream and returns its URL plus the payload log.
pub async fn spawn_upstream(
    status: StatusCode,
    body: &'static str,
) -> (String, Arc<Mutex<Vec<Value>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/leads", post(accept_lead))
        .with_state(FakeUpstream {
            status,
            body,
            seen: seen.clone(),
        });
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/leads"), seen)
}

pub fn quote_body() -> Value {
    serde_json::json!({
        "zip_code": "12345",
        "move_to_zip_code": "67890",
        "move_to_state": "TX",
        "move_date": "2026-11-02",
        "moving_size": "2BR"
    })
}
