//! Mock Thunder backend for integration tests.
//!
//! A single axum fallback handler records every request and answers from a
//! table of canned responses keyed by method and path.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thunder_wallet::config::ApiConfig;
use thunder_wallet::{BearerToken, ThunderClient};
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token-123";

#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    routes: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.respond_raw(method, path, status, &body.to_string())
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.routes.lock().unwrap().insert(
            (method.to_uppercase(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    /// Serve on an ephemeral port; returns the API base URL.
    pub async fn start(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }
}

async fn handle(
    State(mock): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let header_text = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    mock.hits.lock().unwrap().push(Hit {
        method: method.to_string(),
        path: path.clone(),
        authorization: header_text(header::AUTHORIZATION.as_str()),
        request_id: header_text("x-request-id"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let canned = mock
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), path))
        .cloned();
    match canned {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            json!({ "message": "not found" }).to_string(),
        )
            .into_response(),
    }
}

pub fn client(base_url: &str) -> ThunderClient {
    ThunderClient::new(
        &ApiConfig {
            base_url: base_url.to_string(),
        },
        Some(BearerToken::new(TOKEN).unwrap()),
    )
    .unwrap()
}

pub fn anonymous_client(base_url: &str) -> ThunderClient {
    ThunderClient::new(
        &ApiConfig {
            base_url: base_url.to_string(),
        },
        None,
    )
    .unwrap()
}

/// Base URL of a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

pub fn wallets_json() -> Value {
    json!([
        {
            "walletId": "ngn-1",
            "currency": { "id": 1, "code": "NGN", "name": "Naira", "type": "fiat" },
            "balance": "25000"
        },
        {
            "walletId": "usdt-1",
            "currency": { "id": 4, "code": "USDT", "name": "Tether", "type": "crypto" },
            "balance": "120.5",
            "address": "TXYZabc123def456ghi789jkl012mno345",
            "network": "tron"
        }
    ])
}

pub fn quote_json() -> Value {
    json!({
        "quoteId": "q-77",
        "quoteReference": "QREF-77",
        "rate": "1",
        "expiresAt": "2030-01-01T00:00:00Z",
        "sourceDebitAmount": "5000",
        "networkFee": "0",
        "internalFee": "50",
        "totalDebit": "5050"
    })
}
