//! In-process fake backend for client tests
//!
//! Serves canned JSON responses keyed by method and path, and records every
//! request it receives so tests can assert on what the client sent.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::config::ApiConfig;

/// A request as seen by the fake backend
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
struct CannedRoute {
    method: &'static str,
    path: String,
    status: u16,
    body: Option<serde_json::Value>,
}

#[derive(Clone, Default)]
struct Shared {
    routes: Arc<Vec<CannedRoute>>,
    log: Arc<Mutex<Vec<Recorded>>>,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    routes: Vec<CannedRoute>,
}

pub(crate) struct RunningBackend {
    addr: SocketAddr,
    log: Arc<Mutex<Vec<Recorded>>>,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: &'static str, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.routes.push(CannedRoute {
            method,
            path: path.to_string(),
            status,
            body: Some(body),
        });
        self
    }

    pub fn empty_route(mut self, method: &'static str, path: &str, status: u16) -> Self {
        self.routes.push(CannedRoute {
            method,
            path: path.to_string(),
            status,
            body: None,
        });
        self
    }

    pub async fn start(self) -> RunningBackend {
        let shared = Shared {
            routes: Arc::new(self.routes),
            log: Arc::default(),
        };
        let log = Arc::clone(&shared.log);

        let router = Router::new().fallback(handle).with_state(shared);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        RunningBackend { addr, log, handle }
    }

    /// URL of a port nothing is listening on
    pub async fn unused_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }
}

impl RunningBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(ApiConfig {
            url: self.url(),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    pub async fn signed_in_client(&self, token: &str) -> ApiClient {
        let client = self.client();
        client.set_token(token).await;
        client
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request reached the fake backend")
    }
}

impl Drop for RunningBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    shared.log.lock().unwrap().push(recorded);

    let matched = shared
        .routes
        .iter()
        .find(|r| r.method == method.as_str() && r.path == uri.path());

    match matched {
        Some(route) => {
            let status = StatusCode::from_u16(route.status).unwrap();
            match &route.body {
                Some(body) => (status, Json(body.clone())).into_response(),
                None => status.into_response(),
            }
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"message": format!("No route for {} {}", method, uri.path())})),
        )
            .into_response(),
    }
}
