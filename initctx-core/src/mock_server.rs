//! In-process mock of the code-host backend.
//!
//! Serves the repository lookup route the enterprise resolver calls, plus a
//! couple of `/.test` hooks so tests can register mappings, count lookups and
//! force lookup failures.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::repository::{LOOKUP_PATH, RepoLookupResponse};

const MAPPING_PATH: &str = "/.test/repos/mapping";
const FAIL_PATH: &str = "/.test/repos/fail";
const REQUESTS_PATH: &str = "/.test/requests";

#[derive(Default)]
struct MockState {
    /// canonical remote -> full repository name
    mappings: RwLock<HashMap<String, String>>,
    lookups: AtomicUsize,
    last_authorization: RwLock<Option<String>>,
    /// Status every lookup answers with while set.
    lookup_failure: RwLock<Option<StatusCode>>,
}

#[derive(Debug, Deserialize)]
struct LookupParams {
    remote: Option<String>,
}

/// Body of `POST /.test/repos/mapping`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingRequest {
    pub remote: String,
    pub name: String,
}

/// Body of `POST /.test/repos/fail`. `None` restores normal lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRequest {
    pub status: Option<u16>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestCount {
    pub lookups: usize,
}

/// Handle to a running mock server. Dropping it without calling
/// [`MockServer::shutdown`] leaves the server running until the runtime stops.
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server_handle: JoinHandle<()>,
}

impl MockServer {
    /// Binds an ephemeral port on localhost.
    pub async fn start() -> Result<Self> {
        Self::start_on(0).await
    }

    pub async fn start_on(port: u16) -> Result<Self> {
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/healthz", get(|| async { "OK" }))
            .route(LOOKUP_PATH, get(handle_lookup))
            .route(MAPPING_PATH, post(handle_register_mapping))
            .route(FAIL_PATH, post(handle_fail_lookups))
            .route(REQUESTS_PATH, get(handle_request_count))
            .with_state(state.clone());

        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind mock server to port {}", port))?;
        let addr = listener
            .local_addr()
            .context("Failed to read mock server address")?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
            tracing::debug!("mock server shutting down");
        });

        let server_handle = tokio::spawn(async move {
            if let Err(e) = server.await {
                tracing::error!("mock server error: {}", e);
            }
        });

        tracing::info!("mock backend listening on http://{}", addr);

        Ok(Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            server_handle,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL without a trailing slash.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Maps a canonical remote (`host/path`) to a repository name, the same
    /// thing `POST /.test/repos/mapping` does.
    pub fn register_mapping(&self, remote: impl Into<String>, name: impl Into<String>) {
        insert_mapping(&self.state, remote.into(), name.into());
    }

    /// Makes every following lookup answer with `status`, the same thing
    /// `POST /.test/repos/fail` does.
    pub fn fail_lookups_with(&self, status: StatusCode) {
        set_lookup_failure(&self.state, Some(status));
    }

    pub fn lookup_count(&self) -> usize {
        self.state.lookups.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent lookup, if it carried one.
    pub fn last_authorization(&self) -> Option<String> {
        self.state
            .last_authorization
            .read()
            .ok()
            .and_then(|value| value.clone())
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.server_handle).await;
    }
}

fn insert_mapping(state: &MockState, remote: String, name: String) {
    tracing::debug!(%remote, %name, "registered repository mapping");
    if let Ok(mut mappings) = state.mappings.write() {
        mappings.insert(remote, name);
    }
}

fn set_lookup_failure(state: &MockState, status: Option<StatusCode>) {
    tracing::debug!(?status, "lookup failure override");
    if let Ok(mut failure) = state.lookup_failure.write() {
        *failure = status;
    }
}

async fn handle_lookup(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<LookupParams>,
) -> Response {
    state.lookups.fetch_add(1, Ordering::SeqCst);

    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    if let Ok(mut last) = state.last_authorization.write() {
        *last = authorization;
    }

    if let Some(status) = state.lookup_failure.read().ok().and_then(|failure| *failure) {
        return (status, "forced lookup failure").into_response();
    }

    let Some(remote) = params.remote else {
        return (StatusCode::BAD_REQUEST, "missing remote parameter").into_response();
    };

    let name = state
        .mappings
        .read()
        .ok()
        .and_then(|mappings| mappings.get(&remote).cloned());

    match name {
        Some(name) => Json(RepoLookupResponse { name, remote }).into_response(),
        None => {
            tracing::debug!(%remote, "no repository mapping");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn handle_register_mapping(
    State(state): State<Arc<MockState>>,
    Json(request): Json<MappingRequest>,
) -> StatusCode {
    insert_mapping(&state, request.remote, request.name);
    StatusCode::NO_CONTENT
}

async fn handle_fail_lookups(
    State(state): State<Arc<MockState>>,
    Json(request): Json<FailureRequest>,
) -> Response {
    let status = match request.status.map(StatusCode::from_u16).transpose() {
        Ok(status) => status,
        Err(_) => return (StatusCode::BAD_REQUEST, "invalid status code").into_response(),
    };
    set_lookup_failure(&state, status);
    StatusCode::NO_CONTENT.into_response()
}

async fn handle_request_count(State(state): State<Arc<MockState>>) -> Json<RequestCount> {
    Json(RequestCount {
        lookups: state.lookups.load(Ordering::SeqCst),
    })
}
