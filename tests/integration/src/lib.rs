//! json-server stand-in for end-to-end tests.
//!
//! Serves the `/users` and `/admin` collections over HTTP from a
//! [`MemoryAccountApi`], so the HTTP client can be exercised against real
//! sockets while tests inspect and manipulate the backing records directly.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use portal_api::{AccountApi, AccountQuery, ApiError, Collection, MemoryAccountApi};
use portal_model::{Account, AccountId, AccountPatch, NewAccount};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

type Backend = Arc<MemoryAccountApi>;

/// A running stand-in server. Shuts down when dropped.
pub struct StubServer {
    /// Address the server listens on.
    pub addr: SocketAddr,
    _shutdown_tx: oneshot::Sender<()>,
}

impl StubServer {
    /// Starts serving `backend` on an ephemeral local port.
    pub async fn start(backend: Backend) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = axum::serve(listener, router(backend))
                .with_graceful_shutdown(shutdown)
                .await
            {
                tracing::error!("stub server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            _shutdown_tx: shutdown_tx,
        })
    }

    /// Base URL of the server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Builds the json-server style router.
pub fn router(backend: Backend) -> Router {
    Router::new()
        .route("/:collection", get(list_or_find).post(create))
        .route(
            "/:collection/:id",
            get(fetch).put(replace).patch(patch).delete(remove),
        )
        .with_state(backend)
}

struct StubError(StatusCode, String);

impl IntoResponse for StubError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "message": self.1 }))).into_response()
    }
}

impl From<ApiError> for StubError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } => Self(
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            ),
            other => Self(StatusCode::SERVICE_UNAVAILABLE, other.to_string()),
        }
    }
}

fn collection(name: &str) -> Result<Collection, StubError> {
    match name {
        "users" => Ok(Collection::Users),
        "admin" => Ok(Collection::Admins),
        _ => Err(StubError(StatusCode::NOT_FOUND, format!("no collection {name}"))),
    }
}

fn record_id(raw: &str) -> AccountId {
    raw.parse::<u64>()
        .map_or_else(|_| AccountId::from(raw), AccountId::Number)
}

async fn list_or_find(
    State(api): State<Backend>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Account>>, StubError> {
    let collection = collection(&name)?;
    let records = match params.get("email") {
        Some(email) => {
            let mut query = AccountQuery::email(email.clone());
            if let Some(password) = params.get("password") {
                query = query.with_password(password.clone());
            }
            api.find(collection, &query).await?
        }
        None => api.list(collection).await?,
    };
    Ok(Json(records))
}

async fn create(
    State(api): State<Backend>,
    Path(name): Path<String>,
    Json(account): Json<NewAccount>,
) -> Result<Response, StubError> {
    let created = api.create(collection(&name)?, &account).await?;
    let status = StatusCode::from_u16(created.status).unwrap_or(StatusCode::CREATED);
    Ok((status, Json(created.account)).into_response())
}

async fn fetch(
    State(api): State<Backend>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<Account>, StubError> {
    Ok(Json(api.get(collection(&name)?, &record_id(&id)).await?))
}

async fn replace(
    State(api): State<Backend>,
    Path((name, id)): Path<(String, String)>,
    Json(mut account): Json<Account>,
) -> Result<Json<Account>, StubError> {
    account.id = record_id(&id);
    Ok(Json(api.replace(collection(&name)?, &account).await?))
}

async fn patch(
    State(api): State<Backend>,
    Path((name, id)): Path<(String, String)>,
    Json(patch): Json<AccountPatch>,
) -> Result<Json<Account>, StubError> {
    Ok(Json(
        api.patch(collection(&name)?, &record_id(&id), &patch).await?,
    ))
}

async fn remove(
    State(api): State<Backend>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, StubError> {
    api.delete(collection(&name)?, &record_id(&id)).await?;
    Ok(Json(json!({})))
}
