//! A small axum server that answers like a Supabase project.
//!
//! It serves seeded `countries` and `cities` tables under `/rest/v1`, a few
//! remote procedures under `/rest/v1/rpc`, two buckets under `/storage/v1`
//! and a handful of edge functions under `/functions/v1`. Every route
//! requires an `apikey` header and a bearer token, like the real gateway.

mod functions;
mod rest;
mod storage;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Seeded, read-only data behind the mock.
#[derive(Debug, Clone)]
pub struct MockState {
    pub(crate) tables: Arc<HashMap<String, Vec<Value>>>,
    pub(crate) buckets: Arc<Vec<Value>>,
}

impl Default for MockState {
    fn default() -> Self {
        let mut tables = HashMap::new();
        tables.insert(
            "countries".to_string(),
            vec![
                json!({"id": 1, "name": "New Zealand", "code": "NZ"}),
                json!({"id": 2, "name": "Australia", "code": "AU"}),
                json!({"id": 3, "name": "Japan", "code": "JP"}),
            ],
        );
        tables.insert(
            "cities".to_string(),
            vec![
                json!({"id": 1, "name": "Auckland", "country_id": 1, "population": 1657000, "is_capital": false, "nickname": "City of Sails"}),
                json!({"id": 2, "name": "Wellington", "country_id": 1, "population": 215000, "is_capital": true, "nickname": null}),
                json!({"id": 3, "name": "Sydney", "country_id": 2, "population": 5312000, "is_capital": false, "nickname": "Harbour City"}),
                json!({"id": 4, "name": "Canberra", "country_id": 2, "population": 462000, "is_capital": true, "nickname": null}),
                json!({"id": 5, "name": "Tokyo", "country_id": 3, "population": 13960000, "is_capital": true, "nickname": null}),
                json!({"id": 6, "name": "Osaka", "country_id": 3, "population": 2753000, "is_capital": false, "nickname": "Kitchen of Japan"}),
            ],
        );

        let buckets = vec![
            json!({
                "id": "avatars",
                "name": "avatars",
                "owner": "",
                "public": true,
                "file_size_limit": null,
                "allowed_mime_types": null,
                "created_at": "2024-01-01T00:00:00.000Z",
                "updated_at": "2024-01-01T00:00:00.000Z"
            }),
            json!({
                "id": "documents",
                "name": "documents",
                "owner": "",
                "public": false,
                "file_size_limit": 1048576,
                "allowed_mime_types": ["application/pdf"],
                "created_at": "2024-01-02T00:00:00.000Z",
                "updated_at": "2024-01-02T00:00:00.000Z"
            }),
        ];

        Self {
            tables: Arc::new(tables),
            buckets: Arc::new(buckets),
        }
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/rest/v1/rpc/{function}", get(rest::call_rpc).post(rest::call_rpc))
        .route("/rest/v1/{table}", get(rest::select_rows))
        .route("/storage/v1/bucket", get(storage::list_buckets))
        .route("/storage/v1/bucket/{id}", get(storage::get_bucket))
        .route("/functions/v1/{function}", any(functions::invoke))
        .layer(middleware::from_fn(require_api_key))
        .with_state(MockState::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Bind an ephemeral port, serve in the background and return the base URL.
pub async fn spawn() -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = run(listener).await {
            tracing::error!(error = %e, "mock server stopped");
        }
    });
    Ok(format!("http://{addr}"))
}

async fn require_api_key(req: Request, next: Next) -> Response {
    let has_key = req
        .headers()
        .get("apikey")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.is_empty());
    let has_bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "));
    if has_key && has_bearer {
        next.run(req).await
    } else {
        error_response(
            StatusCode::UNAUTHORIZED,
            json!({"message": "No API key found in request"}),
        )
    }
}

pub(crate) fn error_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_tables() {
        let state = MockState::default();
        assert_eq!(state.tables["countries"].len(), 3);
        assert_eq!(state.tables["cities"].len(), 6);
        assert_eq!(state.buckets.len(), 2);
    }

    #[tokio::test]
    async fn spawn_returns_local_url() {
        let url = spawn().await.unwrap();
        assert!(url.starts_with("http://127.0.0.1:"));
    }
}
