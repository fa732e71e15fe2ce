use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{error_response, MockState};

pub(crate) async fn list_buckets(State(state): State<MockState>) -> Response {
    Json(state.buckets.as_ref().clone()).into_response()
}

pub(crate) async fn get_bucket(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    match state.buckets.iter().find(|b| b["id"] == id.as_str()) {
        Some(bucket) => Json(bucket.clone()).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            json!({"statusCode": "404", "error": "Bucket not found", "message": "Bucket not found"}),
        ),
    }
}
