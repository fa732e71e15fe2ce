use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use crate::error_response;

pub(crate) async fn invoke(
    Path(function): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match function.as_str() {
        "hello_world" => {
            let name = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|v| v.get("name").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| "anonymous".to_string());
            Json(json!({"message": format!("Hello {name}!")})).into_response()
        }
        "echo" => {
            let content_type = headers
                .get(header::CONTENT_TYPE)
                .cloned()
                .unwrap_or(HeaderValue::from_static("application/octet-stream"));
            let mut response = body.into_response();
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
            response
        }
        "echo-request" => {
            let received: Map<String, Value> = headers
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), Value::String(v.to_string())))
                })
                .collect();
            Json(json!({"method": method.as_str(), "headers": received})).into_response()
        }
        "crash" => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Function crashed"}),
        ),
        "boot-error" => {
            let mut response = error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                json!({"msg": "Function failed to boot"}),
            );
            response
                .headers_mut()
                .insert("x-relay-error", HeaderValue::from_static("true"));
            response
        }
        _ => error_response(
            StatusCode::NOT_FOUND,
            json!({"code": "NOT_FOUND", "message": "Requested function was not found"}),
        ),
    }
}
