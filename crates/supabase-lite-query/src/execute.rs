use serde_json::Value as JsonValue;

use supabase_lite_core::{HttpMethod, HttpRequest, QueryResponse, SupabaseResult, Transport};

use crate::postgrest::parse_content_range;

/// Send a rendered select and decode rows and count.
pub(crate) async fn execute_select(
    transport: &Transport,
    table: &str,
    request: HttpRequest,
) -> SupabaseResult<QueryResponse> {
    let head = request.method == HttpMethod::Head;
    tracing::debug!(table, head, "Executing PostgREST select");

    let response = transport.send(request).await?.error_for_status()?;
    let count = response.header("content-range").and_then(parse_content_range);
    let status = response.status();

    // HEAD carries no body; only the count matters
    let data = if head {
        JsonValue::Array(Vec::new())
    } else if response.bytes().is_empty() {
        JsonValue::Null
    } else {
        response.json()?
    };

    tracing::debug!(table, status, ?count, "PostgREST select finished");
    Ok(QueryResponse::new(data, count, status))
}

/// Send a rendered rpc call and decode its body. An empty body is `null`.
pub(crate) async fn execute_rpc(
    transport: &Transport,
    function: &str,
    request: HttpRequest,
) -> SupabaseResult<JsonValue> {
    tracing::debug!(function, method = %request.method, "Executing PostgREST rpc");

    let response = transport.send(request).await?.error_for_status()?;
    if response.bytes().is_empty() {
        return Ok(JsonValue::Null);
    }
    response.json()
}
