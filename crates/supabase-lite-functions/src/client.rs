use serde_json::Value;
use tracing::debug;

use supabase_lite_core::{
    ApiError, HttpRequest, SupabaseError, SupabaseResult, Transport,
};

use crate::types::{FunctionResponse, InvokeOptions};

/// HTTP client for Supabase Edge Functions.
///
/// Communicates with Edge Functions at `/functions/v1/{function_name}`.
///
/// # Example
/// ```no_run
/// # async fn demo(client: supabase_lite_core::SupabaseClient) -> supabase_lite_core::SupabaseResult<()> {
/// use supabase_lite_functions::{InvokeOptions, SupabaseClientFunctionsExt};
/// use serde_json::json;
///
/// let response = client
///     .functions()
///     .invoke("hello", InvokeOptions::new().body(json!({"name": "World"})))
///     .await?;
/// let data: serde_json::Value = response.json()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FunctionsClient {
    transport: Transport,
}

impl FunctionsClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Render the invocation request without sending it.
    pub fn to_request(
        &self,
        function_name: &str,
        options: InvokeOptions,
    ) -> SupabaseResult<HttpRequest> {
        let name = function_name.trim();
        if name.is_empty() {
            return Err(SupabaseError::invalid_input("function name cannot be empty"));
        }

        let mut req = HttpRequest::new(options.method, ["functions", "v1", name]);
        for (key, value) in options.headers {
            req = req.header(key, value);
        }
        if let Some(auth) = options.authorization {
            req = req.header("Authorization", auth);
        }
        if let Some(region) = options.region {
            req = req.header("x-region", region);
        }
        if let Some(ct) = options.content_type {
            req = req.header("Content-Type", ct);
        }
        if let Some(body) = options.body {
            req = req.body(body);
        }
        Ok(req)
    }

    /// Invoke an Edge Function.
    ///
    /// # Errors
    /// * [`SupabaseError::Remote`] with code `relay_error` if the platform
    ///   relay failed (`x-relay-error: true`).
    /// * [`SupabaseError::Remote`] if the function returned a non-2xx status.
    /// * [`SupabaseError::Transport`] on network failure.
    pub async fn invoke(
        &self,
        function_name: &str,
        options: InvokeOptions,
    ) -> SupabaseResult<FunctionResponse> {
        let request = self.to_request(function_name, options)?;
        debug!(function = function_name, method = %request.method, "Invoking edge function");

        let response = self.transport.send(request).await?;
        let status = response.status();

        if response.header("x-relay-error") == Some("true") {
            let api = ApiError::from_body(status, response.bytes()).with_code("relay_error");
            debug!(status, message = %api.message, "Relay error from edge function");
            return Err(SupabaseError::Remote(api));
        }
        if !response.is_success() {
            debug!(status, "HTTP error from edge function");
        }
        response.error_for_status()
    }

    /// POST a JSON payload and decode the JSON answer. An empty body is `null`.
    pub async fn invoke_json(&self, function_name: &str, payload: Value) -> SupabaseResult<Value> {
        let response = self
            .invoke(function_name, InvokeOptions::new().body(payload))
            .await?;
        if response.bytes().is_empty() {
            return Ok(Value::Null);
        }
        response.json()
    }
}
