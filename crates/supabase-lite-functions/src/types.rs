use std::collections::HashMap;

use serde_json::Value;
use supabase_lite_core::{HttpMethod, HttpResponse, RequestBody};

/// Response from an Edge Function invocation: status, lowercased headers and
/// the raw body, with `json()`, `text()` and `bytes()` accessors.
pub type FunctionResponse = HttpResponse;

/// Options for invoking an Edge Function.
///
/// # Example
/// ```
/// use supabase_lite_functions::InvokeOptions;
/// use serde_json::json;
///
/// let opts = InvokeOptions::new()
///     .body(json!({"name": "World"}))
///     .header("x-custom", "value")
///     .region("eu-west-1");
/// ```
#[derive(Debug, Clone)]
pub struct InvokeOptions {
    pub(crate) body: Option<RequestBody>,
    pub(crate) method: HttpMethod,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) region: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) authorization: Option<String>,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl InvokeOptions {
    /// Create new invoke options with defaults (POST, no body).
    pub fn new() -> Self {
        Self {
            body: None,
            method: HttpMethod::Post,
            headers: HashMap::new(),
            region: None,
            content_type: None,
            authorization: None,
        }
    }

    /// Set a JSON body.
    pub fn body(mut self, value: Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    /// Set a raw binary body.
    pub fn body_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.body = Some(RequestBody::Bytes(bytes));
        self
    }

    /// Set a text body.
    pub fn body_text(mut self, text: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(text.into()));
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Add a custom header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add multiple custom headers.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Run the function in a specific region (sent as `x-region`), e.g. `"us-east-1"`.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Override the Content-Type header explicitly.
    pub fn content_type(mut self, ct: impl Into<String>) -> Self {
        self.content_type = Some(ct.into());
        self
    }

    /// Override the Authorization header (e.g., `"Bearer <user-jwt>"`).
    pub fn authorization(mut self, auth: impl Into<String>) -> Self {
        self.authorization = Some(auth.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invoke_options_defaults() {
        let opts = InvokeOptions::new();
        assert!(opts.body.is_none());
        assert_eq!(opts.method, HttpMethod::Post);
        assert!(opts.headers.is_empty());
        assert!(opts.region.is_none());
        assert!(opts.content_type.is_none());
        assert!(opts.authorization.is_none());
    }

    #[test]
    fn invoke_options_builder() {
        let opts = InvokeOptions::new()
            .body(json!({"key": "value"}))
            .method(HttpMethod::Put)
            .header("x-custom", "test")
            .region("ap-northeast-1")
            .content_type("application/custom+json")
            .authorization("Bearer user-jwt");
        assert_eq!(opts.body, Some(RequestBody::Json(json!({"key": "value"}))));
        assert_eq!(opts.method, HttpMethod::Put);
        assert_eq!(opts.headers.get("x-custom").map(String::as_str), Some("test"));
        assert_eq!(opts.region.as_deref(), Some("ap-northeast-1"));
        assert_eq!(opts.content_type.as_deref(), Some("application/custom+json"));
        assert_eq!(opts.authorization.as_deref(), Some("Bearer user-jwt"));
    }

    #[test]
    fn later_body_replaces_earlier() {
        let opts = InvokeOptions::new().body(json!(1)).body_text("plain");
        assert_eq!(opts.body, Some(RequestBody::Text("plain".into())));
    }

    #[test]
    fn multiple_headers() {
        let mut extra = HashMap::new();
        extra.insert("a".to_string(), "1".to_string());
        extra.insert("b".to_string(), "2".to_string());
        let opts = InvokeOptions::new().header("c", "3").headers(extra);
        assert_eq!(opts.headers.len(), 3);
    }
}
