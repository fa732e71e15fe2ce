use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::error::{SupabaseError, SupabaseResult};

/// Configuration for connecting to a Supabase project.
///
/// Built once, then handed to [`SupabaseClient::new`](crate::SupabaseClient::new),
/// which validates it and keeps it immutable for the life of the client.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g. "https://your-project.supabase.co")
    pub supabase_url: String,
    /// anon or service_role key, sent as `apikey` and as the bearer token
    pub api_key: String,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
    /// Default schema (defaults to "public")
    pub schema: String,
    /// Per-request timeout enforced by the HTTP client
    pub timeout: Option<Duration>,
}

impl SupabaseConfig {
    /// Create a new config with a project URL and API key.
    pub fn new(supabase_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into(),
            api_key: api_key.into(),
            headers: HashMap::new(),
            schema: "public".to_string(),
            timeout: None,
        }
    }

    /// Add a header sent with every request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add multiple headers sent with every request.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the default schema.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check the URL and key, returning the parsed project URL.
    pub fn validate(&self) -> SupabaseResult<Url> {
        let raw = self.supabase_url.trim();
        if raw.is_empty() {
            return Err(SupabaseError::config("supabase_url cannot be empty"));
        }
        let url = Url::parse(raw)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SupabaseError::config(format!(
                "supabase_url must use http or https, got {:?}",
                url.scheme()
            )));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(SupabaseError::config("supabase_url has no host"));
        }
        if self.api_key.trim().is_empty() {
            return Err(SupabaseError::config("api_key cannot be empty"));
        }
        if self.schema.trim().is_empty() {
            return Err(SupabaseError::config("schema cannot be empty"));
        }
        Ok(url)
    }
}
