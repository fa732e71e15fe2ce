use serde::de::DeserializeOwned;

use supabase_lite_core::{HttpMethod, HttpRequest, SupabaseError, SupabaseResult, Transport};

use crate::types::Bucket;

/// HTTP client for the Supabase Storage API.
///
/// Communicates with Storage REST endpoints at `/storage/v1/...` through the
/// project's shared transport, so it carries the same key and headers.
#[derive(Debug, Clone)]
pub struct StorageClient {
    transport: Transport,
}

impl StorageClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    // ─── Bucket Operations ───────────────────────────────────────

    /// List all buckets.
    pub async fn list_buckets(&self) -> SupabaseResult<Vec<Bucket>> {
        self.get_json(&["storage", "v1", "bucket"]).await
    }

    /// Get a bucket by ID.
    pub async fn get_bucket(&self, id: &str) -> SupabaseResult<Bucket> {
        let id = id.trim();
        if id.is_empty() {
            return Err(SupabaseError::invalid_input("bucket id cannot be empty"));
        }
        self.get_json(&["storage", "v1", "bucket", id]).await
    }

    // ─── Internal Helpers ────────────────────────────────────────

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> SupabaseResult<T> {
        let request = HttpRequest::new(HttpMethod::Get, segments.iter().copied());
        tracing::debug!(path = %request.path(), "Storage request");
        let response = self
            .transport
            .send(request)
            .await?
            .error_for_status()?;
        response.json()
    }
}
