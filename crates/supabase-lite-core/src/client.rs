use std::sync::Arc;

use url::Url;

use crate::config::SupabaseConfig;
use crate::error::SupabaseResult;
use crate::transport::Transport;

/// The main client for a Supabase project.
///
/// Holds the validated configuration and the shared HTTP transport. Service
/// clients (query, storage, functions) are created on demand through the
/// extension traits of their crates.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    config: Arc<SupabaseConfig>,
    transport: Transport,
}

impl SupabaseClient {
    /// Create a new client, validating the configuration.
    pub fn new(config: SupabaseConfig) -> SupabaseResult<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    /// Shorthand for a client with default options.
    pub fn connect(supabase_url: &str, api_key: &str) -> SupabaseResult<Self> {
        Self::new(SupabaseConfig::new(supabase_url, api_key))
    }

    /// Get the transport (for passing to builders).
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Get the validated project URL.
    pub fn supabase_url(&self) -> &Url {
        self.transport.base_url()
    }

    /// Get the default schema.
    pub fn schema(&self) -> &str {
        &self.config.schema
    }

    /// Get the full config.
    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }
}
