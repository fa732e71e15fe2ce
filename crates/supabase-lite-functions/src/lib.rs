//! Supabase Edge Functions HTTP client.
//!
//! Invokes functions deployed at `/functions/v1/{function_name}`.

pub mod client;
pub mod types;

pub use client::FunctionsClient;
pub use types::*;

use supabase_lite_core::SupabaseClient;

/// Extension trait to create a [`FunctionsClient`] from a [`SupabaseClient`].
pub trait SupabaseClientFunctionsExt {
    /// Create a [`FunctionsClient`] sharing the client's transport.
    fn functions(&self) -> FunctionsClient;
}

impl SupabaseClientFunctionsExt for SupabaseClient {
    fn functions(&self) -> FunctionsClient {
        FunctionsClient::new(self.transport().clone())
    }
}
