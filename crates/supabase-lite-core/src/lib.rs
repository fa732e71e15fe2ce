//! Core pieces shared by the supabase-lite service crates: configuration,
//! the HTTP transport, the error taxonomy and the query response type.

pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod transport;

pub use client::SupabaseClient;
pub use config::SupabaseConfig;
pub use error::{ApiError, SupabaseError, SupabaseResult};
pub use response::QueryResponse;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
