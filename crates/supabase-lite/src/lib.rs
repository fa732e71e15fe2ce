//! A thin client for a Supabase project.
//!
//! One [`SupabaseClient`] holds the project URL, the API key and a shared HTTP
//! transport. The service clients hang off it through extension traits:
//!
//! - `client.from(table)` and `client.rpc(function, args)` for PostgREST
//! - `client.storage()` for buckets
//! - `client.functions()` for edge functions
//!
//! ```no_run
//! use supabase_lite::prelude::*;
//! use serde_json::json;
//!
//! # async fn demo() -> SupabaseResult<()> {
//! let client = SupabaseClient::connect("https://your-project.supabase.co", "your-anon-key")?;
//!
//! let countries = client
//!     .from("countries")
//!     .select("*", CountOption::Exact, false)
//!     .execute()
//!     .await?;
//! println!("{} countries", countries.count.unwrap_or_default());
//!
//! let greeting = client.rpc("hello_world", json!(null))?.execute().await?;
//! let bucket = client.storage().get_bucket("avatars").await?;
//! let reply = client
//!     .functions()
//!     .invoke_json("hello_world", json!({"name": "world"}))
//!     .await?;
//! # Ok(())
//! # }
//! ```

// Re-export core (always available)
pub use supabase_lite_core::*;

// Re-export query builder (feature-gated)
#[cfg(feature = "query")]
pub use supabase_lite_query::*;

#[cfg(feature = "storage")]
pub use supabase_lite_storage;

#[cfg(feature = "functions")]
pub use supabase_lite_functions;

/// Prelude module for convenient imports.
///
/// ```
/// use supabase_lite::prelude::*;
/// ```
pub mod prelude {
    pub use supabase_lite_core::{
        ApiError, HttpMethod, QueryResponse, SupabaseClient, SupabaseConfig, SupabaseError,
        SupabaseResult,
    };

    #[cfg(feature = "query")]
    pub use supabase_lite_query::{
        CountOption, Filterable, IsValue, Modifiable, NullsPosition, OrderDirection,
        SupabaseClientQueryExt, TextSearchType,
    };

    #[cfg(feature = "storage")]
    pub use supabase_lite_storage::{Bucket, StorageClient, SupabaseClientStorageExt};

    #[cfg(feature = "functions")]
    pub use supabase_lite_functions::{
        FunctionResponse, FunctionsClient, InvokeOptions, SupabaseClientFunctionsExt,
    };
}
