//! PostgREST query builder and RPC caller for supabase-lite.
//!
//! ```no_run
//! # async fn demo(client: supabase_lite_core::SupabaseClient) -> supabase_lite_core::SupabaseResult<()> {
//! use supabase_lite_query::{CountOption, Filterable, Modifiable, OrderDirection, SupabaseClientQueryExt};
//!
//! let cities = client
//!     .from("cities")
//!     .select("name, population", CountOption::Exact, false)
//!     .eq("country_id", 1)
//!     .order("population", OrderDirection::Descending)
//!     .execute()
//!     .await?;
//! println!("{} of {:?}", cities.len(), cities.count);
//! # Ok(())
//! # }
//! ```

pub mod builder;
mod execute;
pub mod filter;
pub mod modifier;
pub mod postgrest;
pub mod rpc;
pub mod select;
pub mod state;
pub mod value;

pub use builder::QueryBuilder;
pub use filter::Filterable;
pub use modifier::Modifiable;
pub use rpc::RpcBuilder;
pub use select::SelectBuilder;
pub use state::*;
pub use value::{FilterValue, IntoFilterValue};

use serde_json::Value as JsonValue;
use supabase_lite_core::{SupabaseClient, SupabaseError};

/// Extension trait adding query builder methods to SupabaseClient.
pub trait SupabaseClientQueryExt {
    /// Start a query on a table.
    fn from(&self, table: &str) -> QueryBuilder;

    /// Call a stored procedure/function. `args` must be a JSON object or null.
    fn rpc(&self, function: &str, args: JsonValue) -> Result<RpcBuilder, SupabaseError>;
}

impl SupabaseClientQueryExt for SupabaseClient {
    fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder::new(
            self.transport().clone(),
            self.schema().to_string(),
            table.to_string(),
        )
    }

    fn rpc(&self, function: &str, args: JsonValue) -> Result<RpcBuilder, SupabaseError> {
        RpcBuilder::new(
            self.transport().clone(),
            self.schema().to_string(),
            function.to_string(),
            args,
        )
    }
}
