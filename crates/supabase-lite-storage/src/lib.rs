//! Supabase Storage HTTP client.
//!
//! Bucket lookups against `/storage/v1/bucket`.
//!
//! ```no_run
//! # async fn demo(client: supabase_lite_core::SupabaseClient) -> supabase_lite_core::SupabaseResult<()> {
//! use supabase_lite_storage::SupabaseClientStorageExt;
//!
//! let storage = client.storage();
//! for bucket in storage.list_buckets().await? {
//!     println!("{} (public: {})", bucket.name, bucket.public);
//! }
//! let avatars = storage.get_bucket("avatars").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

pub use client::StorageClient;
pub use types::*;

use supabase_lite_core::SupabaseClient;

/// Extension trait to create a [`StorageClient`] from a [`SupabaseClient`].
pub trait SupabaseClientStorageExt {
    /// Create a [`StorageClient`] sharing the client's transport.
    fn storage(&self) -> StorageClient;
}

impl SupabaseClientStorageExt for SupabaseClient {
    fn storage(&self) -> StorageClient {
        StorageClient::new(self.transport().clone())
    }
}
