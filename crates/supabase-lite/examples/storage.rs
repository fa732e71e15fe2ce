//! Bucket lookups.
//!
//! Run with: cargo run --example storage -p supabase-lite

use supabase_lite::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let url = match std::env::var("SUPABASE_URL") {
        Ok(url) => url,
        Err(_) => supabase_lite_mock::spawn().await?,
    };
    let key = std::env::var("SUPABASE_KEY").unwrap_or_else(|_| "local-anon-key".to_string());
    let storage = SupabaseClient::connect(&url, &key)?.storage();

    println!("=== Buckets ===");
    for bucket in storage.list_buckets().await? {
        println!(
            "  {} public={} limit={:?} types={:?}",
            bucket.id, bucket.public, bucket.file_size_limit, bucket.allowed_mime_types
        );
    }

    match storage.get_bucket("bucket-id").await {
        Ok(bucket) => println!("found {}", bucket.name),
        Err(e) if e.is_not_found() => println!("bucket-id does not exist"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
