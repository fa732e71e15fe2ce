//! Edge function invocation.
//!
//! Run with: cargo run --example functions -p supabase-lite

use serde::Deserialize;
use serde_json::json;
use supabase_lite::prelude::*;

#[derive(Debug, Deserialize)]
struct Greeting {
    message: String,
}

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
    let functions = SupabaseClient::connect(&url, &key)?.functions();

    // ── JSON in, JSON out ──
    let reply = functions
        .invoke_json("hello_world", json!({"name": "world"}))
        .await?;
    println!("hello_world -> {reply}");

    // ── Full options and a typed body ──
    let response = functions
        .invoke(
            "hello_world",
            InvokeOptions::new()
                .body(json!({"name": "Rust"}))
                .region("us-east-1")
                .header("x-request-id", "example-1"),
        )
        .await?;
    let greeting: Greeting = response.json()?;
    println!("status {} -> {}", response.status(), greeting.message);

    Ok(())
}
