//! Basic query builder usage.
//!
//! Run with: cargo run --example query_basics -p supabase-lite
//!
//! Uses `SUPABASE_URL` / `SUPABASE_KEY` when set, otherwise starts the mock backend.

use serde_json::json;
use supabase_lite::prelude::*;

async fn create_client() -> Result<SupabaseClient, Box<dyn std::error::Error>> {
    let url = match std::env::var("SUPABASE_URL") {
        Ok(url) => url,
        Err(_) => supabase_lite_mock::spawn().await?,
    };
    let key = std::env::var("SUPABASE_KEY").unwrap_or_else(|_| "local-anon-key".to_string());
    Ok(SupabaseClient::connect(&url, &key)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let client = create_client().await?;

    // ── SELECT all rows with a count ──
    println!("=== SELECT all countries ===");
    let resp = client
        .from("countries")
        .select("*", CountOption::Exact, false)
        .execute()
        .await?;
    for row in resp.rows() {
        println!("  {} ({})", row["name"], row["code"]);
    }
    println!("  total: {:?}", resp.count);

    // ── SELECT with filters ──
    println!("\n=== Cities with population > 1,000,000 ===");
    let resp = client
        .from("cities")
        .select("name, population", CountOption::None, false)
        .gt("population", 1_000_000_i64)
        .order("population", OrderDirection::Descending)
        .execute()
        .await?;
    for row in resp.rows() {
        println!("  {}: {}", row["name"], row["population"]);
    }

    // ── Paging ──
    println!("\n=== Cities 3-4 alphabetically ===");
    let resp = client
        .from("cities")
        .select("name", CountOption::Exact, false)
        .order("name", OrderDirection::Ascending)
        .range(2, 3)
        .execute()
        .await?;
    for row in resp.rows() {
        println!("  {}", row["name"]);
    }

    // ── Count only ──
    let resp = client
        .from("cities")
        .select("*", CountOption::None, true)
        .is("is_capital", IsValue::True)
        .execute()
        .await?;
    println!("\n=== Capitals: {:?} ===", resp.count);

    // ── RPC ──
    let sum = client
        .rpc("add_numbers", json!({"a": 20, "b": 22}))?
        .execute()
        .await?;
    println!("\n=== add_numbers(20, 22) = {sum} ===");

    match client.rpc("non_existent_function", json!(null))?.execute().await {
        Ok(v) => println!("unexpected success: {v}"),
        Err(e) => println!("missing function: {e}"),
    }

    Ok(())
}
