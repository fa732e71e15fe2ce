//! The same scenarios against a real project.
//!
//! Skipped unless `SUPABASE_URL` and `SUPABASE_KEY` are set. The project is
//! expected to have a `countries` table, a `hello_world` edge function, and
//! no `non_existent_function` or `bucket-id`.
//!
//! Run with: SUPABASE_URL=... SUPABASE_KEY=... cargo test -p supabase-lite --test live

use serde_json::{json, Value};
use supabase_lite::prelude::*;

fn live_client() -> Option<SupabaseClient> {
    let url = std::env::var("SUPABASE_URL").ok()?;
    let key = std::env::var("SUPABASE_KEY").ok()?;
    Some(SupabaseClient::connect(&url, &key).expect("Failed to create client"))
}

macro_rules! live_client_or_skip {
    () => {
        match live_client() {
            Some(client) => client,
            None => {
                eprintln!("SUPABASE_URL / SUPABASE_KEY not set, skipping");
                return;
            }
        }
    };
}

#[tokio::test]
async fn live_from() {
    let client = live_client_or_skip!();
    match client
        .from("countries")
        .select("*", CountOption::Exact, false)
        .execute()
        .await
    {
        Ok(resp) => assert!(resp.count.unwrap_or_default() >= 0),
        // RLS or a missing table still has to come back as a status
        Err(e) => assert!(e.status().is_some(), "unexpected error: {e}"),
    }
}

#[tokio::test]
async fn live_rpc_missing_function() {
    let client = live_client_or_skip!();
    let err = client
        .rpc("non_existent_function", Value::Null)
        .unwrap()
        .execute()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn live_storage_missing_bucket() {
    let client = live_client_or_skip!();
    let err = client.storage().get_bucket("bucket-id").await.unwrap_err();
    assert!(matches!(err, SupabaseError::Remote(_)));
}

#[tokio::test]
async fn live_functions() {
    let client = live_client_or_skip!();
    let reply = client
        .functions()
        .invoke_json("hello_world", json!({"name": "world"}))
        .await
        .unwrap();
    assert!(reply.to_string().contains("world"));
}
