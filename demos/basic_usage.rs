// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic es-query usage example.
//!
//! Demonstrates:
//! 1. Declaring an index from a column-type map
//! 2. Adding a few documents
//! 3. Accumulating conditions, sort and highlight
//! 4. Inspecting the exact request envelope
//! 5. Running the search
//!
//! The example runs against the in-memory transport double, so no engine is
//! required.
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use std::sync::Arc;

use serde_json::json;

use es_query::{EsConfig, EsHandler, InMemoryClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simple logging (no filter for simplicity)
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let mut handler = EsHandler::new(EsConfig::default(), Arc::new(InMemoryClient::new()));
    handler.index("products").doc_type("doc");

    // ─────────────────────────────────────────────────────────────────────
    // 1. Declare the index from a column-type map
    // ─────────────────────────────────────────────────────────────────────
    println!("📦 Creating index...");
    let columns = json!({
        "id": "int",
        "title": "text",
        "describe": "text",
        "price": "float",
    });
    handler.create_index(columns.as_object().unwrap()).await?;

    // ─────────────────────────────────────────────────────────────────────
    // 2. Add documents
    // ─────────────────────────────────────────────────────────────────────
    println!("📝 Indexing documents...");
    for (id, title, price) in [
        (1, "smart phone", 499.0),
        (2, "phone case", 9.5),
        (3, "laptop", 1299.0),
    ] {
        handler
            .add_doc(
                json!({"id": id, "title": title, "price": price}),
                Some(&id.to_string()),
            )
            .await?;
    }

    // ─────────────────────────────────────────────────────────────────────
    // 3. Build up a query
    // ─────────────────────────────────────────────────────────────────────
    println!("🔍 Building query...");
    handler
        .where_op("title|describe", "like", "phone")
        .where_op("price", "between", "5,600")
        .where_op("id", "not in", "3")
        .order([("price", "asc")])
        .highlight("title")
        .page(1)
        .limit(10);

    // ─────────────────────────────────────────────────────────────────────
    // 4. Inspect the envelope the engine would receive
    // ─────────────────────────────────────────────────────────────────────
    let envelope = handler.build_search_request();
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    // ─────────────────────────────────────────────────────────────────────
    // 5. Run the search
    // ─────────────────────────────────────────────────────────────────────
    let results = handler.search().await?;
    let hits = results["hits"]["hits"].as_array().map(Vec::len).unwrap_or(0);
    println!("✅ {hits} hit(s)");

    Ok(())
}
