//! # es-query
//!
//! A fluent condition-and-request builder for Elasticsearch-style search
//! engines. Chained where/order/field/highlight calls are translated into
//! the nested document structure of the engine's query DSL; the finished
//! envelope is handed to a pluggable transport.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     EsHandler (fluent API)                  │
//! │  • identity, settings, pagination, projection, sort        │
//! │  • terminal ops: create_index / search / document CRUD     │
//! └─────────────────────────────────────────────────────────────┘
//!        │                │                 │             │
//!        ▼                ▼                 ▼             ▼
//! ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌─────────┐
//! │ Condition    │ │ Highlight    │ │ ColumnType   │ │ Param   │
//! │ Builder      │ │ Builder      │ │ Map          │ │ Tree    │
//! │ must /       │ │ tags +       │ │ alias groups │ │ dot-path│
//! │ must_not /   │ │ field        │ │ → field      │ │ nested  │
//! │ should       │ │ overrides    │ │ templates    │ │ assembly│
//! └──────────────┘ └──────────────┘ └──────────────┘ └─────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 EsClient (transport trait)                  │
//! │  • create/delete/search/get/update against the engine      │
//! │  • InMemoryClient double for tests                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use es_query::{EsConfig, EsHandler, InMemoryClient};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut handler = EsHandler::new(EsConfig::default(), Arc::new(InMemoryClient::new()));
//! handler.index("products").doc_type("doc");
//!
//! // Declare the index from a column-type map
//! let columns = json!({"id": "int", "title": "text", "price": "float"});
//! handler.create_index(columns.as_object().unwrap()).await.unwrap();
//!
//! // Accumulate conditions, then search
//! handler
//!     .where_op("title|describe", "like", "phone")
//!     .where_op("price", "between", "10,100")
//!     .order([("price", "asc")])
//!     .highlight("title")
//!     .page(1)
//!     .limit(10);
//!
//! let results = handler.search().await.unwrap();
//! # let _ = results;
//! # }
//! ```
//!
//! ## Condition state
//!
//! Condition, sort and highlight state persists on the handler across builds
//! so queries can be refined incrementally. Each logical request should own
//! a fresh handler or call [`EsHandler::clear_where`] first; a handler is
//! not meant to be shared between concurrent requests.
//!
//! ## Modules
//!
//! - [`handler`]: the fluent [`EsHandler`] orchestrating all components
//! - [`query`]: operator table, call shapes and the condition builder
//! - [`params`]: dot-path nested document assembly
//! - [`mapping`]: column-type to field-mapping translation
//! - [`highlight`]: highlight block configuration
//! - [`client`]: the transport trait, its error type and the in-memory double

pub mod client;
pub mod config;
pub mod handler;
pub mod highlight;
pub mod mapping;
pub mod params;
pub mod query;

pub use client::{EsClient, EsError, InMemoryClient};
pub use config::EsConfig;
pub use handler::{EsHandler, FieldProjection, SortInput};
pub use highlight::{HighlightBuilder, HighlightFields};
pub use mapping::ColumnTypeMap;
pub use params::ParamTree;
pub use query::{Bucket, Condition, ConditionAttrs, ConditionBuilder, ConditionSpec, Operator, WhereInput};
