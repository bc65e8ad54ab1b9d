// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Condition surface
//!
//! Normalizes the overloaded where-call shapes into boolean clause buckets.
//!
//! # Architecture
//!
//! ```text
//! WhereInput (call shapes)
//!     ↓ single dispatch
//! ConditionBuilder
//!     ├─ must      → term / match / range / terms / multi_match
//!     ├─ must_not  → negated operators, one match per not-in value
//!     └─ should    → or-family matches
//!     ↓ after every call
//! {"bool": {"must": [...], "must_not": [...], "should": [...]}}
//! ```
//!
//! # Example
//!
//! ```
//! use es_query::query::{Condition, ConditionBuilder};
//! use serde_json::json;
//!
//! let mut conditions = ConditionBuilder::new();
//! conditions.apply(Condition::new("status", "=", "open"));
//! conditions.apply(Condition::new("age", "between", "18,65"));
//!
//! assert_eq!(
//!     conditions.where_doc().unwrap()["bool"]["must"],
//!     json!([
//!         {"term": {"status": {"value": "open"}}},
//!         {"range": {"age": {"gte": 18, "lte": 65}}},
//!     ])
//! );
//! ```

mod builder;
mod condition;
mod operator;

pub use builder::ConditionBuilder;
pub use condition::{Condition, ConditionAttrs, ConditionSpec, WhereInput};
pub use operator::{Bucket, Operator};
