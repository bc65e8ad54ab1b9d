// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Highlight configuration
//!
//! Normalizes a highlight field specification (comma string, list, or keyed
//! overrides) into the highlight block of a search request.
//!
//! Keyed per-field override maps are hoisted into the top level of the
//! highlight block rather than nesting under their field.
//!
//! # Example
//!
//! ```
//! use es_query::highlight::HighlightBuilder;
//! use serde_json::json;
//!
//! let mut highlight = HighlightBuilder::new();
//! highlight.set_with_default_tags("title,describe", None);
//!
//! assert_eq!(
//!     highlight.to_value(),
//!     json!({
//!         "pre_tags": ["<span style='color: red;'>"],
//!         "post_tags": ["</span>"],
//!         "fields": {"title": {}, "describe": {}},
//!     })
//! );
//! ```

use serde_json::{Map, Value};

/// Default fragment wrapper tags.
pub const DEFAULT_PRE_TAG: &str = "<span style='color: red;'>";
pub const DEFAULT_POST_TAG: &str = "</span>";

/// Accepted highlight field specifications.
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightFields {
    /// Comma-delimited field names.
    Spec(String),
    /// Field name list.
    List(Vec<String>),
    /// Field names with per-field override maps.
    Keyed(Vec<(String, Map<String, Value>)>),
}

impl From<&str> for HighlightFields {
    fn from(spec: &str) -> Self {
        Self::Spec(spec.to_string())
    }
}

impl From<String> for HighlightFields {
    fn from(spec: String) -> Self {
        Self::Spec(spec)
    }
}

impl From<Vec<String>> for HighlightFields {
    fn from(fields: Vec<String>) -> Self {
        Self::List(fields)
    }
}

impl From<Vec<&str>> for HighlightFields {
    fn from(fields: Vec<&str>) -> Self {
        Self::List(fields.into_iter().map(str::to_string).collect())
    }
}

/// Accumulates highlight configuration across calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightBuilder {
    doc: Map<String, Value>,
}

impl HighlightBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add highlight fields with the default wrapper tags.
    pub fn set_with_default_tags(
        &mut self,
        fields: impl Into<HighlightFields>,
        fragments: Option<i64>,
    ) {
        self.set(
            fields,
            vec![DEFAULT_PRE_TAG.to_string()],
            vec![DEFAULT_POST_TAG.to_string()],
            fragments,
        );
    }

    /// Add highlight fields, replacing the wrapper tags.
    ///
    /// With an empty field specification the call is a no-op; tags are only
    /// written when at least one field is supplied.
    pub fn set(
        &mut self,
        fields: impl Into<HighlightFields>,
        pre_tags: Vec<String>,
        post_tags: Vec<String>,
        fragments: Option<i64>,
    ) {
        let entries: Vec<(String, Option<Map<String, Value>>)> = match fields.into() {
            HighlightFields::Spec(spec) => {
                if spec.is_empty() {
                    Vec::new()
                } else {
                    spec.split(',')
                        .map(|name| (name.to_string(), None))
                        .collect()
                }
            }
            HighlightFields::List(names) => {
                names.into_iter().map(|name| (name, None)).collect()
            }
            HighlightFields::Keyed(pairs) => pairs
                .into_iter()
                .map(|(name, overrides)| (name, Some(overrides)))
                .collect(),
        };
        if entries.is_empty() {
            return;
        }

        self.doc.insert(
            "pre_tags".to_string(),
            Value::Array(pre_tags.into_iter().map(Value::from).collect()),
        );
        self.doc.insert(
            "post_tags".to_string(),
            Value::Array(post_tags.into_iter().map(Value::from).collect()),
        );

        for (name, overrides) in entries {
            let slot = self
                .doc
                .entry("fields".to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(field_map) = slot.as_object_mut() {
                field_map.insert(name, Value::Object(Map::new()));
            }
            // per-field overrides are hoisted into the top-level block
            if let Some(overrides) = overrides {
                for (key, value) in overrides {
                    self.doc.insert(key, value);
                }
            }
            if let Some(count) = fragments {
                self.doc
                    .insert("number_of_fragments".to_string(), Value::from(count));
            }
        }
    }

    /// Whether any highlight configuration was accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// The highlight block as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.doc.clone())
    }
}
