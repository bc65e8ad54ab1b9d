// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Column type mapping
//!
//! Translates a column-type declaration map (the kind of table description a
//! relational schema gives you) into the per-field mapping definitions an
//! index-creation request wants.
//!
//! Source types are matched against pipe-delimited alias groups; the first
//! group containing the alias supplies the field template. A detailed column
//! spec replaces the template's non-type fields outright.
//!
//! # Example
//!
//! ```
//! use es_query::mapping::ColumnTypeMap;
//! use serde_json::json;
//!
//! let types = ColumnTypeMap::new();
//! let columns = json!({"id": "int", "content": "text"});
//! let properties = types.map_properties(columns.as_object().unwrap());
//!
//! assert_eq!(properties["id"], json!({"type": "integer"}));
//! assert_eq!(
//!     properties["content"],
//!     json!({"type": "text", "analyzer": "ik_max_word", "search_analyzer": "ik_smart"})
//! );
//! ```

use serde_json::{Map, Value};
use tracing::debug;

/// Alias-group table mapping source column types to field templates.
#[derive(Debug, Clone)]
pub struct ColumnTypeMap {
    /// Pipe-delimited alias set → field template, in match priority order.
    groups: Vec<(String, Map<String, Value>)>,
}

impl Default for ColumnTypeMap {
    fn default() -> Self {
        fn template(pairs: &[(&str, &str)]) -> Map<String, Value> {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), Value::from(*v)))
                .collect()
        }

        Self {
            groups: vec![
                (
                    "varchar|text|char|longtext|tinytext".to_string(),
                    template(&[
                        ("type", "text"),
                        ("analyzer", "ik_max_word"),
                        ("search_analyzer", "ik_smart"),
                    ]),
                ),
                (
                    "int|tinyint|bigint|integer".to_string(),
                    template(&[("type", "integer")]),
                ),
                (
                    "decimal|double|float".to_string(),
                    template(&[("type", "float")]),
                ),
            ],
        }
    }
}

impl ColumnTypeMap {
    /// The default alias table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole alias table.
    pub fn set_groups<A, I>(&mut self, groups: I)
    where
        A: Into<String>,
        I: IntoIterator<Item = (A, Map<String, Value>)>,
    {
        self.groups = groups
            .into_iter()
            .map(|(aliases, template)| (aliases.into(), template))
            .collect();
    }

    /// Translate a column declaration map into field-mapping properties.
    ///
    /// Column specs are either a bare alias string or a detailed object
    /// `{"type": alias, ...overrides}`. Columns whose alias matches no group
    /// are omitted from the output.
    #[must_use]
    pub fn map_properties(&self, columns: &Map<String, Value>) -> Map<String, Value> {
        let mut properties = Map::new();
        for (column, spec) in columns {
            match self.map_column(spec) {
                Some(definition) => {
                    properties.insert(column.clone(), Value::Object(definition));
                }
                None => debug!(column = %column, "no alias group matches column type, skipped"),
            }
        }
        properties
    }

    fn map_column(&self, spec: &Value) -> Option<Map<String, Value>> {
        match spec {
            Value::String(alias) => self.template_for(alias).cloned(),
            Value::Object(detail) => {
                let alias = detail
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("text")
                    .to_string();
                let template = self.template_for(&alias)?;

                let overrides: Map<String, Value> = detail
                    .iter()
                    .filter(|(key, _)| key.as_str() != "type")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                if overrides.is_empty() {
                    return Some(template.clone());
                }

                // overrides replace the template outright; only the type key
                // survives, taken from the declared alias
                let mut definition = Map::new();
                definition.insert("type".to_string(), Value::from(alias));
                for (key, value) in overrides {
                    definition.insert(key, value);
                }
                Some(definition)
            }
            _ => None,
        }
    }

    fn template_for(&self, alias: &str) -> Option<&Map<String, Value>> {
        self.groups
            .iter()
            .find(|(aliases, _)| aliases.split('|').any(|candidate| candidate == alias))
            .map(|(_, template)| template)
    }
}
