// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Request handler
//!
//! The fluent surface of the crate: identity and pagination setters,
//! where/order/field/highlight accumulation, and the terminal operations
//! that assemble a request envelope and hand it to the [`EsClient`].
//!
//! Accumulated condition, sort and highlight state persists across builds so
//! a query can be refined incrementally; a logical request should own a
//! fresh handler or call [`EsHandler::clear_where`] first.
//!
//! # Example
//!
//! ```
//! use es_query::{EsConfig, EsHandler, InMemoryClient};
//! use std::sync::Arc;
//!
//! let mut handler = EsHandler::new(EsConfig::default(), Arc::new(InMemoryClient::new()));
//! handler
//!     .index("products")
//!     .doc_type("doc")
//!     .limit(10)
//!     .where_op("title|describe", "like", "phone")
//!     .order([("price", "asc")])
//!     .highlight("title");
//!
//! let request = handler.build_search_request();
//! assert_eq!(request["size"], 10);
//! ```

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::client::{EsClient, EsError};
use crate::config::EsConfig;
use crate::highlight::{HighlightBuilder, HighlightFields};
use crate::mapping::ColumnTypeMap;
use crate::params::ParamTree;
use crate::query::{Condition, ConditionAttrs, ConditionBuilder, ConditionSpec, Operator, WhereInput};

/// Field projection input: a comma string or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldProjection {
    Spec(String),
    List(Vec<String>),
}

impl From<&str> for FieldProjection {
    fn from(spec: &str) -> Self {
        Self::Spec(spec.to_string())
    }
}

impl From<String> for FieldProjection {
    fn from(spec: String) -> Self {
        Self::Spec(spec)
    }
}

impl From<Vec<String>> for FieldProjection {
    fn from(fields: Vec<String>) -> Self {
        Self::List(fields)
    }
}

impl From<Vec<&str>> for FieldProjection {
    fn from(fields: Vec<&str>) -> Self {
        Self::List(fields.into_iter().map(str::to_string).collect())
    }
}

/// Sort input: `(field, direction)` pairs or raw `"field direction"` strings
/// (direction defaults to `asc`).
#[derive(Debug, Clone, PartialEq)]
pub enum SortInput {
    Keyed(Vec<(String, String)>),
    Raw(Vec<String>),
}

impl<const N: usize> From<[(&str, &str); N]> for SortInput {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::Keyed(
            pairs
                .into_iter()
                .map(|(field, dir)| (field.to_string(), dir.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<(String, String)>> for SortInput {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::Keyed(pairs)
    }
}

impl<const N: usize> From<[&str; N]> for SortInput {
    fn from(raw: [&str; N]) -> Self {
        Self::Raw(raw.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for SortInput {
    fn from(raw: Vec<String>) -> Self {
        Self::Raw(raw)
    }
}

/// Fluent request builder bound to one engine transport.
pub struct EsHandler {
    client: Arc<dyn EsClient>,
    index: String,
    doc_type: String,
    settings: Map<String, Value>,
    page: u64,
    limit: u64,
    skip: u64,
    fields: Vec<String>,
    sort: Map<String, Value>,
    conditions: ConditionBuilder,
    highlight: HighlightBuilder,
    column_types: ColumnTypeMap,
    params: ParamTree,
}

impl EsHandler {
    /// Create a handler over the given transport.
    #[must_use]
    pub fn new(config: EsConfig, client: Arc<dyn EsClient>) -> Self {
        let mut settings = Map::new();
        settings.insert(
            "number_of_shards".to_string(),
            Value::from(config.number_of_shards),
        );
        settings.insert(
            "number_of_replicas".to_string(),
            Value::from(config.number_of_replicas),
        );
        Self {
            client,
            index: String::new(),
            doc_type: String::new(),
            settings,
            page: 1,
            limit: config.limit,
            skip: 0,
            fields: Vec::new(),
            sort: Map::new(),
            conditions: ConditionBuilder::new(),
            highlight: HighlightBuilder::new(),
            column_types: ColumnTypeMap::new(),
            params: ParamTree::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Identity and pagination
    // ═══════════════════════════════════════════════════════════════════════

    pub fn index(&mut self, index: impl Into<String>) -> &mut Self {
        self.index = index.into();
        self
    }

    pub fn doc_type(&mut self, doc_type: impl Into<String>) -> &mut Self {
        self.doc_type = doc_type.into();
        self
    }

    /// Replace the index-creation settings block.
    pub fn settings(&mut self, settings: Map<String, Value>) -> &mut Self {
        self.settings = settings;
        self
    }

    pub fn page(&mut self, page: u64) -> &mut Self {
        self.page = page;
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = limit;
        self
    }

    /// Extra offset added on top of the page window.
    pub fn skip(&mut self, skip: u64) -> &mut Self {
        self.skip = skip;
        self
    }

    /// Replace the `_source` projection.
    pub fn fields(&mut self, fields: impl Into<FieldProjection>) -> &mut Self {
        self.fields = match fields.into() {
            FieldProjection::Spec(spec) => spec.split(',').map(str::to_string).collect(),
            FieldProjection::List(list) => list,
        };
        self
    }

    /// Accumulate sort entries; a repeated field keeps its position but takes
    /// the new direction.
    pub fn order(&mut self, input: impl Into<SortInput>) -> &mut Self {
        let pairs = match input.into() {
            SortInput::Keyed(pairs) => pairs,
            SortInput::Raw(entries) => entries
                .into_iter()
                .filter_map(|entry| {
                    let mut parts = entry.splitn(2, ' ');
                    let field = parts.next()?.to_string();
                    let dir = parts.next().unwrap_or("asc").to_string();
                    Some((field, dir))
                })
                .collect(),
        };
        for (field, dir) in pairs {
            self.sort.insert(field, json!({ "order": dir }));
        }
        self
    }

    /// Replace the column-type alias table used by index creation.
    pub fn column_types<A, I>(&mut self, groups: I) -> &mut Self
    where
        A: Into<String>,
        I: IntoIterator<Item = (A, Map<String, Value>)>,
    {
        self.column_types.set_groups(groups);
        self
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Conditions
    // ═══════════════════════════════════════════════════════════════════════

    /// Implicit `=` condition.
    pub fn where_eq(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.conditions.apply(Condition::eq(field, value));
        self
    }

    /// Single condition with operator (enum or spelling).
    pub fn where_op(
        &mut self,
        field: impl Into<String>,
        op: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.conditions.apply(Condition::new(field, op, value));
        self
    }

    /// Single condition with attached clause attributes.
    pub fn where_op_attrs(
        &mut self,
        field: impl Into<String>,
        op: impl Into<Operator>,
        value: impl Into<Value>,
        attrs: ConditionAttrs,
    ) -> &mut Self {
        self.conditions
            .apply(Condition::new(field, op, value).attrs(attrs));
        self
    }

    /// `field => value` pairs, each an implicit `=`.
    pub fn where_map<K, V, I>(&mut self, pairs: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.conditions.apply(WhereInput::keyed_values(pairs));
        self
    }

    /// One or more conditions stacked on a single field.
    pub fn where_many(
        &mut self,
        field: impl Into<String>,
        specs: Vec<ConditionSpec>,
    ) -> &mut Self {
        self.conditions
            .apply(WhereInput::keyed_conditions([(field.into(), specs)]));
        self
    }

    /// Independent full conditions.
    pub fn where_all(&mut self, conditions: Vec<Condition>) -> &mut Self {
        self.conditions.apply(conditions);
        self
    }

    /// Any pre-built where input.
    pub fn where_input(&mut self, input: impl Into<WhereInput>) -> &mut Self {
        self.conditions.apply(input);
        self
    }

    /// Drop all accumulated condition state.
    pub fn clear_where(&mut self) -> &mut Self {
        self.conditions.clear();
        self
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Highlight
    // ═══════════════════════════════════════════════════════════════════════

    /// Add highlight fields with the default wrapper tags.
    pub fn highlight(&mut self, fields: impl Into<HighlightFields>) -> &mut Self {
        self.highlight.set_with_default_tags(fields, None);
        self
    }

    /// Add highlight fields with explicit tags and fragment count.
    pub fn set_highlight(
        &mut self,
        fields: impl Into<HighlightFields>,
        pre_tags: Vec<String>,
        post_tags: Vec<String>,
        fragments: Option<i64>,
    ) -> &mut Self {
        self.highlight.set(fields, pre_tags, post_tags, fragments);
        self
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Request assembly
    // ═══════════════════════════════════════════════════════════════════════

    /// Assemble the search request envelope from the accumulated state.
    pub fn build_search_request(&mut self) -> Value {
        let from = self.page.saturating_sub(1) * self.limit + self.skip;
        self.params
            .set_replace("index", self.index.clone())
            .set_replace("type", self.doc_type.clone())
            .set_replace("size", self.limit)
            .set_replace("from", from)
            .set_replace("body", Value::Object(Map::new()));

        match self.conditions.where_doc() {
            Some(doc) => self.params.set("body.query", doc.clone()),
            None => self.params.set("body.query", json!({"match_all": {}})),
        };
        if !self.fields.is_empty() {
            self.params.set("body._source", self.fields.clone());
        }
        self.params
            .set("body.sort", Value::Object(self.sort.clone()));
        if !self.highlight.is_empty() {
            self.params.set("body.highlight", self.highlight.to_value());
        }

        Value::Object(self.params.pick(&["index", "type", "size", "from", "body"]))
    }

    /// Assemble the index-creation envelope for the given column declaration.
    pub fn build_create_index_request(&mut self, columns: &Map<String, Value>) -> Value {
        let properties = self.column_types.map_properties(columns);
        self.params
            .set_replace("index", self.index.clone())
            .set_replace("type", self.doc_type.clone())
            .set_replace("body", Value::Object(Map::new()))
            .set("body.settings", Value::Object(self.settings.clone()))
            .set("body.mappings._source", json!({"enabled": true}))
            .set("body.mappings.properties", Value::Object(properties));

        Value::Object(self.params.pick(&["index", "type", "body"]))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Terminal operations
    // ═══════════════════════════════════════════════════════════════════════

    /// Create the index declared by `columns`.
    ///
    /// A failed create falls back to an existence probe, so calling this on
    /// an already-created index reports `true` rather than an error.
    pub async fn create_index(&mut self, columns: &Map<String, Value>) -> Result<bool, EsError> {
        self.create_index_with(columns, |body| body).await
    }

    /// Like [`EsHandler::create_index`], applying `hook` to the assembled
    /// envelope just before dispatch.
    pub async fn create_index_with<F>(
        &mut self,
        columns: &Map<String, Value>,
        hook: F,
    ) -> Result<bool, EsError>
    where
        F: FnOnce(Value) -> Value,
    {
        let request = hook(self.build_create_index_request(columns));
        debug!(index = %self.index, "creating index");
        match self.client.create_index(&request).await {
            Ok(created) => {
                info!(index = %self.index, "index created");
                Ok(created)
            }
            Err(err) => {
                debug!(index = %self.index, error = %err, "create failed, probing for existing index");
                self.index_exists().await
            }
        }
    }

    pub async fn index_exists(&self) -> Result<bool, EsError> {
        self.client.index_exists(&self.index).await
    }

    /// Fetch the index's field mapping.
    pub async fn mapping(&self) -> Result<Value, EsError> {
        self.client.get_mapping(&self.index).await
    }

    pub async fn delete_index(&self) -> Result<bool, EsError> {
        info!(index = %self.index, "deleting index");
        self.client.delete_index(&self.index, &self.doc_type).await
    }

    /// Store a document, returning it on success.
    pub async fn add_doc(&self, doc: Value, id: Option<&str>) -> Result<Value, EsError> {
        debug!(index = %self.index, id = ?id, "indexing document");
        let acknowledged = self
            .client
            .index_document(&self.index, &self.doc_type, id, &doc)
            .await?;
        if acknowledged {
            Ok(doc)
        } else {
            Err(EsError::Backend("index write not acknowledged".into()))
        }
    }

    pub async fn delete_doc(&self, id: &str) -> Result<bool, EsError> {
        debug!(index = %self.index, id = %id, "deleting document");
        self.client
            .delete_document(&self.index, &self.doc_type, id)
            .await
    }

    pub async fn exists_doc(&self, id: &str) -> Result<bool, EsError> {
        self.client
            .document_exists(&self.index, &self.doc_type, id)
            .await
    }

    pub async fn get_doc(&self, id: &str) -> Result<Value, EsError> {
        self.client
            .get_document(&self.index, &self.doc_type, id)
            .await
    }

    /// Apply a partial update; the fields are nested under `doc` on the wire.
    pub async fn update_doc(&self, id: &str, partial: Value) -> Result<bool, EsError> {
        debug!(index = %self.index, id = %id, "updating document");
        let mut body = ParamTree::new();
        body.set("doc", partial);
        self.client
            .update_document(&self.index, &self.doc_type, id, &body.into_value())
            .await
    }

    /// Execute a search with the accumulated state.
    pub async fn search(&mut self) -> Result<Value, EsError> {
        self.search_with(|body| body).await
    }

    /// Like [`EsHandler::search`], applying `hook` to the assembled envelope
    /// just before dispatch.
    pub async fn search_with<F>(&mut self, hook: F) -> Result<Value, EsError>
    where
        F: FnOnce(Value) -> Value,
    {
        let request = hook(self.build_search_request());
        debug!(index = %self.index, "executing search");
        self.client.search(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryClient;

    fn handler() -> EsHandler {
        let mut handler = EsHandler::new(EsConfig::default(), Arc::new(InMemoryClient::new()));
        handler.index("test_index").doc_type("test_type");
        handler
    }

    #[test]
    fn test_pagination_window() {
        let mut handler = handler();
        handler.page(1).limit(10).skip(2);

        let request = handler.build_search_request();
        assert_eq!(request["from"], json!(2));
        assert_eq!(request["size"], json!(10));
    }

    #[test]
    fn test_later_pages_multiply_out() {
        let mut handler = handler();
        handler.page(3).limit(20);

        assert_eq!(handler.build_search_request()["from"], json!(40));
    }

    #[test]
    fn test_page_zero_does_not_underflow() {
        let mut handler = handler();
        handler.page(0).limit(10);

        assert_eq!(handler.build_search_request()["from"], json!(0));
    }

    #[test]
    fn test_query_defaults_to_match_all() {
        let mut handler = handler();
        assert_eq!(
            handler.build_search_request()["body"]["query"],
            json!({"match_all": {}})
        );
    }

    #[test]
    fn test_where_replaces_match_all() {
        let mut handler = handler();
        handler.where_eq("id", 3);

        let request = handler.build_search_request();
        assert_eq!(
            request["body"]["query"]["bool"]["must"],
            json!([{"term": {"id": {"value": 3}}}])
        );
    }

    #[test]
    fn test_dropped_clause_still_counts_as_a_where_call() {
        let mut handler = handler();
        handler.where_op("id", "between", json!([1]));

        let request = handler.build_search_request();
        // not match_all: the call materialized an all-empty bool document
        assert_eq!(
            request["body"]["query"],
            json!({"bool": {"must": [], "must_not": [], "should": []}})
        );
    }

    #[test]
    fn test_clear_where_restores_match_all() {
        let mut handler = handler();
        handler.where_eq("id", 3).clear_where();

        assert_eq!(
            handler.build_search_request()["body"]["query"],
            json!({"match_all": {}})
        );
    }

    #[test]
    fn test_source_projection_from_comma_string() {
        let mut handler = handler();
        handler.fields("id,title");

        assert_eq!(
            handler.build_search_request()["body"]["_source"],
            json!(["id", "title"])
        );
    }

    #[test]
    fn test_source_absent_without_projection() {
        let mut handler = handler();
        assert!(handler.build_search_request()["body"].get("_source").is_none());
    }

    #[test]
    fn test_sort_is_always_present() {
        let mut handler = handler();
        assert_eq!(handler.build_search_request()["body"]["sort"], json!({}));
    }

    #[test]
    fn test_keyed_and_raw_sort_inputs() {
        let mut handler = handler();
        handler.order([("price", "desc")]).order(["create_time asc", "id"]);

        assert_eq!(
            handler.build_search_request()["body"]["sort"],
            json!({
                "price": {"order": "desc"},
                "create_time": {"order": "asc"},
                "id": {"order": "asc"},
            })
        );
    }

    #[test]
    fn test_repeated_sort_field_keeps_position_takes_direction() {
        let mut handler = handler();
        handler.order([("price", "asc"), ("id", "asc")]);
        handler.order([("price", "desc")]);

        let sort = handler.build_search_request()["body"]["sort"].clone();
        let keys: Vec<String> = sort.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["price", "id"]);
        assert_eq!(sort["price"], json!({"order": "desc"}));
    }

    #[test]
    fn test_highlight_included_when_configured() {
        let mut handler = handler();
        handler.highlight("title");

        let request = handler.build_search_request();
        assert_eq!(
            request["body"]["highlight"]["fields"],
            json!({"title": {}})
        );
    }

    #[test]
    fn test_search_envelope_serializes_exactly() {
        let mut handler = handler();
        handler
            .page(1)
            .limit(10)
            .skip(2)
            .where_op("age", "between", "18,65")
            .order([("id", "desc")]);

        let rendered = serde_json::to_string(&handler.build_search_request()).unwrap();
        assert_eq!(
            rendered,
            concat!(
                r#"{"index":"test_index","type":"test_type","size":10,"from":2,"#,
                r#""body":{"query":{"bool":{"must":[{"range":{"age":{"gte":18,"lte":65}}}],"#,
                r#""must_not":[],"should":[]}},"sort":{"id":{"order":"desc"}}}}"#
            )
        );
    }

    #[test]
    fn test_create_index_envelope() {
        let mut handler = handler();
        let columns = json!({"id": "int", "content": "text"});

        let request = handler.build_create_index_request(columns.as_object().unwrap());
        assert_eq!(
            request,
            json!({
                "index": "test_index",
                "type": "test_type",
                "body": {
                    "settings": {"number_of_shards": 1, "number_of_replicas": 1},
                    "mappings": {
                        "_source": {"enabled": true},
                        "properties": {
                            "id": {"type": "integer"},
                            "content": {
                                "type": "text",
                                "analyzer": "ik_max_word",
                                "search_analyzer": "ik_smart",
                            },
                        },
                    },
                },
            })
        );
    }

    #[test]
    fn test_settings_replacement_flows_into_create_request() {
        let mut handler = handler();
        handler.settings(
            json!({"number_of_shards": 5, "number_of_replicas": 0})
                .as_object()
                .unwrap()
                .clone(),
        );

        let columns = json!({"id": "int"});
        let request = handler.build_create_index_request(columns.as_object().unwrap());
        assert_eq!(
            request["body"]["settings"],
            json!({"number_of_shards": 5, "number_of_replicas": 0})
        );
    }

    #[test]
    fn test_state_persists_across_builds() {
        let mut handler = handler();
        handler.where_eq("status", "open");

        let first = handler.build_search_request();
        let second = handler.build_search_request();
        assert_eq!(first, second);

        handler.where_op("age", "gt", 18);
        let third = handler.build_search_request();
        assert_eq!(
            third["body"]["query"]["bool"]["must"].as_array().unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_search_dispatches_built_envelope() {
        let client = Arc::new(InMemoryClient::new());
        let mut handler = EsHandler::new(EsConfig::default(), client.clone());
        handler
            .index("test_index")
            .doc_type("test_type")
            .limit(5)
            .where_op("title", "like", "phone");

        handler.search().await.unwrap();

        let sent = client.last_search_request().unwrap();
        assert_eq!(sent["size"], json!(5));
        assert_eq!(
            sent["body"]["query"]["bool"]["must"],
            json!([{"match": {"title": {"query": "phone"}}}])
        );
    }

    #[tokio::test]
    async fn test_search_hook_mutates_envelope_before_dispatch() {
        let client = Arc::new(InMemoryClient::new());
        let mut handler = EsHandler::new(EsConfig::default(), client.clone());
        handler.index("test_index").doc_type("test_type");

        handler
            .search_with(|mut body| {
                body["size"] = json!(999);
                body
            })
            .await
            .unwrap();

        assert_eq!(client.last_search_request().unwrap()["size"], json!(999));
    }

    #[tokio::test]
    async fn test_create_index_falls_back_to_existence_probe() {
        let client = Arc::new(InMemoryClient::new());
        let mut handler = EsHandler::new(EsConfig::default(), client.clone());
        handler.index("test_index").doc_type("test_type");

        let columns = json!({"id": "int"});
        let columns = columns.as_object().unwrap();
        assert!(handler.create_index(columns).await.unwrap());
        // second create fails on the transport but probes to true
        assert!(handler.create_index(columns).await.unwrap());
    }

    #[tokio::test]
    async fn test_document_round_trip() {
        let client = Arc::new(InMemoryClient::new());
        let mut handler = EsHandler::new(EsConfig::default(), client.clone());
        handler.index("test_index").doc_type("test_type");

        let saved = handler
            .add_doc(json!({"title": "phone", "price": 10}), Some("1"))
            .await
            .unwrap();
        assert_eq!(saved, json!({"title": "phone", "price": 10}));

        assert!(handler.exists_doc("1").await.unwrap());
        handler.update_doc("1", json!({"price": 12})).await.unwrap();
        assert_eq!(
            handler.get_doc("1").await.unwrap()["_source"],
            json!({"title": "phone", "price": 12})
        );
        assert!(handler.delete_doc("1").await.unwrap());
        assert!(!handler.exists_doc("1").await.unwrap());
    }
}
