// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Condition builder
//!
//! Folds [`WhereInput`]s into the three clause buckets of a boolean query
//! (`must`, `must_not`, `should`) and keeps the materialized
//! `{"bool": ...}` document cached after every call.
//!
//! Bucket state persists across calls until [`ConditionBuilder::clear`], so
//! successive where-calls refine one running query.

use serde_json::{Map, Value};
use tracing::debug;

use crate::params::ParamTree;

use super::condition::{bounds, value_list, Condition, ConditionAttrs, WhereInput};
use super::operator::Operator;

/// Accumulates conditions into clause buckets and materializes the boolean
/// query document.
#[derive(Debug, Clone, Default)]
pub struct ConditionBuilder {
    must: Vec<Value>,
    must_not: Vec<Value>,
    should: Vec<Value>,
    /// Cached `{"bool": ...}` document; `None` until the first apply.
    where_doc: Option<Value>,
}

impl ConditionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a where-input into the buckets and refresh the cached document.
    pub fn apply(&mut self, input: impl Into<WhereInput>) {
        for cond in input.into().into_conditions() {
            self.push(cond);
        }
        self.rebuild();
    }

    /// The materialized boolean query, if any where-call happened.
    #[must_use]
    pub fn where_doc(&self) -> Option<&Value> {
        self.where_doc.as_ref()
    }

    /// Drop all buckets and the cached document.
    pub fn clear(&mut self) {
        self.must.clear();
        self.must_not.clear();
        self.should.clear();
        self.where_doc = None;
    }

    /// Whether every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty() && self.should.is_empty()
    }

    #[must_use]
    pub fn must(&self) -> &[Value] {
        &self.must
    }

    #[must_use]
    pub fn must_not(&self) -> &[Value] {
        &self.must_not
    }

    #[must_use]
    pub fn should(&self) -> &[Value] {
        &self.should
    }

    fn push(&mut self, cond: Condition) {
        let Condition {
            field,
            op,
            value,
            attrs,
        } = cond;
        match op {
            Operator::Eq => {
                let clause = text_clause("term", "value", &field, value, &attrs);
                self.must.push(clause);
            }
            Operator::Like => {
                let clause = text_clause("match", "query", &field, value, &attrs);
                self.must.push(clause);
            }
            Operator::NotLike => {
                let clause = text_clause("match", "query", &field, value, &attrs);
                self.must_not.push(clause);
            }
            Operator::Or => {
                let clause = text_clause("match", "query", &field, value, &attrs);
                self.should.push(clause);
            }
            Operator::Gt => self.must.push(range_clause(&field, "gt", value, &attrs)),
            Operator::Lt => self.must.push(range_clause(&field, "lt", value, &attrs)),
            Operator::Gte => self.must.push(range_clause(&field, "gte", value, &attrs)),
            Operator::Lte => self.must.push(range_clause(&field, "lte", value, &attrs)),
            Operator::NotGt => self.must_not.push(range_clause(&field, "gt", value, &attrs)),
            Operator::NotLt => self.must_not.push(range_clause(&field, "lt", value, &attrs)),
            Operator::NotGte => self
                .must_not
                .push(range_clause(&field, "gte", value, &attrs)),
            Operator::NotLte => self
                .must_not
                .push(range_clause(&field, "lte", value, &attrs)),
            Operator::Between => match bounds(value) {
                Some((lo, hi)) => self.must.push(between_clause(&field, lo, hi, &attrs)),
                None => debug!(field = %field, "between needs exactly two bounds, clause dropped"),
            },
            Operator::NotBetween => match bounds(value) {
                // the emitted range is keyed under the fixed "id" field
                Some((lo, hi)) => self.must_not.push(between_clause("id", lo, hi, &attrs)),
                None => {
                    debug!(field = %field, "not-between needs exactly two bounds, clause dropped");
                }
            },
            Operator::In => {
                let values = value_list(value);
                self.must.push(terms_clause(&field, values, &attrs));
            }
            Operator::NotIn => {
                for item in value_list(value) {
                    self.must_not
                        .push(keyed_clause("match", &field, "query", item, &attrs));
                }
            }
        }
    }

    fn rebuild(&mut self) {
        let mut tree = ParamTree::new();
        tree.set("bool.must", Value::Array(self.must.clone()))
            .set("bool.must_not", Value::Array(self.must_not.clone()))
            .set("bool.should", Value::Array(self.should.clone()));
        self.where_doc = Some(tree.into_value());
    }
}

/// `term`/`match`-family clause; fields joined with `|` force a multi_match.
fn text_clause(
    kind: &str,
    value_key: &str,
    field: &str,
    value: Value,
    attrs: &ConditionAttrs,
) -> Value {
    let targets: Vec<&str> = field.split('|').collect();
    if targets.len() > 1 {
        multi_match_clause(&targets, value, attrs)
    } else {
        keyed_clause(kind, field, value_key, value, attrs)
    }
}

/// `{kind: {field: {value_key: value, ...attrs}}}`
fn keyed_clause(
    kind: &str,
    field: &str,
    value_key: &str,
    value: Value,
    attrs: &ConditionAttrs,
) -> Value {
    let mut body = Map::new();
    body.insert(value_key.to_string(), value);
    attrs.merge_into(&mut body);

    let mut inner = Map::new();
    inner.insert(field.to_string(), Value::Object(body));

    let mut clause = Map::new();
    clause.insert(kind.to_string(), Value::Object(inner));
    Value::Object(clause)
}

/// `{"range": {field: {bound_key: value, ...attrs}}}`
fn range_clause(field: &str, bound_key: &str, value: Value, attrs: &ConditionAttrs) -> Value {
    keyed_clause("range", field, bound_key, value, attrs)
}

/// `{"range": {field: {"gte": lo, "lte": hi, ...attrs}}}`
fn between_clause(field: &str, lo: Value, hi: Value, attrs: &ConditionAttrs) -> Value {
    let mut body = Map::new();
    body.insert("gte".to_string(), lo);
    body.insert("lte".to_string(), hi);
    attrs.merge_into(&mut body);

    let mut inner = Map::new();
    inner.insert(field.to_string(), Value::Object(body));

    let mut clause = Map::new();
    clause.insert("range".to_string(), Value::Object(inner));
    Value::Object(clause)
}

/// `{"multi_match": {"query": value, "fields": [...], ...attrs}}`
fn multi_match_clause(targets: &[&str], value: Value, attrs: &ConditionAttrs) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), value);
    body.insert(
        "fields".to_string(),
        Value::Array(targets.iter().map(|f| Value::from(*f)).collect()),
    );
    attrs.merge_into(&mut body);

    let mut clause = Map::new();
    clause.insert("multi_match".to_string(), Value::Object(body));
    Value::Object(clause)
}

/// `{"terms": {field: [values], ...attrs}}`; attributes sit beside the
/// field key inside the terms object.
fn terms_clause(field: &str, values: Vec<Value>, attrs: &ConditionAttrs) -> Value {
    let mut inner = Map::new();
    inner.insert(field.to_string(), Value::Array(values));
    attrs.merge_into(&mut inner);

    let mut clause = Map::new();
    clause.insert("terms".to_string(), Value::Object(inner));
    Value::Object(clause)
}
