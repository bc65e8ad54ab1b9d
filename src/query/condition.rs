// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Condition inputs
//!
//! The where-surface accepts several call shapes. Each shape is a variant of
//! [`WhereInput`], resolved by a single dispatch in the condition builder
//! instead of runtime type inspection.
//!
//! # Example
//!
//! ```
//! use es_query::query::{Condition, ConditionAttrs, ConditionSpec, WhereInput};
//!
//! // single condition with an attribute
//! let cond = Condition::new("title", "like", "phone")
//!     .attrs(ConditionAttrs::new().set("boost", 2));
//!
//! // several conditions stacked on one field
//! let stacked = WhereInput::keyed_conditions([(
//!     "price",
//!     vec![ConditionSpec::new("gte", 10), ConditionSpec::new("lt", 100)],
//! )]);
//! # let _ = (cond, stacked);
//! ```

use serde_json::{Map, Value};

use super::operator::Operator;

/// Extra key/value pairs merged into an emitted clause body.
///
/// Replaces an attribute-callback mechanism: callers attach engine-specific
/// tuning (boost, analyzer, ...) without widening the operator table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionAttrs {
    entries: Map<String, Value>,
}

impl ConditionAttrs {
    /// Create an empty attribute bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, returning the bag for chaining.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Whether no attributes were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn merge_into(&self, target: &mut Map<String, Value>) {
        for (key, value) in &self.entries {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// One fully-specified condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: Value,
    pub attrs: ConditionAttrs,
}

impl Condition {
    /// Build a condition from field, operator (enum or spelling) and value.
    pub fn new(field: impl Into<String>, op: impl Into<Operator>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value: value.into(),
            attrs: ConditionAttrs::new(),
        }
    }

    /// Build an implicit `=` condition.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    /// Attach an attribute bag.
    #[must_use]
    pub fn attrs(mut self, attrs: ConditionAttrs) -> Self {
        self.attrs = attrs;
        self
    }
}

/// A condition without its field, used when stacking several conditions on
/// one field.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSpec {
    pub op: Operator,
    pub value: Value,
    pub attrs: ConditionAttrs,
}

impl ConditionSpec {
    pub fn new(op: impl Into<Operator>, value: impl Into<Value>) -> Self {
        Self {
            op: op.into(),
            value: value.into(),
            attrs: ConditionAttrs::new(),
        }
    }

    #[must_use]
    pub fn attrs(mut self, attrs: ConditionAttrs) -> Self {
        self.attrs = attrs;
        self
    }
}

/// The closed set of where-call shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereInput {
    /// A single full condition.
    Condition(Condition),
    /// `field => value` pairs, each an implicit `=`.
    KeyedValues(Vec<(String, Value)>),
    /// `field => [spec, ...]` pairs; every spec becomes one condition on the
    /// field, combined through the running buckets.
    KeyedConditions(Vec<(String, Vec<ConditionSpec>)>),
    /// Independent full conditions.
    Conditions(Vec<Condition>),
}

impl WhereInput {
    pub fn keyed_values<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::KeyedValues(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn keyed_conditions<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Vec<ConditionSpec>)>,
    {
        Self::KeyedConditions(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Flatten the input into individual conditions, in call order.
    pub(crate) fn into_conditions(self) -> Vec<Condition> {
        match self {
            Self::Condition(cond) => vec![cond],
            Self::KeyedValues(pairs) => pairs
                .into_iter()
                .map(|(field, value)| Condition::eq(field, value))
                .collect(),
            Self::KeyedConditions(pairs) => pairs
                .into_iter()
                .flat_map(|(field, specs)| {
                    specs.into_iter().map(move |spec| Condition {
                        field: field.clone(),
                        op: spec.op,
                        value: spec.value,
                        attrs: spec.attrs,
                    })
                })
                .collect(),
            Self::Conditions(conds) => conds,
        }
    }
}

impl From<Condition> for WhereInput {
    fn from(cond: Condition) -> Self {
        Self::Condition(cond)
    }
}

impl From<Vec<Condition>> for WhereInput {
    fn from(conds: Vec<Condition>) -> Self {
        Self::Conditions(conds)
    }
}

/// Normalize a condition value into a list: arrays pass through, strings are
/// comma-split, anything else becomes a one-element list.
pub(crate) fn value_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::String(text) => split_commas(&text),
        other => vec![other],
    }
}

/// Normalize a condition value into exactly two bounds, or nothing.
pub(crate) fn bounds(value: Value) -> Option<(Value, Value)> {
    let mut list = value_list(value);
    if list.len() == 2 {
        let hi = list.pop()?;
        let lo = list.pop()?;
        Some((lo, hi))
    } else {
        None
    }
}

/// Comma-split with numeric coercion, so `"1,5"` and `[1, 5]` normalize to
/// the same list.
fn split_commas(text: &str) -> Vec<Value> {
    text.split(',').map(coerce_piece).collect()
}

fn coerce_piece(piece: &str) -> Value {
    if let Ok(int) = piece.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = piece.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }
    Value::String(piece.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_list_passes_arrays_through() {
        assert_eq!(value_list(json!([1, 2, 3])), vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_value_list_splits_strings_with_numeric_coercion() {
        assert_eq!(value_list(json!("5,6")), vec![json!(5), json!(6)]);
        assert_eq!(
            value_list(json!("a,1.5,b")),
            vec![json!("a"), json!(1.5), json!("b")]
        );
    }

    #[test]
    fn test_value_list_wraps_scalars() {
        assert_eq!(value_list(json!(7)), vec![json!(7)]);
    }

    #[test]
    fn test_bounds_accepts_exactly_two() {
        assert_eq!(bounds(json!("1,5")), Some((json!(1), json!(5))));
        assert_eq!(bounds(json!([1, 5])), Some((json!(1), json!(5))));
        assert_eq!(bounds(json!([1])), None);
        assert_eq!(bounds(json!("1,2,3")), None);
    }

    #[test]
    fn test_string_and_list_bounds_are_identical() {
        assert_eq!(bounds(json!("1,5")), bounds(json!([1, 5])));
    }

    #[test]
    fn test_untrimmed_pieces_stay_strings() {
        assert_eq!(value_list(json!("1, 5")), vec![json!(1), json!(" 5")]);
    }

    #[test]
    fn test_keyed_values_flatten_to_eq_conditions() {
        let conds = WhereInput::keyed_values([("id", json!(3)), ("status", json!("open"))])
            .into_conditions();
        assert_eq!(conds.len(), 2);
        assert_eq!(conds[0], Condition::eq("id", 3));
        assert_eq!(conds[1], Condition::eq("status", "open"));
    }

    #[test]
    fn test_keyed_conditions_flatten_in_order() {
        let conds = WhereInput::keyed_conditions([(
            "price",
            vec![ConditionSpec::new("gte", 10), ConditionSpec::new("lt", 100)],
        )])
        .into_conditions();
        assert_eq!(conds.len(), 2);
        assert_eq!(conds[0].field, "price");
        assert_eq!(conds[0].op, Operator::Gte);
        assert_eq!(conds[1].op, Operator::Lt);
    }

    #[test]
    fn test_attrs_merge_preserves_order() {
        let attrs = ConditionAttrs::new().set("boost", 2).set("type", "phrase");
        let mut target = Map::new();
        target.insert("query".to_string(), json!("x"));
        attrs.merge_into(&mut target);

        let keys: Vec<&str> = target.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["query", "boost", "type"]);
    }
}
