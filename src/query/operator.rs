// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Condition operators
//!
//! The public where-surface accepts a wide set of operator spellings; they
//! all collapse into this closed enum. Parsing is total: a spelling that is
//! not in the table behaves as [`Operator::Eq`].

use serde::{Deserialize, Serialize};

/// Clause bucket of a boolean query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bucket {
    /// All clauses must match (AND).
    Must,
    /// No clause may match (NOT).
    MustNot,
    /// At least one clause should match, contributing to score (OR).
    Should,
}

/// Comparison operator of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Exact match (`=`); also the fallback for unrecognized spellings.
    Eq,
    /// Two-bound inclusive range.
    Between,
    /// Negated two-bound inclusive range.
    NotBetween,
    Gt,
    Lt,
    Gte,
    Lte,
    NotGt,
    NotLt,
    NotGte,
    NotLte,
    /// Multi-value exact match.
    In,
    /// Negated multi-value match.
    NotIn,
    /// Analyzed text match (`like`, `and`, `&&`).
    Like,
    /// Negated analyzed text match (`!=`, `=!`, `not like`, `not`).
    NotLike,
    /// Analyzed text match in the should bucket (`or`, `||`, `or like`).
    Or,
}

impl Operator {
    /// Resolve an operator spelling. Unrecognized spellings resolve to `Eq`.
    #[must_use]
    pub fn parse(alias: &str) -> Self {
        match alias {
            "between" => Self::Between,
            "not between" => Self::NotBetween,
            "gt" | ">" => Self::Gt,
            "lt" | "<" => Self::Lt,
            "gte" | ">=" => Self::Gte,
            "lte" | "<=" => Self::Lte,
            "not gt" | "! gt" | "!gt" | "! >" | "!>" | "not >" => Self::NotGt,
            "not lt" | "! lt" | "!lt" | "! <" | "!<" | "not <" => Self::NotLt,
            "not gte" | "! gte" | "!gte" | "! >=" | "!>=" | "not >=" => Self::NotGte,
            "not lte" | "! lte" | "!lte" | "! <=" | "!<=" | "not <=" => Self::NotLte,
            "in" => Self::In,
            "not in" => Self::NotIn,
            "and" | "like" | "&&" => Self::Like,
            "=!" | "!=" | "not like" | "not" => Self::NotLike,
            "or" | "||" | "or like" => Self::Or,
            _ => Self::Eq,
        }
    }

    /// The bucket this operator's clauses land in.
    #[must_use]
    pub fn bucket(self) -> Bucket {
        match self {
            Self::Eq
            | Self::Between
            | Self::Gt
            | Self::Lt
            | Self::Gte
            | Self::Lte
            | Self::In
            | Self::Like => Bucket::Must,
            Self::NotBetween
            | Self::NotGt
            | Self::NotLt
            | Self::NotGte
            | Self::NotLte
            | Self::NotIn
            | Self::NotLike => Bucket::MustNot,
            Self::Or => Bucket::Should,
        }
    }
}

impl From<&str> for Operator {
    fn from(alias: &str) -> Self {
        Self::parse(alias)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Eq => "=",
            Self::Between => "between",
            Self::NotBetween => "not between",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::NotGt => "not gt",
            Self::NotLt => "not lt",
            Self::NotGte => "not gte",
            Self::NotLte => "not lte",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Like => "like",
            Self::NotLike => "not like",
            Self::Or => "or",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_resolves_to_its_operator() {
        let table: &[(&[&str], Operator)] = &[
            (&["="], Operator::Eq),
            (&["between"], Operator::Between),
            (&["not between"], Operator::NotBetween),
            (&["gt", ">"], Operator::Gt),
            (&["lt", "<"], Operator::Lt),
            (&["gte", ">="], Operator::Gte),
            (&["lte", "<="], Operator::Lte),
            (
                &["not gt", "! gt", "!gt", "! >", "!>", "not >"],
                Operator::NotGt,
            ),
            (
                &["not lt", "! lt", "!lt", "! <", "!<", "not <"],
                Operator::NotLt,
            ),
            (
                &["not gte", "! gte", "!gte", "! >=", "!>=", "not >="],
                Operator::NotGte,
            ),
            (
                &["not lte", "! lte", "!lte", "! <=", "!<=", "not <="],
                Operator::NotLte,
            ),
            (&["in"], Operator::In),
            (&["not in"], Operator::NotIn),
            (&["and", "like", "&&"], Operator::Like),
            (&["=!", "!=", "not like", "not"], Operator::NotLike),
            (&["or", "||", "or like"], Operator::Or),
        ];

        for (aliases, expected) in table {
            for alias in *aliases {
                assert_eq!(Operator::parse(alias), *expected, "alias {alias:?}");
            }
        }
    }

    #[test]
    fn test_unrecognized_spelling_falls_back_to_eq() {
        assert_eq!(Operator::parse("eq"), Operator::Eq);
        assert_eq!(Operator::parse("LIKE"), Operator::Eq);
        assert_eq!(Operator::parse("~"), Operator::Eq);
        assert_eq!(Operator::parse(""), Operator::Eq);
    }

    #[test]
    fn test_bucket_routing() {
        assert_eq!(Operator::Eq.bucket(), Bucket::Must);
        assert_eq!(Operator::Between.bucket(), Bucket::Must);
        assert_eq!(Operator::In.bucket(), Bucket::Must);
        assert_eq!(Operator::Like.bucket(), Bucket::Must);
        assert_eq!(Operator::NotBetween.bucket(), Bucket::MustNot);
        assert_eq!(Operator::NotIn.bucket(), Bucket::MustNot);
        assert_eq!(Operator::NotLike.bucket(), Bucket::MustNot);
        assert_eq!(Operator::NotGte.bucket(), Bucket::MustNot);
        assert_eq!(Operator::Or.bucket(), Bucket::Should);
    }

    #[test]
    fn test_from_str_matches_parse() {
        let op: Operator = "not in".into();
        assert_eq!(op, Operator::NotIn);
    }
}
