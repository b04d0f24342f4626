//! Structured representation of a parsed TabQL statement.
//!
//! `ParsedQuery` is the output contract of the parser: the execution engine
//! consumes it as-is. Field expressions, table names and condition values are
//! carried as raw trimmed text (quoted literals keep their quotes, numbers
//! stay text); nothing is type-coerced at this layer.

use std::fmt;

use serde::Serialize;

/// Comparison operator of a single WHERE condition.
///
/// Exactly the six operators of the dialect. `<>` is not one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

impl ComparisonOp {
    /// The operator exactly as it appears in query text.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::GtEq => ">=",
            ComparisonOp::LtEq => "<=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ComparisonOp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Join type of the single optional join clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for JoinType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A single binary comparison extracted from the WHERE clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub field: String,
    pub operator: ComparisonOp,
    /// Raw trimmed text; `"Mathematics"` keeps its quotes, `25` stays a string.
    pub value: String,
}

/// Equality relation between two column references of a join clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinCondition {
    pub left: String,
    pub right: String,
}

/// A fully recognized join clause: either every part is present or the
/// statement has no join at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub condition: JoinCondition,
}

/// A fully parsed single-statement query.
///
/// Constructed once per parse call, immutable, owned by the caller.
/// `join_type`, `join_table` and `join_condition` are jointly `Some` or
/// jointly `None`. `where_clauses` is empty when no WHERE clause is present;
/// `group_by_fields` is `None` when no GROUP BY clause is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedQuery {
    /// Trimmed field expressions in source order (duplicates permitted).
    pub fields: Vec<String>,
    /// Primary FROM table name.
    pub table: String,
    /// Flat condition list; AND and OR are not distinguished.
    pub where_clauses: Vec<Condition>,
    pub join_type: Option<JoinType>,
    pub join_table: Option<String>,
    pub join_condition: Option<JoinCondition>,
    pub group_by_fields: Option<Vec<String>>,
    /// True iff an aggregate call appears and no GROUP BY clause does.
    pub has_aggregate_without_group_by: bool,
}

impl ParsedQuery {
    /// Whether the statement carries a join clause.
    pub fn has_join(&self) -> bool {
        self.join_type.is_some()
    }
}
