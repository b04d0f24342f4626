//! Error types for tabql-core.
//!
//! Minimal error types without storage or server dependencies.

use thiserror::Error;

/// TabQL parse error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The statement head does not match `SELECT ... FROM ...`.
    #[error("Invalid SELECT format")]
    InvalidSelectFormat,

    /// A WHERE fragment lacks a recognized comparison operator.
    #[error("Invalid WHERE clause format: {0}")]
    InvalidWhereClause(String),
}

/// Result type for TabQL parsing operations
pub type QueryResult<T> = Result<T, QueryError>;

impl serde::Serialize for QueryError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
