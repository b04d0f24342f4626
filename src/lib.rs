//! TabQL Core - Storage-independent TabQL query parser.
//!
//! This crate parses single-statement, SQL-like TabQL queries into a
//! structured, validated representation. It carries no storage engine or
//! server dependencies: reading rows from a tabular source and executing the
//! parsed query are the consumer's job.
//!
//! # Main Components
//!
//! - **Lexer**: turns the query string into a span-carrying token stream
//! - **Parser**: staged recursive descent over the tokens
//! - **AST**: the [`ParsedQuery`] output contract consumed by executors
//!
//! # Example
//!
//! ```rust
//! use tabql_core::parse_query;
//!
//! let parsed = parse_query("SELECT id, name FROM student WHERE age > 20").unwrap();
//! assert_eq!(parsed.fields, vec!["id", "name"]);
//! assert_eq!(parsed.table, "student");
//! assert_eq!(parsed.where_clauses.len(), 1);
//! assert_eq!(parsed.where_clauses[0].value, "20");
//! ```
//!
//! The dialect is deliberately constrained: one statement, at most one join,
//! a flat WHERE list (AND and OR are not distinguished), no parentheses, no
//! ORDER BY/LIMIT, no subqueries. Parsing is a pure function of the input.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

// Re-export main types for convenience
pub use ast::{
    ComparisonOp, Condition, JoinClause, JoinCondition, JoinType, ParsedQuery,
};
pub use error::{QueryError, QueryResult};
pub use lexer::{QueryLexer, Spanned, Token};
pub use parser::{parse_join_clause, parse_query, QueryParser};
