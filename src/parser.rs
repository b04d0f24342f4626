//! Staged parser for single-statement TabQL queries.
//!
//! The parser runs four stages over the token stream, each consuming the
//! region left by the previous one, with no backtracking across stages:
//!
//! 1. clause split — everything after the first `WHERE` keyword is the
//!    filter region; everything before is the head (SELECT/FROM/JOIN/GROUP BY)
//! 2. select parse — field list and table name from the pre-join head
//! 3. join extraction — at most one `(INNER|LEFT|RIGHT) JOIN ... ON a = b`
//! 4. where parse — the filter region split at AND/OR into a flat list of
//!    binary conditions (the AND/OR distinction is discarded by design)
//!
//! Field expressions, table names, condition values and group-by fields are
//! recovered verbatim from the source via token spans, so quoted literals and
//! free-form value text survive untouched.

use crate::ast::{
    ComparisonOp, Condition, JoinClause, JoinCondition, JoinType, ParsedQuery,
};
use crate::error::{QueryError, QueryResult};
use crate::lexer::{QueryLexer, Spanned, Token};

/// TabQL statement parser.
///
/// Holds the trimmed source alongside the token stream; tokens carry byte
/// spans into the source so clause text can be sliced out verbatim.
pub struct QueryParser<'a> {
    input: &'a str,
    tokens: Vec<Spanned>,
}

impl<'a> QueryParser<'a> {
    pub fn new(input: &'a str) -> Self {
        let input = input.trim();
        let tokens = QueryLexer::new(input).tokenize();

        Self { input, tokens }
    }

    fn token(&self, index: usize) -> &Token {
        &self.tokens[index].token
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        &self.input[start..end]
    }

    /// Parse the statement into the output contract.
    pub fn parse(&self) -> QueryResult<ParsedQuery> {
        let eof = self.tokens.len() - 1;

        // Stage 1: split at the first WHERE keyword that has clause text
        // after it. A trailing WHERE is not a clause boundary (the dialect
        // matches the keyword surrounded by whitespace), so it stays in the
        // head and ends up inside the table token. Later WHERE text stays
        // inside the filter region untouched.
        let where_idx = (0..eof).find(|&i| *self.token(i) == Token::Where && i + 1 < eof);
        let head_end = where_idx.unwrap_or(eof);
        let head_end_byte = self.tokens[head_end].start;

        let join_marker = self.find_join_marker(head_end);
        let group_marker = self.find_group_marker(head_end);

        // Stage 2: SELECT ... FROM ... over the pre-join head.
        let select_end = join_marker.unwrap_or(head_end);
        let (fields, table) = self.parse_select(select_end, group_marker)?;

        // GROUP BY and aggregate detection run over the full head, not the
        // trimmed select region: grouping keywords are recognized
        // independently of the select/from shape.
        let group_by_fields = self.parse_group_by(group_marker, head_end, head_end_byte);
        let aggregate_found = self.find_aggregate(head_end);

        // Stage 3: at most one join; malformed join syntax is not an error,
        // it just yields no join.
        let join = join_marker.and_then(|marker| self.join_clause_at(marker, head_end));
        let (join_type, join_table, join_condition) = match join {
            Some(join) => (Some(join.join_type), Some(join.table), Some(join.condition)),
            None => (None, None, None),
        };

        // Stage 4: flat condition list from the filter region.
        let where_clauses = match where_idx {
            Some(idx) => self.parse_where(idx, eof)?,
            None => Vec::new(),
        };

        // Falsy check, not an is-none check: a present-but-empty group-by
        // list also counts as "without group by".
        let has_aggregate_without_group_by =
            aggregate_found && group_by_fields.as_ref().map_or(true, |f| f.is_empty());

        Ok(ParsedQuery {
            fields,
            table,
            where_clauses,
            join_type,
            join_table,
            join_condition,
            group_by_fields,
            has_aggregate_without_group_by,
        })
    }

    /// First `(INNER|LEFT|RIGHT) JOIN` token pair in the head, if any.
    fn find_join_marker(&self, head_end: usize) -> Option<usize> {
        (0..head_end).find(|&i| {
            matches!(self.token(i), Token::Inner | Token::Left | Token::Right)
                && i + 1 < head_end
                && *self.token(i + 1) == Token::Join
        })
    }

    /// First `GROUP BY` token pair in the head, if any.
    fn find_group_marker(&self, head_end: usize) -> Option<usize> {
        (0..head_end).find(|&i| {
            *self.token(i) == Token::Group && i + 1 < head_end && *self.token(i + 1) == Token::By
        })
    }

    fn parse_select(
        &self,
        select_end: usize,
        group_marker: Option<usize>,
    ) -> QueryResult<(Vec<String>, String)> {
        if select_end == 0 || *self.token(0) != Token::Select {
            return Err(QueryError::InvalidSelectFormat);
        }

        // Non-greedy fields: the first FROM wins.
        let from_idx = (1..select_end)
            .find(|&i| *self.token(i) == Token::From)
            .ok_or(QueryError::InvalidSelectFormat)?;
        if from_idx == 1 {
            return Err(QueryError::InvalidSelectFormat);
        }

        let fields = self.split_on_commas(
            1,
            from_idx,
            self.tokens[0].end,
            self.tokens[from_idx].start,
        );

        // The table region runs up to the join marker (already excluded via
        // select_end), the GROUP BY marker, or the end of the head.
        let table_end = match group_marker {
            Some(g) if g > from_idx && g < select_end => self.tokens[g].start,
            _ => self.tokens[select_end].start,
        };
        let table = self.slice(self.tokens[from_idx].end, table_end).trim();
        if table.is_empty() {
            return Err(QueryError::InvalidSelectFormat);
        }

        Ok((fields, table.to_string()))
    }

    fn parse_group_by(
        &self,
        group_marker: Option<usize>,
        head_end: usize,
        head_end_byte: usize,
    ) -> Option<Vec<String>> {
        let marker = group_marker?;
        let region_start = self.tokens[marker + 1].end;
        if self.slice(region_start, head_end_byte).trim().is_empty() {
            return None;
        }

        Some(self.split_on_commas(marker + 2, head_end, region_start, head_end_byte))
    }

    /// Comma-separated raw segments of the token range, each trimmed.
    fn split_on_commas(
        &self,
        start_idx: usize,
        end_idx: usize,
        start_byte: usize,
        end_byte: usize,
    ) -> Vec<String> {
        let mut segments = Vec::new();
        let mut seg_start = start_byte;

        for i in start_idx..end_idx {
            if *self.token(i) == Token::Comma {
                segments.push(self.slice(seg_start, self.tokens[i].start).trim().to_string());
                seg_start = self.tokens[i].end;
            }
        }
        segments.push(self.slice(seg_start, end_byte).trim().to_string());

        segments
    }

    /// Any `COUNT|AVG|SUM|MIN|MAX ( * | word )` call in the head.
    fn find_aggregate(&self, head_end: usize) -> bool {
        (0..head_end).any(|i| {
            matches!(
                self.token(i),
                Token::Count | Token::Avg | Token::Sum | Token::Min | Token::Max
            ) && i + 3 < head_end
                && *self.token(i + 1) == Token::LeftParen
                && self.is_aggregate_arg(i + 2)
                && *self.token(i + 3) == Token::RightParen
        })
    }

    fn is_aggregate_arg(&self, index: usize) -> bool {
        match self.token(index) {
            Token::Star => true,
            // A bare identifier; dotted references do not qualify.
            Token::Word(w) => {
                !w.is_empty() && w.chars().all(|c| c.is_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    /// Extract the join clause anchored at `marker`, or `None` when the
    /// `ON left = right` tail never materializes. Candidate `ON` tokens are
    /// tried left to right, so the join table stretches only as far as the
    /// first `ON` followed by a well-formed equality.
    fn join_clause_at(&self, marker: usize, head_end: usize) -> Option<JoinClause> {
        let join_type = match self.token(marker) {
            Token::Inner => JoinType::Inner,
            Token::Left => JoinType::Left,
            Token::Right => JoinType::Right,
            _ => return None,
        };

        let table_start = self.tokens[marker + 1].end;
        for k in (marker + 2)..head_end {
            if *self.token(k) != Token::On || k + 3 >= head_end {
                continue;
            }

            let left = match self.token(k + 1) {
                Token::Word(w) if is_column_ref(w) => w,
                _ => continue,
            };
            if *self.token(k + 2) != Token::Equal {
                continue;
            }
            let right = match self.token(k + 3) {
                Token::Word(w) if is_column_ref(w) => w,
                _ => continue,
            };

            let table = self.slice(table_start, self.tokens[k].start).trim();
            if table.is_empty() {
                continue;
            }

            return Some(JoinClause {
                join_type,
                table: table.to_string(),
                condition: JoinCondition {
                    left: left.clone(),
                    right: right.clone(),
                },
            });
        }

        None
    }

    /// Scan the whole statement for a join clause, ignoring any WHERE split.
    /// This is the standalone entry point behind [`parse_join_clause`].
    pub fn join_clause(&self) -> Option<JoinClause> {
        let eof = self.tokens.len() - 1;
        let marker = self.find_join_marker(eof)?;
        self.join_clause_at(marker, eof)
    }

    fn parse_where(&self, where_idx: usize, eof: usize) -> QueryResult<Vec<Condition>> {
        let mut conditions = Vec::new();
        let mut seg_start_idx = where_idx + 1;
        let mut seg_start_byte = self.tokens[where_idx].end;

        for i in (where_idx + 1)..=eof {
            // A connective splits only with tokens on its far side; a
            // trailing AND/OR stays inside the last value, like the
            // whitespace-surrounded separators of the dialect.
            let connective =
                matches!(self.token(i), Token::And | Token::Or) && i + 1 < eof;
            if connective || i == eof {
                let seg_end_byte = if connective {
                    self.tokens[i].start
                } else {
                    self.input.len()
                };
                conditions.push(self.parse_condition(seg_start_idx, i, seg_start_byte, seg_end_byte)?);
                seg_start_idx = i + 1;
                seg_start_byte = self.tokens[i].end;
            }
        }

        Ok(conditions)
    }

    fn parse_condition(
        &self,
        start_idx: usize,
        end_idx: usize,
        start_byte: usize,
        end_byte: usize,
    ) -> QueryResult<Condition> {
        for i in start_idx..end_idx {
            if let Some(operator) = comparison_op(self.token(i)) {
                let field = self.slice(start_byte, self.tokens[i].start).trim().to_string();
                let value = self.slice(self.tokens[i].end, end_byte).trim().to_string();
                return Ok(Condition {
                    field,
                    operator,
                    value,
                });
            }
        }

        Err(QueryError::InvalidWhereClause(
            self.slice(start_byte, end_byte).trim().to_string(),
        ))
    }
}

fn comparison_op(token: &Token) -> Option<ComparisonOp> {
    match token {
        Token::Equal => Some(ComparisonOp::Eq),
        Token::NotEqual => Some(ComparisonOp::NotEq),
        Token::GreaterThan => Some(ComparisonOp::Gt),
        Token::LessThan => Some(ComparisonOp::Lt),
        Token::GreaterThanEq => Some(ComparisonOp::GtEq),
        Token::LessThanEq => Some(ComparisonOp::LtEq),
        _ => None,
    }
}

fn is_column_ref(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

/// Parse a single TabQL statement.
///
/// Pure function: no state survives between calls, and re-parsing the same
/// input yields a structurally equal result.
pub fn parse_query(query: &str) -> QueryResult<ParsedQuery> {
    QueryParser::new(query).parse()
}

/// Extract the join clause of a statement without parsing the rest of it.
/// Returns `None` for statements without a recognizable join.
pub fn parse_join_clause(query: &str) -> Option<JoinClause> {
    QueryParser::new(query).join_clause()
}
