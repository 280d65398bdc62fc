//! Read-only statement guard.
//!
//! Uses sqlparser-rs with the PostgreSQL dialect to confirm a statement is a
//! single query that cannot modify data before it reaches the database.

use sqlparser::ast::{Query, SetExpr, Statement};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::error::{DashError, Result};

/// Outcome of inspecting a SQL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Exactly one statement, and it only reads.
    ReadOnly,
    /// Parsed, but not a single read-only query.
    Rejected(String),
    /// The parser could not handle the text; the server gets the final word.
    Unparsed(String),
}

/// Inspects SQL statements before execution.
#[derive(Debug)]
pub struct StatementGuard {
    dialect: PostgreSqlDialect,
}

impl Default for StatementGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementGuard {
    pub fn new() -> Self {
        Self {
            dialect: PostgreSqlDialect {},
        }
    }

    pub fn inspect(&self, sql: &str) -> Verdict {
        let statements = match Parser::parse_sql(&self.dialect, sql) {
            Ok(statements) => statements,
            Err(e) => return Verdict::Unparsed(e.to_string()),
        };

        match statements.as_slice() {
            [] => Verdict::Rejected("Empty SQL statement".to_string()),
            [Statement::Query(query)] if query_is_read_only(query) => Verdict::ReadOnly,
            [Statement::Query(_)] => {
                Verdict::Rejected("Query contains a data-modifying clause".to_string())
            }
            [_] => Verdict::Rejected("Only SELECT queries can be run".to_string()),
            many => Verdict::Rejected(format!(
                "Expected one statement, found {}",
                many.len()
            )),
        }
    }
}

/// Fails with a query error when the SQL parses to anything but one read-only query.
pub fn check_read_only(sql: &str) -> Result<()> {
    match StatementGuard::new().inspect(sql) {
        Verdict::ReadOnly | Verdict::Unparsed(_) => Ok(()),
        Verdict::Rejected(reason) => Err(DashError::query(reason)),
    }
}

fn query_is_read_only(query: &Query) -> bool {
    let ctes_read_only = query
        .with
        .as_ref()
        .map(|with| with.cte_tables.iter().all(|cte| query_is_read_only(&cte.query)))
        .unwrap_or(true);

    ctes_read_only && set_expr_is_read_only(&query.body)
}

fn set_expr_is_read_only(expr: &SetExpr) -> bool {
    match expr {
        SetExpr::Select(select) => select.into.is_none(),
        SetExpr::Query(query) => query_is_read_only(query),
        SetExpr::SetOperation { left, right, .. } => {
            set_expr_is_read_only(left) && set_expr_is_read_only(right)
        }
        SetExpr::Insert(_) | SetExpr::Update(_) => false,
        _ => true,
    }
}
