//! Query execution.
//!
//! Runs one catalog statement against the session's client. Failures never
//! propagate: they become an error notice and the empty result.

use std::time::Instant;

use crate::catalog::check_read_only;
use crate::db::{DatabaseClient, QueryResult};
use crate::error::Result;
use crate::notice::Notices;
use tracing::debug;

/// Executes `sql` and returns its table, or the empty table on any failure.
pub async fn run_query(client: &dyn DatabaseClient, sql: &str, notices: &mut Notices) -> QueryResult {
    match execute(client, sql).await {
        Ok(result) => result,
        Err(e) => {
            notices.error(format!("Error running query: {}", e.message()));
            QueryResult::new()
        }
    }
}

async fn execute(client: &dyn DatabaseClient, sql: &str) -> Result<QueryResult> {
    check_read_only(sql)?;

    let start = Instant::now();
    let result = client.execute_query(sql).await?;
    debug!(
        "Query returned {} rows in {:?}",
        result.row_count,
        start.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogId;
    use crate::db::{FailingDatabaseClient, MockDatabaseClient};
    use crate::notice::NoticeLevel;

    #[tokio::test]
    async fn test_run_catalog_query() {
        let client = MockDatabaseClient::retail_sample();
        let catalog = CatalogId::Own.catalog();
        let sql = catalog.get(4).unwrap().sql;
        let mut notices = Notices::new();

        let result = run_query(&client, sql, &mut notices).await;

        assert_eq!(result.column_names(), vec!["region", "order_count"]);
        assert_eq!(result.row_count, 4);
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_failure_returns_empty_result() {
        let mut notices = Notices::new();
        let result = run_query(&FailingDatabaseClient, "SELECT 1", &mut notices).await;

        assert_eq!(result, QueryResult::new());
        assert_eq!(notices.len(), 1);
        assert_eq!(notices.all()[0].level, NoticeLevel::Error);
        assert_eq!(
            notices.all()[0].message,
            "Error running query: server closed the connection unexpectedly"
        );
    }

    #[tokio::test]
    async fn test_malformed_sql_reported() {
        let client = MockDatabaseClient::retail_sample();
        let mut notices = Notices::new();

        let result = run_query(&client, "SELEC category FROM sales_details", &mut notices).await;

        assert!(result.columns.is_empty());
        assert!(notices.all()[0].message.contains("syntax error"));
    }

    #[tokio::test]
    async fn test_modifying_statement_never_reaches_client() {
        let client = MockDatabaseClient::new();
        let mut notices = Notices::new();

        let result = run_query(&client, "DELETE FROM order_details", &mut notices).await;

        assert!(result.is_empty());
        assert!(notices.all()[0].message.contains("Only SELECT queries"));
    }
}
