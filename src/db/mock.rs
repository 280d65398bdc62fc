//! Mock database clients for testing and demos.
//!
//! `MockDatabaseClient::retail_sample()` answers every catalog query from
//! canned data so the dashboard runs without a PostgreSQL server.

use super::{sample, Connector, DatabaseClient, QueryResult};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Collapses runs of whitespace so lookups ignore SQL layout.
fn normalize(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A mock database client that returns registered results by SQL text.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    results: HashMap<String, QueryResult>,
}

impl MockDatabaseClient {
    /// Creates a mock that knows no queries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that answers every catalog query with sample data.
    pub fn retail_sample() -> Self {
        sample::retail_results()
            .into_iter()
            .fold(Self::new(), |client, (sql, result)| {
                client.with_result(sql, result)
            })
    }

    /// Registers the result returned for `sql`.
    pub fn with_result(mut self, sql: &str, result: QueryResult) -> Self {
        self.results.insert(normalize(sql), result);
        self
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let key = normalize(sql);

        if !key.to_uppercase().starts_with("SELECT") {
            let first_word = key.split(' ').next().unwrap_or_default();
            return Err(DashError::query(format!(
                "ERROR: syntax error at or near \"{first_word}\""
            )));
        }

        self.results
            .get(&key)
            .cloned()
            .map(|result| result.with_execution_time(Duration::from_millis(1)))
            .ok_or_else(|| DashError::query("ERROR: relation does not exist in sample database"))
    }
}

/// A client whose every query fails, as if the server went away.
#[derive(Debug, Default)]
pub struct FailingDatabaseClient;

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(DashError::query(
            "server closed the connection unexpectedly",
        ))
    }
}

/// Hands out a prepared client and counts connection attempts.
pub struct MockConnector {
    client: Arc<dyn DatabaseClient>,
    attempts: AtomicUsize,
}

impl MockConnector {
    pub fn new(client: impl DatabaseClient + 'static) -> Self {
        Self {
            client: Arc::new(client),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Connector over the retail sample data.
    pub fn retail_sample() -> Self {
        Self::new(MockDatabaseClient::retail_sample())
    }

    /// Number of times `connect` has been called.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self) -> Result<Arc<dyn DatabaseClient>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.client))
    }

    fn describe(&self) -> String {
        "sample @ memory".to_string()
    }
}

/// A connector that always fails with the given message.
#[derive(Debug, Clone)]
pub struct FailingConnector {
    message: String,
}

impl FailingConnector {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Connector for FailingConnector {
    async fn connect(&self) -> Result<Arc<dyn DatabaseClient>> {
        Err(DashError::connection(self.message.clone()))
    }

    fn describe(&self) -> String {
        "unreachable".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogId;

    #[tokio::test]
    async fn test_sample_answers_catalog_queries() {
        let client = MockDatabaseClient::retail_sample();
        let sql = CatalogId::Guvi
            .catalog()
            .lookup("9. Find the product category with the highest total profit")
            .unwrap();

        let result = client.execute_query(sql).await.unwrap();
        assert_eq!(result.row_count, 1);
        assert_eq!(result.column_names(), vec!["category", "total_profit"]);
    }

    #[tokio::test]
    async fn test_lookup_ignores_whitespace() {
        let client = MockDatabaseClient::new().with_result(
            "SELECT region\n  FROM order_details",
            QueryResult::new(),
        );
        assert!(client
            .execute_query("SELECT region FROM order_details")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_unknown_query_fails() {
        let client = MockDatabaseClient::retail_sample();
        let err = client
            .execute_query("SELECT * FROM customers")
            .await
            .unwrap_err();
        assert!(matches!(err, DashError::Query(_)));
    }

    #[tokio::test]
    async fn test_malformed_query_reports_syntax_error() {
        let client = MockDatabaseClient::retail_sample();
        let err = client.execute_query("SELEC region").await.unwrap_err();
        assert!(err.to_string().contains("syntax error"));
    }

    #[tokio::test]
    async fn test_failing_client() {
        let err = FailingDatabaseClient
            .execute_query("SELECT 1")
            .await
            .unwrap_err();
        assert!(matches!(err, DashError::Query(_)));
    }

    #[tokio::test]
    async fn test_mock_connector_counts_attempts() {
        let connector = MockConnector::retail_sample();
        assert_eq!(connector.attempts(), 0);
        connector.connect().await.unwrap();
        assert_eq!(connector.attempts(), 1);
    }

    #[tokio::test]
    async fn test_failing_connector() {
        let result = FailingConnector::new("Cannot connect to localhost:5433").connect().await;
        assert!(matches!(result, Err(DashError::Connection(_))));
    }
}
