//! Database abstraction layer.
//!
//! Provides a trait-based interface for database operations so the
//! PostgreSQL backend and the in-memory sample database are interchangeable.

mod mock;
mod postgres;
mod provider;
mod sample;
mod types;

pub use mock::{FailingConnector, FailingDatabaseClient, MockConnector, MockDatabaseClient};
pub use postgres::{PostgresClient, PostgresConnector};
pub use provider::ConnectionProvider;
pub use types::{ColumnInfo, QueryResult, Row, ScalarType, Value};

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait defining the interface for database clients.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL query and returns the results.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;
}

/// Opens a database client. Used once per [`ConnectionProvider`].
#[async_trait]
pub trait Connector: Send + Sync {
    /// Makes a single connection attempt.
    async fn connect(&self) -> Result<Arc<dyn DatabaseClient>>;

    /// Display-safe description of the target, shown in the header.
    fn describe(&self) -> String;
}
