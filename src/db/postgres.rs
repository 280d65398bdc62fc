//! PostgreSQL database client implementation.
//!
//! Statements run over the simple-query protocol, so every value arrives in
//! text form and is converted by its declared column type. That keeps
//! `NUMERIC` aggregates (SUM/AVG over decimals, EXTRACT) readable without a
//! decimal crate.

use crate::config::ConnectionConfig;
use crate::db::{ColumnInfo, Connector, DatabaseClient, QueryResult, Row, ScalarType, Value};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column as SqlxColumn, Executor, Row as SqlxRow, TypeInfo};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 30;

/// How long to wait for the server before giving up on the connection.
const ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL database client.
#[derive(Debug)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connects with a single attempt; failures are mapped to friendly messages.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = config.connect_options()?;

        debug!("Connecting to {}", config.display_string());
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await
            .map_err(|e| map_connection_error(e, config))?;

        debug!("Successfully connected to database");
        Ok(Self { pool })
    }

    /// Reads the projection of a statement without fetching rows.
    async fn describe_columns(&self, sql: &str) -> Vec<ColumnInfo> {
        match (&self.pool).describe(sql).await {
            Ok(describe) => describe
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            Err(e) => {
                warn!("Could not describe empty result: {}", e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let rows = tokio::time::timeout(
            Duration::from_secs(QUERY_TIMEOUT_SECS),
            sqlx::raw_sql(sql).fetch_all(&self.pool),
        )
        .await
        .map_err(|_| {
            DashError::query(format!(
                "Query timed out after {QUERY_TIMEOUT_SECS} seconds"
            ))
        })?
        .map_err(|e| DashError::query(format_query_error(e)))?;

        let execution_time = start.elapsed();

        let columns: Vec<ColumnInfo> = match rows.first() {
            Some(first_row) => first_row
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            None => self.describe_columns(sql).await,
        };

        let rows: Vec<Row> = rows.iter().map(convert_row).collect();

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }
}

/// Connects to PostgreSQL from a [`ConnectionConfig`].
#[derive(Debug, Clone)]
pub struct PostgresConnector {
    config: ConnectionConfig,
}

impl PostgresConnector {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    async fn connect(&self) -> Result<Arc<dyn DatabaseClient>> {
        let client = PostgresClient::connect(&self.config).await?;
        Ok(Arc::new(client))
    }

    fn describe(&self) -> String {
        self.config.display_string()
    }
}

/// Converts a text-format PgRow to our Row type.
fn convert_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let raw = row.try_get_unchecked::<Option<String>, _>(i).ok().flatten();
            convert_text_value(raw, col.type_info().name())
        })
        .collect()
}

/// Converts one text-format value according to its declared type.
///
/// Values that do not parse as their declared numeric type are kept as text.
fn convert_text_value(raw: Option<String>, type_name: &str) -> Value {
    let Some(text) = raw else {
        return Value::Null;
    };

    if type_name.eq_ignore_ascii_case("BOOL") {
        return match text.as_str() {
            "t" => Value::Text("true".to_string()),
            "f" => Value::Text("false".to_string()),
            _ => Value::Text(text),
        };
    }

    match ScalarType::from_declared(type_name) {
        ScalarType::Integer => text.parse::<i64>().map(Value::Int).unwrap_or(Value::Text(text)),
        ScalarType::Real => text.parse::<f64>().map(Value::Float).unwrap_or(Value::Text(text)),
        ScalarType::Text | ScalarType::Unknown => Value::Text(text),
    }
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> DashError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.port;
    let user = config.user.as_deref().unwrap_or("unknown");
    let database = config.database.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        DashError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
    {
        DashError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("does not exist") && error_str.contains("database") {
        DashError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("ssl") || error_str.contains("tls") {
        DashError::connection(
            "Server requires SSL. Add '?sslmode=require' to connection string.".to_string(),
        )
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        DashError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        DashError::connection(error.to_string())
    }
}

/// Formats a query error, appending DETAIL and HINT when the server sent them.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = format!("ERROR: {}", db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }
        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }
    }

    result
}
