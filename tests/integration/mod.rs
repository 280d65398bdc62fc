//! Database integration tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable to run them.

pub mod catalog_test;
pub mod connection_test;
pub mod query_test;

use retail_dash::config::ConnectionConfig;
use retail_dash::db::PostgresClient;
use sqlx::postgres::PgPoolOptions;

const SEED_SQL: &str = include_str!("../fixtures/retail_seed.sql");

/// Helper to get test database URL from environment.
pub fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

/// Creates a client against the seeded test database.
pub async fn get_seeded_client() -> Option<PostgresClient> {
    let url = get_test_database_url()?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .ok()?;
    if let Err(e) = sqlx::raw_sql(SEED_SQL).execute(&pool).await {
        eprintln!("Failed to seed test database: {e}");
        return None;
    }
    pool.close().await;

    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    PostgresClient::connect(&config).await.ok()
}
