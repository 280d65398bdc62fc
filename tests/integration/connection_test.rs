//! Connection integration tests.
//!
//! Tests database connectivity and the memoized provider.

use retail_dash::config::ConnectionConfig;
use retail_dash::db::{ConnectionProvider, PostgresClient, PostgresConnector};
use retail_dash::notice::{NoticeLevel, Notices};

use super::get_test_database_url;

#[tokio::test]
async fn test_connect_with_valid_credentials() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let config = ConnectionConfig::from_connection_string(&url).unwrap();
    assert!(PostgresClient::connect(&config).await.is_ok());
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_invalid_port() {
    let config = ConnectionConfig {
        host: Some("localhost".to_string()),
        port: 59999, // Unlikely to be in use
        database: Some("testdb".to_string()),
        user: Some("testuser".to_string()),
        password: Some("testpass".to_string()),
    };

    let result = PostgresClient::connect(&config).await;
    assert!(result.is_err());
}

#[tokio::test(flavor = "current_thread")]
async fn test_provider_reports_failure_once() {
    let config = ConnectionConfig {
        host: Some("localhost".to_string()),
        port: 59999,
        database: Some("testdb".to_string()),
        user: Some("testuser".to_string()),
        password: None,
    };
    let provider = ConnectionProvider::new(PostgresConnector::new(config));
    let mut notices = Notices::new();

    assert!(provider.get_connection(&mut notices).await.is_none());
    assert!(provider.get_connection(&mut notices).await.is_none());

    assert_eq!(notices.len(), 1);
    assert!(notices.has_level(NoticeLevel::Error));
    assert!(notices.all()[0]
        .message
        .starts_with("Failed to connect to the database:"));
}

#[tokio::test]
async fn test_provider_reuses_connection() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let config = ConnectionConfig::from_connection_string(&url).unwrap();
    let provider = ConnectionProvider::new(PostgresConnector::new(config));
    let mut notices = Notices::new();

    let first = provider.get_connection(&mut notices).await.unwrap();
    let second = provider.get_connection(&mut notices).await.unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert!(notices.is_empty());
}

#[test]
fn test_connection_string_parsing() {
    let config =
        ConnectionConfig::from_connection_string("postgres://postgres:pw@localhost:5433/loki")
            .unwrap();

    assert_eq!(config.host.as_deref(), Some("localhost"));
    assert_eq!(config.port, 5433);
    assert_eq!(config.database.as_deref(), Some("loki"));
    assert_eq!(config.user.as_deref(), Some("postgres"));
    assert_eq!(config.password.as_deref(), Some("pw"));
}
