//! Query execution integration tests.
//!
//! Tests value conversion and the empty-table fallback against PostgreSQL.

use retail_dash::db::{DatabaseClient, Value};
use retail_dash::notice::{NoticeLevel, Notices};
use retail_dash::query::run_query;

use super::get_seeded_client;

#[tokio::test]
async fn test_execute_simple_select() {
    let Some(client) = get_seeded_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = client
        .execute_query("SELECT 1 AS num, 'hello' AS greeting, NULL::TEXT AS nothing")
        .await
        .unwrap();

    assert_eq!(result.columns.len(), 3);
    assert_eq!(result.columns[0].name, "num");
    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows[0][0], Value::Int(1));
    assert_eq!(result.rows[0][1], Value::Text("hello".to_string()));
    assert_eq!(result.rows[0][2], Value::Null);
}

#[tokio::test]
async fn test_numeric_aggregates_become_floats() {
    let Some(client) = get_seeded_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = client
        .execute_query("SELECT SUM(quantity) AS qty, AVG(sale_price) AS avg_price FROM sales_details")
        .await
        .unwrap();

    assert!(matches!(result.rows[0][0], Value::Int(_)));
    assert!(matches!(result.rows[0][1], Value::Float(_)));
}

#[tokio::test]
async fn test_empty_result_keeps_columns() {
    let Some(client) = get_seeded_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = client
        .execute_query("SELECT order_id, region FROM order_details WHERE order_id < 0")
        .await
        .unwrap();

    assert_eq!(result.row_count, 0);
    assert_eq!(result.column_names(), vec!["order_id", "region"]);
}

#[tokio::test]
async fn test_failed_query_returns_empty_table() {
    let Some(client) = get_seeded_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let mut notices = Notices::new();
    let result = run_query(&client, "SELECT missing_column FROM order_details", &mut notices).await;

    assert!(result.is_empty());
    assert!(result.columns.is_empty());
    assert!(notices.has_level(NoticeLevel::Error));
    assert!(notices.all()[0].message.starts_with("Error running query:"));
}
