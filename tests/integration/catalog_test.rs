//! Runs every catalog statement against the seeded schema.

use retail_dash::catalog::CatalogId;
use retail_dash::db::Value;
use retail_dash::notice::{NoticeLevel, Notices};
use retail_dash::query::run_query;

use super::get_seeded_client;

#[tokio::test]
async fn test_every_catalog_statement_runs() {
    let Some(client) = get_seeded_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    for id in CatalogId::ALL {
        let catalog = id.catalog();
        for entry in catalog.entries() {
            let mut notices = Notices::new();
            let result = run_query(&client, entry.sql, &mut notices).await;
            assert!(
                !notices.has_level(NoticeLevel::Error),
                "{} failed: {:?}",
                entry.label,
                notices.all()
            );
            assert!(!result.columns.is_empty(), "{} has no columns", entry.label);
        }
    }
}

#[tokio::test]
async fn test_highest_profit_category_is_single_row() {
    let Some(client) = get_seeded_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let catalog = CatalogId::Guvi.catalog();
    let sql = catalog
        .lookup("9. Find the product category with the highest total profit")
        .unwrap();
    let mut notices = Notices::new();
    let result = run_query(&client, sql, &mut notices).await;

    assert_eq!(result.row_count, 1);
    assert_eq!(result.column_names(), vec!["category", "total_profit"]);
}

#[tokio::test]
async fn test_low_revenue_products_are_ascending() {
    let Some(client) = get_seeded_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let catalog = CatalogId::Own.catalog();
    let sql = catalog
        .lookup("7. Find the Low-Revenue Products below 1 Lakh")
        .unwrap();
    let mut notices = Notices::new();
    let result = run_query(&client, sql, &mut notices).await;

    let revenues: Vec<f64> = result.column_values(1).filter_map(Value::as_f64).collect();
    assert!(!revenues.is_empty());
    assert!(revenues.windows(2).all(|w| w[0] <= w[1]));
    assert!(revenues.iter().all(|r| *r < 100_000.0));
}
