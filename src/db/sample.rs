//! Canned results for the built-in sample database.
//!
//! One result per catalog query, shaped like what PostgreSQL returns for the
//! same SQL (column names, declared types, ordering and limits).

use super::{ColumnInfo, QueryResult, Row, Value};
use crate::catalog::CatalogId;

fn table(columns: &[(&str, &str)], rows: Vec<Row>) -> QueryResult {
    let columns = columns
        .iter()
        .map(|(name, data_type)| ColumnInfo::new(*name, *data_type))
        .collect();
    QueryResult::with_data(columns, rows)
}

fn text_int(rows: &[(&str, i64)]) -> Vec<Row> {
    rows.iter()
        .map(|(k, v)| vec![Value::from(*k), Value::Int(*v)])
        .collect()
}

fn text_float(rows: &[(&str, f64)]) -> Vec<Row> {
    rows.iter()
        .map(|(k, v)| vec![Value::from(*k), Value::Float(*v)])
        .collect()
}

fn float_int(rows: &[(f64, i64)]) -> Vec<Row> {
    rows.iter()
        .map(|(k, v)| vec![Value::Float(*k), Value::Int(*v)])
        .collect()
}

/// Returns `(sql, result)` pairs for every catalog entry.
pub(super) fn retail_results() -> Vec<(&'static str, QueryResult)> {
    let guvi = CatalogId::Guvi.catalog();
    let own = CatalogId::Own.catalog();

    let guvi_results = vec![
        table(
            &[
                ("category", "VARCHAR"),
                ("product_id", "VARCHAR"),
                ("total_revenue", "INT4"),
            ],
            [
                ("Technology", "TEC-PH-10002275", 87450),
                ("Furniture", "FUR-CH-10002024", 75120),
                ("Technology", "TEC-CO-10004722", 71980),
                ("Office Supplies", "OFF-BI-10003527", 66310),
                ("Furniture", "FUR-TA-10001889", 58240),
                ("Technology", "TEC-MA-10002412", 52770),
                ("Office Supplies", "OFF-SU-10000151", 47620),
                ("Furniture", "FUR-BO-10002213", 41980),
                ("Technology", "TEC-AC-10003832", 39540),
                ("Office Supplies", "OFF-AP-10002534", 36110),
            ]
            .iter()
            .map(|(c, p, r)| vec![Value::from(*c), Value::from(*p), Value::Int(*r)])
            .collect(),
        ),
        table(
            &[("city", "VARCHAR"), ("total_profit", "NUMERIC")],
            text_float(&[
                ("New York City", 62036.98),
                ("Los Angeles", 30440.76),
                ("Seattle", 29156.1),
                ("San Francisco", 17507.39),
                ("Detroit", 13181.79),
            ]),
        ),
        table(
            &[("category", "VARCHAR"), ("total_discount", "INT4")],
            text_int(&[
                ("Furniture", 178043),
                ("Office Supplies", 121563),
                ("Technology", 195214),
            ]),
        ),
        table(
            &[("category", "VARCHAR"), ("avg_sale_price", "FLOAT4")],
            text_float(&[
                ("Technology", 452.71),
                ("Furniture", 349.83),
                ("Office Supplies", 119.32),
            ]),
        ),
        table(
            &[("region", "VARCHAR"), ("avg_sale_price", "FLOAT4")],
            text_float(&[
                ("West", 243.63),
                ("South", 241.8),
                ("East", 238.34),
                ("Central", 215.77),
            ]),
        ),
        table(
            &[("category", "VARCHAR"), ("total_profit", "FLOAT4")],
            text_float(&[
                ("Furniture", 127350.5),
                ("Office Supplies", 180456.2),
                ("Technology", 215360.8),
            ]),
        ),
        table(
            &[
                ("category", "VARCHAR"),
                ("segment", "VARCHAR"),
                ("highest_quantity_orders", "INT8"),
            ],
            [
                ("Office Supplies", "Consumer", 11758),
                ("Office Supplies", "Corporate", 6937),
                ("Furniture", "Consumer", 4166),
            ]
            .iter()
            .map(|(c, s, q)| vec![Value::from(*c), Value::from(*s), Value::Int(*q)])
            .collect(),
        ),
        table(
            &[("region", "VARCHAR"), ("avg_discount_percentage", "NUMERIC")],
            text_float(&[
                ("Central", 3.5128205128205128),
                ("East", 3.4713375796178344),
                ("South", 3.5233160621761658),
                ("West", 3.4977578475336323),
            ]),
        ),
        table(
            &[("category", "VARCHAR"), ("total_profit", "NUMERIC")],
            text_float(&[("Technology", 215360.8)]),
        ),
        table(
            &[("year", "NUMERIC"), ("total_revenue", "INT4")],
            float_int(&[(2022.0, 10989540), (2023.0, 11275110)]),
        ),
    ];

    let own_results = vec![
        table(
            &[
                ("region", "VARCHAR"),
                ("category", "VARCHAR"),
                ("total_sales", "INT4"),
            ],
            [
                ("West", "Technology", 1675430),
                ("East", "Technology", 1562780),
                ("West", "Furniture", 1484120),
                ("East", "Furniture", 1373950),
                ("Central", "Technology", 1327460),
                ("West", "Office Supplies", 1256310),
                ("South", "Technology", 1108870),
                ("East", "Office Supplies", 1097640),
                ("Central", "Furniture", 1011250),
                ("Central", "Office Supplies", 893470),
            ]
            .iter()
            .map(|(r, c, t)| vec![Value::from(*r), Value::from(*c), Value::Int(*t)])
            .collect(),
        ),
        table(
            &[("month", "NUMERIC"), ("total_revenue", "INT4")],
            float_int(&[
                (1.0, 1753460),
                (2.0, 1442890),
                (3.0, 1920530),
                (4.0, 1689120),
                (5.0, 1861470),
                (6.0, 1798340),
                (7.0, 1745120),
                (8.0, 1902660),
                (9.0, 2210980),
                (10.0, 2047310),
                (11.0, 2478390),
                (12.0, 2414380),
            ]),
        ),
        table(
            &[("category", "VARCHAR"), ("top_sales", "INT8")],
            text_int(&[
                ("Office Supplies", 22906),
                ("Furniture", 8028),
                ("Technology", 6939),
            ]),
        ),
        table(
            &[("year", "NUMERIC"), ("total_profit", "INT4")],
            float_int(&[(2023.0, 265310), (2022.0, 257857)]),
        ),
        table(
            &[("region", "VARCHAR"), ("order_count", "INT8")],
            text_int(&[
                ("South", 6209),
                ("West", 12266),
                ("Central", 8780),
                ("East", 10618),
            ]),
        ),
        table(
            &[("category", "VARCHAR"), ("discount_percent", "INT4")],
            text_int(&[
                ("Furniture", 4),
                ("Office Supplies", 4),
                ("Technology", 4),
                ("Furniture", 5),
                ("Office Supplies", 5),
                ("Technology", 5),
            ]),
        ),
        table(
            &[("sub_category", "VARCHAR"), ("total_revenue", "INT4")],
            text_int(&[
                ("Fasteners", 2937),
                ("Labels", 12182),
                ("Envelopes", 15969),
                ("Art", 26172),
                ("Supplies", 45296),
                ("Paper", 76380),
                ("Furnishings", 90440),
            ]),
        ),
        table(
            &[("order_id", "INT4"), ("total_revenue", "INT4")],
            [
                (8153, 23150),
                (2698, 22640),
                (9040, 20890),
                (6827, 18930),
                (510, 17420),
                (1450, 16150),
                (4191, 15870),
                (2624, 14910),
                (7773, 14460),
                (4278, 13920),
            ]
            .iter()
            .map(|(o, r)| vec![Value::Int(*o), Value::Int(*r)])
            .collect(),
        ),
        table(
            &[("month", "NUMERIC"), ("discount_amount", "INT4")],
            float_int(&[
                (1.0, 37120),
                (2.0, 30580),
                (3.0, 40710),
                (4.0, 35840),
                (5.0, 39460),
                (6.0, 38120),
                (7.0, 36990),
                (8.0, 40350),
                (9.0, 46880),
                (10.0, 43410),
                (11.0, 52540),
                (12.0, 51190),
            ]),
        ),
        table(
            &[("region", "VARCHAR"), ("avg_discount_percent", "NUMERIC")],
            text_float(&[
                ("Central", 3.51),
                ("East", 3.47),
                ("South", 3.52),
                ("West", 3.5),
            ]),
        ),
        table(
            &[("region", "VARCHAR"), ("avg_sale_price", "FLOAT4")],
            text_float(&[("West", 243.63)]),
        ),
    ];

    guvi.entries()
        .iter()
        .zip(guvi_results)
        .chain(own.entries().iter().zip(own_results))
        .map(|(entry, result)| (entry.sql, result))
        .collect()
}
