//! Query catalogs.
//!
//! Two fixed, ordered tables of labelled aggregate queries over the
//! `order_details` and `sales_details` tables. The SQL is literal text;
//! nothing here is templated or mutated at runtime.

mod guard;

pub use guard::{check_read_only, StatementGuard, Verdict};

use std::fmt;

/// A labelled SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub label: &'static str,
    pub sql: &'static str,
}

/// Identifies one of the two catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CatalogId {
    #[default]
    Guvi,
    Own,
}

impl CatalogId {
    /// Both catalogs, in menu order.
    pub const ALL: [CatalogId; 2] = [CatalogId::Guvi, CatalogId::Own];

    /// Menu title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Guvi => "Guvi Queries",
            Self::Own => "Own Queries",
        }
    }

    /// Returns the catalog for this id.
    pub fn catalog(self) -> Catalog {
        match self {
            Self::Guvi => Catalog::new(self, GUVI_QUERIES),
            Self::Own => Catalog::new(self, OWN_QUERIES),
        }
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// An ordered, immutable view over one catalog's entries.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    id: CatalogId,
    entries: &'static [CatalogEntry],
}

impl Catalog {
    const fn new(id: CatalogId, entries: &'static [CatalogEntry]) -> Self {
        Self { id, entries }
    }

    pub fn id(&self) -> CatalogId {
        self.id
    }

    pub fn entries(&self) -> &'static [CatalogEntry] {
        self.entries
    }

    /// Labels in declaration order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.label).collect()
    }

    /// Looks up the SQL for a label.
    pub fn lookup(&self, label: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.sql)
    }

    pub fn get(&self, index: usize) -> Option<&'static CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static GUVI_QUERIES: &[CatalogEntry] = &[
    CatalogEntry {
        label: "1. Find top 10 highest revenue generating products",
        sql: "
        SELECT o.category, s.product_id, CAST(SUM(s.sale_price * s.quantity) AS INT) AS total_revenue
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.category, s.product_id
        ORDER BY total_revenue DESC LIMIT 10;
    ",
    },
    CatalogEntry {
        label: "2. Find the top 5 cities with the highest profit margins",
        sql: "
        SELECT o.city, SUM(s.profit) AS total_profit
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.city
        ORDER BY total_profit DESC LIMIT 5;
    ",
    },
    CatalogEntry {
        label: "3. Calculate the total discount given for each category",
        sql: "
        SELECT o.category, CAST(SUM(s.discount * s.quantity) AS INT) AS total_discount
        FROM order_details AS o
        JOIN sales_details AS s ON s.order_id = o.order_id
        GROUP BY o.category;
    ",
    },
    CatalogEntry {
        label: "4. Find the average sale price per product category",
        sql: "
        SELECT o.category, CAST(AVG(s.sale_price) AS REAL) AS avg_sale_price
        FROM order_details AS o
        JOIN sales_details AS s ON s.order_id = o.order_id
        GROUP BY o.category ORDER BY avg_sale_price DESC;
    ",
    },
    CatalogEntry {
        label: "5. Find the region with the highest average sale price",
        sql: "
        SELECT o.region, CAST(AVG(s.sale_price) AS REAL) AS avg_sale_price
        FROM order_details AS o
        JOIN sales_details AS s ON s.order_id = o.order_id
        GROUP BY o.region ORDER BY avg_sale_price DESC;
    ",
    },
    CatalogEntry {
        label: "6. Find the total profit per category",
        sql: "
        SELECT o.category, CAST(SUM(s.profit) AS REAL) AS total_profit
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.category;
    ",
    },
    CatalogEntry {
        label: "7. Identify the top 3 segments with the highest quantity of orders",
        sql: "
        SELECT o.category, o.segment, SUM(s.quantity) AS highest_quantity_orders
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.segment, o.category
        ORDER BY highest_quantity_orders DESC LIMIT 3;
    ",
    },
    CatalogEntry {
        label: "8. Determine the average discount percentage given per region",
        sql: "
        SELECT o.region, AVG(s.discount_percent) AS avg_discount_percentage
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.region;
    ",
    },
    CatalogEntry {
        label: "9. Find the product category with the highest total profit",
        sql: "
        SELECT o.category, SUM(s.profit) AS total_profit
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.category
        ORDER BY total_profit DESC LIMIT 1;
    ",
    },
    CatalogEntry {
        label: "10. Calculate the total revenue generated per year",
        sql: "
        SELECT EXTRACT(YEAR FROM o.order_date) AS year, CAST(SUM(s.sale_price * s.quantity) AS INT) AS total_revenue
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY year ORDER BY year;
    ",
    },
];

static OWN_QUERIES: &[CatalogEntry] = &[
    CatalogEntry {
        label: "1. Identify the top-selling product in each region",
        sql: "
        SELECT o.region, o.category, CAST(SUM(s.quantity * s.sale_price) AS INT) AS total_sales
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY region, category
        ORDER BY total_sales DESC LIMIT 10;
    ",
    },
    CatalogEntry {
        label: "2. Calculate the total revenue generated per month",
        sql: "
        SELECT EXTRACT(MONTH FROM o.order_date) AS month, CAST(SUM(s.sale_price * s.quantity) AS INT) AS total_revenue
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY month ORDER BY month;
    ",
    },
    CatalogEntry {
        label: "3. Find the Top-Selling Products by Category",
        sql: "
        SELECT o.category, SUM(s.quantity) AS top_sales
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.category ORDER BY top_sales DESC;
    ",
    },
    CatalogEntry {
        label: "4. Find the Yearly Profit Analysis",
        sql: "
        SELECT EXTRACT(YEAR FROM o.order_date) AS year, CAST(SUM(s.profit) AS INT) AS total_profit
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY year;
    ",
    },
    CatalogEntry {
        label: "5. Calculate Order Count by Region",
        sql: "
        SELECT o.region, SUM(s.quantity) AS order_count
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.region;
    ",
    },
    CatalogEntry {
        label: "6. What Are Products with Discounts Above 3%",
        sql: "
        SELECT o.category, s.discount_percent
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        WHERE s.discount_percent > 3 AND s.discount_percent IS NOT NULL
        GROUP BY s.discount_percent, o.category ORDER BY s.discount_percent;
    ",
    },
    CatalogEntry {
        label: "7. Find the Low-Revenue Products below 1 Lakh",
        sql: "
        SELECT o.sub_category, CAST(SUM(s.sale_price * s.quantity) AS INT) AS total_revenue
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.sub_category HAVING SUM(s.sale_price * s.quantity) < 100000 ORDER BY total_revenue ASC;
    ",
    },
    CatalogEntry {
        label: "8. Find the top 10 order_id who generated the highest total revenue",
        sql: "
        SELECT o.order_id, CAST(SUM(s.sale_price * s.quantity) AS INT) AS total_revenue
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.order_id
        ORDER BY total_revenue DESC LIMIT 10;
    ",
    },
    CatalogEntry {
        label: "9. Calculate the total amount of discount in all months",
        sql: "
        SELECT EXTRACT(MONTH FROM o.order_date) AS month, CAST(SUM(s.discount) AS INT) AS discount_amount
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY month
        ORDER BY month;
    ",
    },
    CatalogEntry {
        label: "10. Calculate the average discount percentage for each region",
        sql: "
        SELECT o.region, ROUND(AVG(s.discount_percent), 2) AS avg_discount_percent
        FROM sales_details AS s
        JOIN order_details AS o ON o.order_id = s.order_id
        GROUP BY o.region;
    ",
    },
    CatalogEntry {
        label: "11. Find the region with the highest average sale price",
        sql: "
        SELECT o.region, CAST(AVG(s.sale_price) AS REAL) AS avg_sale_price
        FROM order_details AS o
        JOIN sales_details AS s ON s.order_id = o.order_id
        GROUP BY o.region
        ORDER BY avg_sale_price DESC LIMIT 1;
    ",
    },
];
