//! Selection controller.
//!
//! Walks the user through three choices: a catalog, a query within it, and
//! a chart for the result. Selecting a query runs it straight away; the chart
//! choice only opens up when that produced rows.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::{Catalog, CatalogEntry, CatalogId};
use crate::db::{ConnectionProvider, DatabaseClient, QueryResult};
use crate::error::{DashError, Result};
use crate::export::{export_file_name, to_csv, CsvExport};
use crate::notice::Notices;
use crate::query::run_query;
use crate::render::{ChartKind, Dispatcher, Figure};
use tracing::debug;

/// Where the user is in the selection flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CatalogChoice,
    QueryChoice,
    ChartChoice,
    /// No database connection; nothing else can happen.
    Halted,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::CatalogChoice => "catalog",
            Stage::QueryChoice => "query",
            Stage::ChartChoice => "chart",
            Stage::Halted => "halted",
        }
    }
}

/// State of one dashboard session.
pub struct Session {
    provider: Arc<ConnectionProvider>,
    client: Option<Arc<dyn DatabaseClient>>,
    dispatcher: Dispatcher,
    notices: Notices,
    stage: Stage,
    catalog: Option<CatalogId>,
    query: Option<usize>,
    result: QueryResult,
    chart: Option<ChartKind>,
    figure: Option<Figure>,
}

impl Session {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self {
            provider,
            client: None,
            dispatcher: Dispatcher::standard(),
            notices: Notices::new(),
            stage: Stage::CatalogChoice,
            catalog: None,
            query: None,
            result: QueryResult::new(),
            chart: None,
            figure: None,
        }
    }

    /// Connects up front. Returns false, and halts, when no connection can
    /// be made.
    pub async fn start(&mut self) -> bool {
        self.connection().await.is_some()
    }

    async fn connection(&mut self) -> Option<Arc<dyn DatabaseClient>> {
        if self.client.is_none() && self.stage != Stage::Halted {
            self.client = self.provider.get_connection(&mut self.notices).await;
            if self.client.is_none() {
                self.stage = Stage::Halted;
            }
        }
        self.client.clone()
    }

    /// Switches catalogs. The query, its result and any chart are cleared.
    pub fn select_catalog(&mut self, id: CatalogId) {
        if self.is_halted() {
            return;
        }
        debug!("Catalog selected: {}", id);
        self.catalog = Some(id);
        self.query = None;
        self.result = QueryResult::new();
        self.clear_chart();
        self.stage = Stage::QueryChoice;
    }

    /// Selects and immediately runs the query at `index` in the current
    /// catalog. Returns false if there was nothing to run.
    pub async fn select_query(&mut self, index: usize) -> bool {
        let Some(entry) = self.current_catalog().and_then(|c| c.get(index)) else {
            return false;
        };
        let Some(client) = self.connection().await else {
            return false;
        };

        debug!("Running query: {}", entry.label);
        self.query = Some(index);
        self.clear_chart();
        self.result = run_query(client.as_ref(), entry.sql, &mut self.notices).await;

        if self.result.is_empty() {
            self.notices.info("No data returned for this query.");
            self.stage = Stage::QueryChoice;
        } else {
            self.stage = Stage::ChartChoice;
        }
        true
    }

    /// Renders the current result as `kind`. Ignored until a query has
    /// produced rows; shapes that cannot be drawn raise a warning.
    pub fn select_chart(&mut self, kind: ChartKind) -> bool {
        if self.stage != Stage::ChartChoice {
            return false;
        }

        self.chart = Some(kind);
        match self.dispatcher.render(&self.result, kind) {
            Ok(figure) => self.figure = Some(figure),
            Err(issue) => {
                self.figure = None;
                self.notices.warn(issue.to_string());
            }
        }
        true
    }

    /// Encodes the current result for download.
    pub fn export(&self) -> Result<CsvExport> {
        let (Some(entry), false) = (self.current_entry(), self.result.is_empty()) else {
            return Err(DashError::export("No query result to export"));
        };

        Ok(CsvExport {
            file_name: export_file_name(entry.label),
            bytes: to_csv(&self.result)?,
        })
    }

    /// Writes the current result into `dir`, reporting the outcome as a
    /// notice.
    pub fn save_export(&mut self, dir: &Path) -> Option<PathBuf> {
        match self.export().and_then(|export| export.save(dir)) {
            Ok(path) => {
                self.notices.info(format!("Saved {}", path.display()));
                Some(path)
            }
            Err(e) => {
                self.notices.error(e.to_string());
                None
            }
        }
    }

    fn clear_chart(&mut self) {
        self.chart = None;
        self.figure = None;
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_halted(&self) -> bool {
        self.stage == Stage::Halted
    }

    pub fn catalog_id(&self) -> Option<CatalogId> {
        self.catalog
    }

    pub fn current_catalog(&self) -> Option<Catalog> {
        self.catalog.map(CatalogId::catalog)
    }

    pub fn query_index(&self) -> Option<usize> {
        self.query
    }

    pub fn current_entry(&self) -> Option<&'static CatalogEntry> {
        self.current_catalog()?.get(self.query?)
    }

    pub fn result(&self) -> &QueryResult {
        &self.result
    }

    pub fn chart(&self) -> Option<ChartKind> {
        self.chart
    }

    pub fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref()
    }

    pub fn chart_kinds(&self) -> Vec<ChartKind> {
        self.dispatcher.kinds()
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Display-safe description of the database target.
    pub fn target(&self) -> String {
        self.provider.describe()
    }
}
