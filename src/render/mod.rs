//! Render dispatcher.
//!
//! Maps a [`ChartKind`] to the strategy that turns a result table into a
//! [`Figure`]. Strategies never panic on awkward tables; every shape they
//! cannot draw comes back as a [`RenderIssue`].

mod figure;
mod stats;
mod strategies;

pub use figure::{compact_number, Bin, BoxSummary, Figure, Series, SeriesStyle, Slice};

use crate::db::QueryResult;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use strategies::{
    BoxPlotStrategy, HeatmapStrategy, HistogramStrategy, PieStrategy, ScatterStrategy,
    SeriesStrategy,
};
use thiserror::Error;

/// The chart kinds offered in the chart selector, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ChartKind {
    Line,
    Bar,
    Area,
    Scatter,
    Pie,
    Histogram,
    BoxPlot,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 8] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Area,
        ChartKind::Scatter,
        ChartKind::Pie,
        ChartKind::Histogram,
        ChartKind::BoxPlot,
        ChartKind::Heatmap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Area => "Area Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Histogram => "Histogram",
            ChartKind::BoxPlot => "Box Plot",
            ChartKind::Heatmap => "Heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a table could not be drawn as the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderIssue {
    #[error("No data to plot.")]
    EmptyTable,

    #[error("{kind} needs at least {required} columns.")]
    TooFewColumns { kind: ChartKind, required: usize },

    #[error("No numeric columns to plot.")]
    NoNumericSeries,

    #[error("Column '{0}' has no numeric values to plot.")]
    NoNumericValues(String),

    #[error("Not enough numeric columns for Heatmap.")]
    NotEnoughNumericColumns,

    #[error("{0} is not available.")]
    Unregistered(ChartKind),
}

/// Turns a result table into one kind of figure.
pub trait ChartStrategy: Send + Sync {
    fn render(&self, table: &QueryResult) -> Result<Figure, RenderIssue>;
}

/// Lookup from chart kind to strategy.
pub struct Dispatcher {
    strategies: BTreeMap<ChartKind, Box<dyn ChartStrategy>>,
}

impl Dispatcher {
    /// A dispatcher with nothing registered.
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// A dispatcher with one strategy for every [`ChartKind`].
    pub fn standard() -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.register(ChartKind::Line, SeriesStrategy::new(SeriesStyle::Line));
        dispatcher.register(ChartKind::Bar, SeriesStrategy::new(SeriesStyle::Bar));
        dispatcher.register(ChartKind::Area, SeriesStrategy::new(SeriesStyle::Area));
        dispatcher.register(ChartKind::Scatter, ScatterStrategy);
        dispatcher.register(ChartKind::Pie, PieStrategy);
        dispatcher.register(ChartKind::Histogram, HistogramStrategy);
        dispatcher.register(ChartKind::BoxPlot, BoxPlotStrategy);
        dispatcher.register(ChartKind::Heatmap, HeatmapStrategy);
        dispatcher
    }

    pub fn register(&mut self, kind: ChartKind, strategy: impl ChartStrategy + 'static) {
        self.strategies.insert(kind, Box::new(strategy));
    }

    /// Registered kinds in display order.
    pub fn kinds(&self) -> Vec<ChartKind> {
        self.strategies.keys().copied().collect()
    }

    pub fn render(&self, table: &QueryResult, kind: ChartKind) -> Result<Figure, RenderIssue> {
        if table.is_empty() {
            return Err(RenderIssue::EmptyTable);
        }
        self.strategies
            .get(&kind)
            .ok_or(RenderIssue::Unregistered(kind))?
            .render(table)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::standard()
    }
}
