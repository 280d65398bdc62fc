//! Chart data produced by the render strategies.
//!
//! A [`Figure`] holds only plot-ready numbers and labels; drawing it is the
//! chart widget's job.

use super::ChartKind;
use serde::Serialize;

/// How a categorical series figure is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesStyle {
    Line,
    Bar,
    Area,
}

/// One named numeric series aligned to the figure's categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

/// One histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub label: String,
    pub count: usize,
}

/// Five-number summary of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub group: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// A chart ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Figure {
    /// Line, bar and area charts indexed by the key column.
    Series {
        style: SeriesStyle,
        x_label: String,
        categories: Vec<String>,
        series: Vec<Series>,
    },
    /// Points on two axes. When `categories` is set, x values are positions
    /// into it.
    Scatter {
        x_label: String,
        y_label: String,
        points: Vec<(f64, f64)>,
        categories: Option<Vec<String>>,
    },
    Pie {
        value_label: String,
        slices: Vec<Slice>,
    },
    Histogram {
        column: String,
        bins: Vec<Bin>,
    },
    BoxPlot {
        group_label: String,
        value_label: String,
        boxes: Vec<BoxSummary>,
    },
    /// Square correlation matrix; `None` where the coefficient is undefined.
    Heatmap {
        columns: Vec<String>,
        matrix: Vec<Vec<Option<f64>>>,
    },
}

impl Figure {
    pub fn kind(&self) -> ChartKind {
        match self {
            Figure::Series { style, .. } => match style {
                SeriesStyle::Line => ChartKind::Line,
                SeriesStyle::Bar => ChartKind::Bar,
                SeriesStyle::Area => ChartKind::Area,
            },
            Figure::Scatter { .. } => ChartKind::Scatter,
            Figure::Pie { .. } => ChartKind::Pie,
            Figure::Histogram { .. } => ChartKind::Histogram,
            Figure::BoxPlot { .. } => ChartKind::BoxPlot,
            Figure::Heatmap { .. } => ChartKind::Heatmap,
        }
    }
}

/// Short label for axis ticks: `1.2M`, `45.3k`, `3.51`.
pub fn compact_number(value: f64) -> String {
    let abs = value.abs();
    let text = if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    };
    text.replace(".0M", "M").replace(".0k", "k")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_number() {
        assert_eq!(compact_number(10_989_540.0), "11M");
        assert_eq!(compact_number(1_500_000.0), "1.5M");
        assert_eq!(compact_number(62_036.98), "62k");
        assert_eq!(compact_number(4166.0), "4166");
        assert_eq!(compact_number(3.5128), "3.51");
        assert_eq!(compact_number(-20_000.0), "-20k");
    }

    #[test]
    fn test_figure_kind() {
        let figure = Figure::Series {
            style: SeriesStyle::Area,
            x_label: "month".to_string(),
            categories: vec![],
            series: vec![],
        };
        assert_eq!(figure.kind(), ChartKind::Area);

        let figure = Figure::Pie {
            value_label: "order_count".to_string(),
            slices: vec![],
        };
        assert_eq!(figure.kind(), ChartKind::Pie);
    }
}
