//! One rendering strategy per chart kind.
//!
//! Column 0 is the key/category column and column 1 the primary value
//! column; strategies rely on that positional contract.

use super::figure::{Bin, BoxSummary, Figure, Series, SeriesStyle, Slice};
use super::stats;
use super::{ChartKind, ChartStrategy, RenderIssue};
use crate::db::{QueryResult, Value};

fn require_columns(table: &QueryResult, kind: ChartKind, required: usize) -> Result<(), RenderIssue> {
    if table.columns.len() < required {
        return Err(RenderIssue::TooFewColumns { kind, required });
    }
    Ok(())
}

fn column_name(table: &QueryResult, index: usize) -> String {
    table
        .columns
        .get(index)
        .map(|c| c.name.clone())
        .unwrap_or_default()
}

fn labels(table: &QueryResult, index: usize) -> Vec<String> {
    table
        .column_values(index)
        .map(Value::to_display_string)
        .collect()
}

fn numbers(table: &QueryResult, index: usize) -> Vec<Option<f64>> {
    table.column_values(index).map(Value::as_f64).collect()
}

/// Groups values of `value_index` by the display text of `key_index`,
/// keeping first-seen key order.
fn grouped(table: &QueryResult, key_index: usize, value_index: usize) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (key, value) in labels(table, key_index)
        .into_iter()
        .zip(numbers(table, value_index))
    {
        let Some(value) = value else { continue };
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => groups.push((key, vec![value])),
        }
    }
    groups
}

fn require_numeric(table: &QueryResult, index: usize) -> Result<(), RenderIssue> {
    if !table.column_type(index).is_numeric() {
        return Err(RenderIssue::NoNumericValues(column_name(table, index)));
    }
    Ok(())
}

/// Line, bar and area charts: categories from column 0, one series per
/// numeric column after it.
pub struct SeriesStrategy {
    style: SeriesStyle,
}

impl SeriesStrategy {
    pub fn new(style: SeriesStyle) -> Self {
        Self { style }
    }

    fn kind(&self) -> ChartKind {
        match self.style {
            SeriesStyle::Line => ChartKind::Line,
            SeriesStyle::Bar => ChartKind::Bar,
            SeriesStyle::Area => ChartKind::Area,
        }
    }
}

impl ChartStrategy for SeriesStrategy {
    fn render(&self, table: &QueryResult) -> Result<Figure, RenderIssue> {
        require_columns(table, self.kind(), 2)?;

        let series: Vec<Series> = (1..table.columns.len())
            .filter(|&i| table.column_type(i).is_numeric())
            .map(|i| Series {
                name: column_name(table, i),
                values: numbers(table, i),
            })
            .collect();

        if series.is_empty() {
            return Err(RenderIssue::NoNumericSeries);
        }

        Ok(Figure::Series {
            style: self.style,
            x_label: column_name(table, 0),
            categories: labels(table, 0),
            series,
        })
    }
}

pub struct ScatterStrategy;

impl ChartStrategy for ScatterStrategy {
    fn render(&self, table: &QueryResult) -> Result<Figure, RenderIssue> {
        require_columns(table, ChartKind::Scatter, 2)?;
        require_numeric(table, 1)?;

        let ys = numbers(table, 1);
        let numeric_x = table.column_type(0).is_numeric();

        let (points, categories) = if numeric_x {
            let points = numbers(table, 0)
                .into_iter()
                .zip(ys)
                .filter_map(|(x, y)| Some((x?, y?)))
                .collect();
            (points, None)
        } else {
            let points = ys
                .into_iter()
                .enumerate()
                .filter_map(|(i, y)| Some((i as f64, y?)))
                .collect();
            (points, Some(labels(table, 0)))
        };

        Ok(Figure::Scatter {
            x_label: column_name(table, 0),
            y_label: column_name(table, 1),
            points,
            categories,
        })
    }
}

/// Names from column 0, values from column 1. Repeated names are summed and
/// slices that are not positive are left out.
pub struct PieStrategy;

impl ChartStrategy for PieStrategy {
    fn render(&self, table: &QueryResult) -> Result<Figure, RenderIssue> {
        require_columns(table, ChartKind::Pie, 2)?;
        require_numeric(table, 1)?;

        let slices: Vec<Slice> = grouped(table, 0, 1)
            .into_iter()
            .map(|(label, values)| Slice {
                label,
                value: values.iter().sum(),
            })
            .filter(|slice| slice.value > 0.0)
            .collect();

        if slices.is_empty() {
            return Err(RenderIssue::NoNumericValues(column_name(table, 1)));
        }

        Ok(Figure::Pie {
            value_label: column_name(table, 1),
            slices,
        })
    }
}

/// Distribution of column 1: equal-width bins for numbers, a count per
/// distinct value for text.
pub struct HistogramStrategy;

impl ChartStrategy for HistogramStrategy {
    fn render(&self, table: &QueryResult) -> Result<Figure, RenderIssue> {
        require_columns(table, ChartKind::Histogram, 2)?;

        let bins = if table.column_type(1).is_numeric() {
            let values: Vec<f64> = numbers(table, 1).into_iter().flatten().collect();
            stats::equal_width_bins(&values)
                .into_iter()
                .map(|(start, end, count)| Bin {
                    label: if start == end {
                        super::compact_number(start)
                    } else {
                        format!(
                            "{}-{}",
                            super::compact_number(start),
                            super::compact_number(end)
                        )
                    },
                    count,
                })
                .collect()
        } else {
            let mut bins: Vec<Bin> = Vec::new();
            for value in table.column_values(1).filter(|v| !v.is_null()) {
                let label = value.to_display_string();
                match bins.iter_mut().find(|b| b.label == label) {
                    Some(bin) => bin.count += 1,
                    None => bins.push(Bin { label, count: 1 }),
                }
            }
            bins
        };

        if bins.is_empty() {
            return Err(RenderIssue::NoNumericValues(column_name(table, 1)));
        }

        Ok(Figure::Histogram {
            column: column_name(table, 1),
            bins,
        })
    }
}

/// Column 1 summarized per distinct value of column 0.
pub struct BoxPlotStrategy;

impl ChartStrategy for BoxPlotStrategy {
    fn render(&self, table: &QueryResult) -> Result<Figure, RenderIssue> {
        require_columns(table, ChartKind::BoxPlot, 2)?;
        require_numeric(table, 1)?;

        let boxes: Vec<BoxSummary> = grouped(table, 0, 1)
            .into_iter()
            .filter_map(|(group, values)| {
                let [min, q1, median, q3, max] = stats::five_number_summary(&values)?;
                Some(BoxSummary {
                    group,
                    min,
                    q1,
                    median,
                    q3,
                    max,
                })
            })
            .collect();

        if boxes.is_empty() {
            return Err(RenderIssue::NoNumericValues(column_name(table, 1)));
        }

        Ok(Figure::BoxPlot {
            group_label: column_name(table, 0),
            value_label: column_name(table, 1),
            boxes,
        })
    }
}

/// Pairwise correlation of the numeric columns.
pub struct HeatmapStrategy;

impl ChartStrategy for HeatmapStrategy {
    fn render(&self, table: &QueryResult) -> Result<Figure, RenderIssue> {
        let numeric = table.numeric_columns();
        if numeric.len() < 2 {
            return Err(RenderIssue::NotEnoughNumericColumns);
        }

        let data: Vec<Vec<Option<f64>>> = numeric.iter().map(|&i| numbers(table, i)).collect();
        let matrix = data
            .iter()
            .map(|xs| data.iter().map(|ys| stats::pearson(xs, ys)).collect())
            .collect();

        Ok(Figure::Heatmap {
            columns: numeric.iter().map(|&i| column_name(table, i)).collect(),
            matrix,
        })
    }
}
