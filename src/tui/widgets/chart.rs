//! Chart widget for the TUI.
//!
//! Draws a [`Figure`] with ratatui's chart, bar chart and canvas widgets.
//! Heatmaps are painted cell by cell.

use crate::render::{compact_number, BoxSummary, Figure, Series, SeriesStyle, Slice};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{self, Canvas, Rectangle},
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
        Widget, Wrap,
    },
};
use std::f64::consts::{FRAC_PI_2, TAU};

const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
];

/// Longest category label drawn under an axis.
const MAX_LABEL_WIDTH: usize = 14;

/// Points used to fill the area under an area chart.
const AREA_SAMPLES: usize = 240;

const NEGATIVE_COLOR: Color = Color::Red;

const NEGATIVE_NOTE: &str = "red bars are negative, drawn by magnitude";

fn color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

fn short(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_WIDTH {
        label.to_string()
    } else {
        let kept: String = label.chars().take(MAX_LABEL_WIDTH - 1).collect();
        format!("{kept}…")
    }
}

/// Value bounds that include zero, padded so extremes are not on the border.
fn value_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo == hi {
        return [lo, lo + 1.0];
    }
    let pad = (hi - lo) * 0.05;
    [if lo < 0.0 { lo - pad } else { lo }, hi + pad]
}

fn bound_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::raw(compact_number(v)))
        .collect()
}

fn category_labels(categories: &[String]) -> Vec<Span<'static>> {
    match categories {
        [] => vec![],
        [only] => vec![Span::raw(short(only))],
        [first, .., last] if categories.len() == 2 => {
            vec![Span::raw(short(first)), Span::raw(short(last))]
        }
        _ => {
            let mid = &categories[categories.len() / 2];
            vec![
                Span::raw(short(&categories[0])),
                Span::raw(short(mid)),
                Span::raw(short(&categories[categories.len() - 1])),
            ]
        }
    }
}

/// Linear interpolation through `points` at evenly spaced x positions.
fn densify(points: &[(f64, f64)], samples: usize) -> Vec<(f64, f64)> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if points.len() < 2 || samples < 2 {
        return points.to_vec();
    }

    let step = (last.0 - first.0) / (samples - 1) as f64;
    let mut segment = 0;
    (0..samples)
        .map(|i| {
            let x = first.0 + step * i as f64;
            while segment + 2 < points.len() && x > points[segment + 1].0 {
                segment += 1;
            }
            let (x0, y0) = points[segment];
            let (x1, y1) = points[segment + 1];
            let t = if x1 == x0 { 0.0 } else { ((x - x0) / (x1 - x0)).clamp(0.0, 1.0) };
            (x, y0 + (y1 - y0) * t)
        })
        .collect()
}

/// Diverging blue to red scale for coefficients in `[-1, 1]`.
fn coolwarm(value: f64) -> Color {
    const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (MID, COOL, -v)
    } else {
        (MID, WARM, v)
    };
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    Color::Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Widget drawing the current figure, or a hint when there is none.
pub struct ChartView<'a> {
    figure: Option<&'a Figure>,
    title: String,
    placeholder: &'a str,
}

impl<'a> ChartView<'a> {
    pub fn new(figure: Option<&'a Figure>, title: impl Into<String>) -> Self {
        Self {
            figure,
            title: title.into(),
            placeholder: "",
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.title));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(figure) = self.figure else {
            Paragraph::new(Span::styled(
                self.placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            ))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
            return;
        };

        match figure {
            Figure::Series {
                style: SeriesStyle::Bar,
                categories,
                series,
                ..
            } => render_grouped_bars(categories, series, inner, buf),
            Figure::Series {
                style,
                x_label,
                categories,
                series,
            } => render_lines(*style, x_label, categories, series, inner, buf),
            Figure::Scatter {
                x_label,
                y_label,
                points,
                categories,
            } => render_scatter(x_label, y_label, points, categories.as_deref(), inner, buf),
            Figure::Pie { slices, .. } => render_pie(slices, inner, buf),
            Figure::Histogram { bins, .. } => {
                let bars: Vec<Bar> = bins
                    .iter()
                    .map(|bin| {
                        Bar::default()
                            .value(bin.count as u64)
                            .label(Line::from(short(&bin.label)))
                            .style(Style::default().fg(color(0)))
                    })
                    .collect();
                let width = bar_width(inner.width, bars.len(), 1);
                BarChart::default()
                    .bar_width(width)
                    .bar_gap(1)
                    .data(BarGroup::default().bars(&bars))
                    .render(inner, buf);
            }
            Figure::BoxPlot { boxes, .. } => render_box_plot(boxes, inner, buf),
            Figure::Heatmap { columns, matrix } => render_heatmap(columns, matrix, inner, buf),
        }
    }
}

/// Widest bar that fits `count` bars with `gap` columns between them.
fn bar_width(available: u16, count: usize, gap: u16) -> u16 {
    if count == 0 {
        return 1;
    }
    let count = count as u16;
    let usable = available.saturating_sub(gap.saturating_mul(count));
    (usable / count).clamp(1, 14)
}

fn render_grouped_bars(categories: &[String], series: &[Series], area: Rect, buf: &mut Buffer) {
    let values = || series.iter().flat_map(|s| s.values.iter().flatten());
    let max_abs = values().fold(0.0_f64, |m, v| m.max(v.abs()));
    // Bar heights are integers; small fractional values are scaled up so
    // close values still differ.
    let scale = if max_abs < 1000.0 { 100.0 } else { 1.0 };

    // Bars only grow upwards, so negatives are drawn by magnitude in red.
    let area = if values().any(|v| *v < 0.0) {
        let [bars, note] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .areas(area);
        Paragraph::new(Span::styled(
            NEGATIVE_NOTE,
            Style::default().fg(NEGATIVE_COLOR),
        ))
        .render(note, buf);
        bars
    } else {
        area
    };

    let groups: Vec<Vec<Bar>> = (0..categories.len())
        .map(|row| {
            series
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let value = s.values.get(row).copied().flatten().unwrap_or(0.0);
                    let fg = if value < 0.0 { NEGATIVE_COLOR } else { color(i) };
                    Bar::default()
                        .value((value.abs() * scale).round() as u64)
                        .text_value(compact_number(value))
                        .style(Style::default().fg(fg))
                })
                .collect()
        })
        .collect();

    let per_group = series.len().max(1);
    let width = bar_width(
        area.width.saturating_sub(2 * categories.len() as u16),
        categories.len() * per_group,
        0,
    );

    let mut chart = BarChart::default().bar_width(width).bar_gap(0).group_gap(2);
    for (label, bars) in categories.iter().zip(&groups) {
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(short(label)))
                .bars(bars),
        );
    }
    chart.render(area, buf);
}

fn render_lines(
    style: SeriesStyle,
    x_label: &str,
    categories: &[String],
    series: &[Series],
    area: Rect,
    buf: &mut Buffer,
) {
    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            s.values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
                .collect()
        })
        .collect();
    let fills: Vec<Vec<(f64, f64)>> = if style == SeriesStyle::Area {
        points.iter().map(|p| densify(p, AREA_SAMPLES)).collect()
    } else {
        Vec::new()
    };

    let mut datasets = Vec::new();
    for (i, (s, data)) in series.iter().zip(&points).enumerate() {
        if let Some(fill) = fills.get(i) {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Bar)
                    .style(Style::default().fg(color(i)).add_modifier(Modifier::DIM))
                    .data(fill),
            );
        }
        datasets.push(
            Dataset::default()
                .name(s.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color(i)))
                .data(data),
        );
    }

    let y_bounds = value_bounds(points.iter().flatten().map(|(_, y)| *y));
    let x_max = categories.len().saturating_sub(1).max(1) as f64;

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(x_label.to_string())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(category_labels(categories)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(bound_labels(y_bounds)),
        )
        .render(area, buf);
}

fn render_scatter(
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64)],
    categories: Option<&[String]>,
    area: Rect,
    buf: &mut Buffer,
) {
    let (x_bounds, x_labels) = match categories {
        Some(categories) => (
            [-0.5, categories.len() as f64 - 0.5],
            category_labels(categories),
        ),
        None => {
            let lo = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
            let hi = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
            let bounds = if lo.is_finite() && hi > lo {
                let pad = (hi - lo) * 0.05;
                [lo - pad, hi + pad]
            } else if lo.is_finite() {
                [lo - 1.0, lo + 1.0]
            } else {
                [0.0, 1.0]
            };
            (bounds, bound_labels(bounds))
        }
    };
    let y_bounds = value_bounds(points.iter().map(|p| p.1));

    let dataset = Dataset::default()
        .name(y_label.to_string())
        .marker(Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(color(0)))
        .data(points);

    Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .title(x_label.to_string())
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(bound_labels(y_bounds)),
        )
        .render(area, buf);
}

fn render_pie(slices: &[Slice], area: Rect, buf: &mut Buffer) {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        return;
    }

    // Terminal cells are about twice as tall as wide.
    let pie_width = (area.height * 2).min(area.width * 3 / 5);
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pie_width), Constraint::Min(10)])
        .split(area);

    let mut arcs = Vec::with_capacity(slices.len());
    let mut start = FRAC_PI_2;
    for (i, slice) in slices.iter().enumerate() {
        let sweep = slice.value / total * TAU;
        arcs.push((start, start - sweep, color(i)));
        start -= sweep;
    }

    Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.05, 1.05])
        .y_bounds([-1.05, 1.05])
        .paint(|ctx| {
            for &(from, to, color) in &arcs {
                let mut angle = from;
                while angle > to {
                    ctx.draw(&canvas::Line::new(0.0, 0.0, angle.cos(), angle.sin(), color));
                    angle -= 0.01;
                }
            }
        })
        .render(layout[0], buf);

    let legend: Vec<Line> = slices
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color(i))),
                Span::raw(format!(
                    "{} {:.1}%",
                    short(&slice.label),
                    slice.value / total * 100.0
                )),
            ])
        })
        .collect();
    Paragraph::new(legend).render(layout[1], buf);
}

fn render_box_plot(boxes: &[BoxSummary], area: Rect, buf: &mut Buffer) {
    let lo = boxes.iter().map(|b| b.min).fold(f64::INFINITY, f64::min);
    let hi = boxes.iter().map(|b| b.max).fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return;
    }
    let pad = if hi > lo { (hi - lo) * 0.1 } else { 1.0 };
    let y_bounds = [lo - pad * 2.0, hi + pad];

    Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-0.6, boxes.len() as f64 - 0.4])
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for (i, summary) in boxes.iter().enumerate() {
                let x = i as f64;
                let color = color(i);
                ctx.draw(&canvas::Line::new(x, summary.min, x, summary.q1, color));
                ctx.draw(&canvas::Line::new(x, summary.q3, x, summary.max, color));
                ctx.draw(&Rectangle {
                    x: x - 0.3,
                    y: summary.q1,
                    width: 0.6,
                    height: summary.q3 - summary.q1,
                    color,
                });
                ctx.draw(&canvas::Line::new(
                    x - 0.3,
                    summary.median,
                    x + 0.3,
                    summary.median,
                    Color::White,
                ));
            }
            ctx.layer();
            ctx.print(-0.6, hi, compact_number(hi));
            ctx.print(-0.6, lo, compact_number(lo));
            for (i, summary) in boxes.iter().enumerate() {
                ctx.print(i as f64 - 0.3, lo - pad * 1.5, short(&summary.group));
            }
        })
        .render(area, buf);
}

fn render_heatmap(columns: &[String], matrix: &[Vec<Option<f64>>], area: Rect, buf: &mut Buffer) {
    let label_width = columns
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH) as u16
        + 1;
    let count = columns.len().max(1) as u16;
    let cell_width = (area.width.saturating_sub(label_width) / count).clamp(5, 14);
    let cell_height = (area.height.saturating_sub(1) / count).clamp(1, 3);

    let header_style = Style::default().fg(Color::Gray);
    for (j, name) in columns.iter().enumerate() {
        let x = area.x + label_width + j as u16 * cell_width;
        if x >= area.right() {
            break;
        }
        let text: String = name.chars().take(cell_width as usize - 1).collect();
        buf.set_stringn(x, area.y, text, (area.right() - x) as usize, header_style);
    }

    for (i, row) in matrix.iter().enumerate() {
        let top = area.y + 1 + i as u16 * cell_height;
        if top >= area.bottom() {
            break;
        }
        buf.set_stringn(
            area.x,
            top + cell_height / 2,
            short(&columns[i]),
            label_width as usize - 1,
            header_style,
        );

        for (j, value) in row.iter().enumerate() {
            let left = area.x + label_width + j as u16 * cell_width;
            if left >= area.right() {
                break;
            }
            let width = cell_width.min(area.right() - left);
            let (bg, text) = match value {
                Some(v) => (coolwarm(*v), format!("{v:.2}")),
                None => (Color::DarkGray, "n/a".to_string()),
            };
            let style = Style::default().bg(bg).fg(Color::Black);

            for dy in 0..cell_height {
                let y = top + dy;
                if y >= area.bottom() {
                    break;
                }
                let content = if dy == cell_height / 2 {
                    format!("{text:^w$}", w = width as usize)
                } else {
                    " ".repeat(width as usize)
                };
                buf.set_stringn(left, y, content, width as usize, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Bin;
    use crate::tui::headless::screen_text;

    fn draw(figure: &Figure, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        ChartView::new(Some(figure), figure.kind().name()).render(area, &mut buf);
        screen_text(&buf)
    }

    #[test]
    fn test_value_bounds_include_zero() {
        assert_eq!(value_bounds([10.0, 20.0].into_iter())[0], 0.0);
        let [lo, hi] = value_bounds([-10.0, 10.0].into_iter());
        assert!(lo < -10.0 && hi > 10.0);
        assert_eq!(value_bounds(std::iter::empty()), [0.0, 1.0]);
    }

    #[test]
    fn test_densify_interpolates() {
        let dense = densify(&[(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)], 5);
        assert_eq!(dense.len(), 5);
        assert_eq!(dense[2], (1.0, 10.0));
        assert_eq!(dense[1], (0.5, 5.0));
        assert_eq!(dense[4], (2.0, 0.0));
    }

    #[test]
    fn test_coolwarm_endpoints() {
        assert_eq!(coolwarm(1.0), Color::Rgb(180, 4, 38));
        assert_eq!(coolwarm(-1.0), Color::Rgb(59, 76, 192));
        assert_eq!(coolwarm(0.0), Color::Rgb(221, 221, 221));
    }

    #[test]
    fn test_category_labels() {
        let categories: Vec<String> = ["East", "South", "West"].map(String::from).to_vec();
        let labels: Vec<String> = category_labels(&categories)
            .into_iter()
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(labels, vec!["East", "South", "West"]);
    }

    #[test]
    fn test_placeholder_without_figure() {
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        ChartView::new(None, "Chart")
            .placeholder("Pick a chart type")
            .render(area, &mut buf);
        assert!(screen_text(&buf).contains("Pick a chart type"));
    }

    #[test]
    fn test_bar_chart_shows_category_labels() {
        let figure = Figure::Series {
            style: SeriesStyle::Bar,
            x_label: "category".to_string(),
            categories: vec!["Furniture".into(), "Technology".into()],
            series: vec![Series {
                name: "total_discount".into(),
                values: vec![Some(178043.0), Some(195214.0)],
            }],
        };
        let screen = draw(&figure, 60, 16);
        assert!(screen.contains("Bar Chart"));
        assert!(screen.contains("Furniture"));
        assert!(screen.contains("Technology"));
    }

    #[test]
    fn test_negative_bars_keep_sign_and_note() {
        let figure = Figure::Series {
            style: SeriesStyle::Bar,
            x_label: "category".to_string(),
            categories: vec!["Furniture".into(), "Technology".into()],
            series: vec![Series {
                name: "total_profit".into(),
                values: vec![Some(-20_000.0), Some(30_000.0)],
            }],
        };
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        ChartView::new(Some(&figure), "Bar Chart").render(area, &mut buf);
        let screen = screen_text(&buf);

        assert!(screen.contains("-20k"));
        assert!(screen.contains("30k"));
        assert!(screen.contains(NEGATIVE_NOTE));

        let red_bar_cells = (area.top()..area.bottom())
            .flat_map(|y| (area.left()..area.right()).map(move |x| (x, y)))
            .filter_map(|pos| buf.cell(pos))
            .filter(|cell| cell.fg == NEGATIVE_COLOR && cell.symbol() == "█")
            .count();
        assert!(red_bar_cells > 0);
    }

    #[test]
    fn test_positive_bars_have_no_note() {
        let figure = Figure::Series {
            style: SeriesStyle::Bar,
            x_label: "region".to_string(),
            categories: vec!["East".into(), "West".into()],
            series: vec![Series {
                name: "order_count".into(),
                values: vec![Some(3.0), Some(4.0)],
            }],
        };
        assert!(!draw(&figure, 60, 16).contains(NEGATIVE_NOTE));
    }

    #[test]
    fn test_pie_legend_percentages() {
        let figure = Figure::Pie {
            value_label: "order_count".into(),
            slices: vec![
                Slice {
                    label: "West".into(),
                    value: 3.0,
                },
                Slice {
                    label: "East".into(),
                    value: 1.0,
                },
            ],
        };
        let screen = draw(&figure, 70, 14);
        assert!(screen.contains("West 75.0%"));
        assert!(screen.contains("East 25.0%"));
    }

    #[test]
    fn test_histogram_labels() {
        let figure = Figure::Histogram {
            column: "segment".into(),
            bins: vec![
                Bin {
                    label: "Consumer".into(),
                    count: 2,
                },
                Bin {
                    label: "Corporate".into(),
                    count: 1,
                },
            ],
        };
        let screen = draw(&figure, 50, 12);
        assert!(screen.contains("Histogram"));
        assert!(screen.contains("Consumer"));
    }

    #[test]
    fn test_heatmap_cells() {
        let figure = Figure::Heatmap {
            columns: vec!["order_id".into(), "total_revenue".into()],
            matrix: vec![vec![Some(1.0), Some(-0.25)], vec![Some(-0.25), None]],
        };
        let screen = draw(&figure, 60, 10);
        assert!(screen.contains("1.00"));
        assert!(screen.contains("-0.25"));
        assert!(screen.contains("n/a"));
        assert!(screen.contains("order_id"));
    }

    #[test]
    fn test_line_and_box_plot_render_without_panicking() {
        let line = Figure::Series {
            style: SeriesStyle::Area,
            x_label: "month".into(),
            categories: (1..=12).map(|m| format!("{m}.0")).collect(),
            series: vec![Series {
                name: "total_revenue".into(),
                values: (1..=12).map(|m| Some(f64::from(m) * 1000.0)).collect(),
            }],
        };
        assert!(draw(&line, 80, 20).contains("Area Chart"));

        let boxes = Figure::BoxPlot {
            group_label: "category".into(),
            value_label: "discount_percent".into(),
            boxes: vec![BoxSummary {
                group: "Furniture".into(),
                min: 4.0,
                q1: 4.25,
                median: 4.5,
                q3: 4.75,
                max: 5.0,
            }],
        };
        assert!(draw(&boxes, 60, 15).contains("Box Plot"));
    }
}
