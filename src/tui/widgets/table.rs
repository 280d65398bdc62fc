//! Result table for the selected query.
//!
//! Numeric columns are right-aligned; NULLs are dimmed. The last line
//! reports the row count and how long the query took.

use crate::db::{QueryResult, Value};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Cell, Row, Table, Widget},
};

const MAX_COLUMN_WIDTH: u16 = 40;
const MIN_COLUMN_WIDTH: u16 = 4;
const COLUMN_SPACING: u16 = 2;

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub struct ResultTable<'a> {
    result: &'a QueryResult,
}

impl<'a> ResultTable<'a> {
    pub fn new(result: &'a QueryResult) -> Self {
        Self { result }
    }

    /// Widest value in each column, header included.
    fn column_widths(&self) -> Vec<u16> {
        self.result
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let widest = self
                    .result
                    .column_values(i)
                    .map(|value| value.to_display_string().chars().count())
                    .fold(column.name.chars().count(), usize::max);
                (widest.min(usize::from(MAX_COLUMN_WIDTH)) as u16).max(MIN_COLUMN_WIDTH)
            })
            .collect()
    }

    fn footer(&self, shown: usize) -> String {
        let total = self.result.row_count;
        let mut text = format!(
            "{total} row{} returned ({}ms)",
            if total == 1 { "" } else { "s" },
            self.result.execution_time.as_millis()
        );
        if shown < total {
            text.push_str(&format!(", first {shown} shown"));
        }
        text
    }
}

fn value_cell(value: &Value, numeric: bool) -> Cell<'static> {
    let line = Line::from(value.to_display_string());
    let line = if numeric { line.right_aligned() } else { line };
    let style = if value.is_null() {
        dim().add_modifier(Modifier::ITALIC)
    } else {
        Style::default()
    };
    Cell::from(line).style(style)
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.result.columns.is_empty() {
            Line::styled("No data returned for this query.", dim()).render(area, buf);
            return;
        }

        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let numeric: Vec<bool> = (0..self.result.columns.len())
            .map(|i| self.result.column_type(i).is_numeric())
            .collect();

        let header = Row::new(self.result.columns.iter().map(|c| Cell::from(c.name.as_str())))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        let rows = self.result.rows.iter().map(|row| {
            Row::new(
                row.iter()
                    .zip(&numeric)
                    .map(|(value, &is_numeric)| value_cell(value, is_numeric)),
            )
        });

        let widths = self.column_widths().into_iter().map(Constraint::Length);
        Table::new(rows, widths)
            .header(header)
            .column_spacing(COLUMN_SPACING)
            .render(body, buf);

        // One line goes to the header.
        let shown = usize::from(body.height.saturating_sub(1));
        Line::styled(self.footer(shown), dim()).render(footer, buf);
    }
}
