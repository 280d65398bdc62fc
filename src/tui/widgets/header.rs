//! Header widget for the TUI.
//!
//! Displays the dashboard title, version, and database target.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    target: &'a str,
    is_connected: bool,
    is_processing: bool,
}

impl<'a> Header<'a> {
    /// Creates a new header widget.
    pub fn new(target: &'a str, is_connected: bool, is_processing: bool) -> Self {
        Self {
            target,
            is_connected,
            is_processing,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(
            " Retail Order Data Analyst v{}",
            env!("CARGO_PKG_VERSION")
        );
        buf.set_span(area.x, area.y, &Span::styled(left_text, style), area.width);

        if self.is_processing {
            let text = "running query...";
            let busy_style = style.fg(Color::Yellow);
            let x = area.x + area.width.saturating_sub(text.len() as u16) / 2;
            buf.set_string(x, area.y, text, busy_style);
        }

        // Right side: connection status dot and target
        let status_dot = if self.is_connected { "●" } else { "○" };
        let status_color = if self.is_connected {
            Color::Green
        } else {
            Color::Gray
        };
        let db_text = format!(" [db: {}] ", self.target);
        let right_width = db_text.chars().count() as u16 + 2;
        if right_width < area.width {
            let right_x = area.right().saturating_sub(right_width);
            buf.set_string(right_x, area.y, " ", style);
            buf.set_string(
                right_x + 1,
                area.y,
                status_dot,
                Style::default().bg(Color::Blue).fg(status_color),
            );
            buf.set_string(right_x + 2, area.y, &db_text, style);
        }
    }
}
