//! Status line widget for the TUI.
//!
//! Shows the most recent notice, colored by level, and the key hints.

use crate::notice::{Notice, NoticeLevel};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const HINTS: &str = "Tab focus  ↑↓ move  Enter select  e export  q quit";

/// Single-row status line.
pub struct StatusLine<'a> {
    notice: Option<&'a Notice>,
}

impl<'a> StatusLine<'a> {
    pub fn new(notice: Option<&'a Notice>) -> Self {
        Self { notice }
    }

    fn level_style(level: NoticeLevel) -> Style {
        let color = match level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hint_width = HINTS.chars().count() as u16;
        let max_len = area.width.saturating_sub(hint_width + 2) as usize;

        let mut spans = Vec::new();
        if let Some(notice) = self.notice {
            let label = format!(" {} ", notice.level.label());
            let room = max_len.saturating_sub(label.chars().count() + 1);
            let message = if notice.message.chars().count() > room {
                let kept: String = notice.message.chars().take(room.saturating_sub(1)).collect();
                format!("{kept}…")
            } else {
                notice.message.clone()
            };
            spans.push(Span::styled(label, Self::level_style(notice.level)));
            spans.push(Span::raw(format!(" {message}")));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);

        if hint_width < area.width {
            buf.set_string(
                area.right() - hint_width,
                area.y,
                HINTS,
                Style::default().fg(Color::DarkGray),
            );
        }
    }
}
