//! Selector list widget.
//!
//! A bordered list of options with a cursor and a marker on the option that
//! is currently selected in the session.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct Selector<'a> {
    title: &'a str,
    items: Vec<String>,
    cursor: usize,
    selected: Option<usize>,
    focused: bool,
    placeholder: &'a str,
}

impl<'a> Selector<'a> {
    pub fn new(title: &'a str, items: Vec<String>) -> Self {
        Self {
            title,
            items,
            cursor: 0,
            selected: None,
            focused: false,
            placeholder: "",
        }
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Text shown when there are no items.
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// First item to draw so the cursor stays visible in `height` rows.
    fn scroll_offset(&self, height: usize) -> usize {
        if height == 0 || self.cursor < height {
            0
        } else {
            self.cursor + 1 - height
        }
    }

    fn item_line(&self, index: usize, item: &str) -> Line<'static> {
        let is_cursor = self.focused && index == self.cursor;
        let marker = if Some(index) == self.selected { "● " } else { "  " };

        let mut style = Style::default();
        if Some(index) == self.selected {
            style = style.fg(Color::Cyan);
        }
        if is_cursor {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }

        Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(item.to_string(), style),
        ])
    }
}

impl Widget for Selector<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", self.title));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.items.is_empty() {
            Paragraph::new(Span::styled(
                self.placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            ))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
            return;
        }

        let offset = self.scroll_offset(inner.height as usize);
        let lines: Vec<Line> = self
            .items
            .iter()
            .enumerate()
            .skip(offset)
            .take(inner.height as usize)
            .map(|(i, item)| self.item_line(i, item))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::headless::screen_text;

    fn items(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{i}. query")).collect()
    }

    #[test]
    fn test_scroll_keeps_cursor_visible() {
        let selector = Selector::new("Queries", items(11)).cursor(10);
        assert_eq!(selector.scroll_offset(4), 7);
        assert_eq!(selector.scroll_offset(20), 0);
    }

    #[test]
    fn test_render_marks_selection() {
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        Selector::new("Catalogs", vec!["Guvi Queries".into(), "Own Queries".into()])
            .selected(Some(1))
            .focused(true)
            .render(area, &mut buf);

        let screen = screen_text(&buf);
        assert!(screen.contains("Catalogs"));
        assert!(screen.contains("● Own Queries"));
        assert!(screen.contains("  Guvi Queries"));
    }

    #[test]
    fn test_placeholder_when_empty() {
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        Selector::new("Charts", vec![])
            .placeholder("Run a query first")
            .render(area, &mut buf);

        assert!(screen_text(&buf).contains("Run a query first"));
    }
}
