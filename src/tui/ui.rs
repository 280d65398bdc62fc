//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, Focus};
use super::widgets::{chart, header, selector, status, table};
use crate::catalog::CatalogId;
use crate::session::Stage;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Width of the selector column.
const SELECTOR_WIDTH: u16 = 34;

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Main layout: header, content, status line
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(6),    // Content
            Constraint::Length(1), // Status
        ])
        .split(area);

    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SELECTOR_WIDTH), Constraint::Min(20)])
        .split(main_layout[1]);

    let selector_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Catalogs
            Constraint::Min(4),     // Queries
            Constraint::Length(10), // Charts
        ])
        .split(content_layout[0]);

    let output_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Min(5)])
        .split(content_layout[1]);

    render_header(frame, main_layout[0], app);
    render_catalogs(frame, selector_layout[0], app);
    render_queries(frame, selector_layout[1], app);
    render_charts(frame, selector_layout[2], app);
    render_results(frame, output_layout[0], app);
    render_chart(frame, output_layout[1], app);
    render_status(frame, main_layout[2], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let target = app.session.target();
    let widget = header::Header::new(&target, app.session.is_connected(), app.is_processing);
    frame.render_widget(widget, area);
}

fn render_catalogs(frame: &mut Frame, area: Rect, app: &App) {
    let items = CatalogId::ALL.iter().map(|id| id.title().to_string()).collect();
    let selected = app
        .session
        .catalog_id()
        .and_then(|id| CatalogId::ALL.iter().position(|c| *c == id));
    let widget = selector::Selector::new("Catalogs", items)
        .cursor(app.catalog_cursor)
        .selected(selected)
        .focused(app.focus == Focus::Catalogs);
    frame.render_widget(widget, area);
}

fn render_queries(frame: &mut Frame, area: Rect, app: &App) {
    let items = app
        .query_labels()
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{}. {label}", i + 1))
        .collect();
    let placeholder = if app.session.is_halted() {
        "No database connection."
    } else {
        "Choose a catalog first."
    };
    let widget = selector::Selector::new("Queries", items)
        .cursor(app.query_cursor)
        .selected(app.session.query_index())
        .focused(app.focus == Focus::Queries)
        .placeholder(placeholder);
    frame.render_widget(widget, area);
}

fn render_charts(frame: &mut Frame, area: Rect, app: &App) {
    let items = if app.session.stage() == Stage::ChartChoice {
        app.session
            .chart_kinds()
            .iter()
            .map(|k| k.name().to_string())
            .collect()
    } else {
        Vec::new()
    };
    let selected = app
        .session
        .chart()
        .and_then(|kind| app.session.chart_kinds().iter().position(|k| *k == kind));
    let widget = selector::Selector::new("Charts", items)
        .cursor(app.chart_cursor)
        .selected(selected)
        .focused(app.focus == Focus::Charts)
        .placeholder("Run a query with rows first.");
    frame.render_widget(widget, area);
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let title = match app.session.current_entry() {
        Some(entry) => format!(" Results for: {} ", entry.label),
        None => " Results ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.session.current_entry().is_some() {
        frame.render_widget(table::ResultTable::new(app.session.result()), inner);
    }
}

fn render_chart(frame: &mut Frame, area: Rect, app: &App) {
    let title = app.session.chart().map_or("Chart", |kind| kind.name());
    let widget = chart::ChartView::new(app.session.figure(), title)
        .placeholder("Pick a chart type to plot the result.");
    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    frame.render_widget(status::StatusLine::new(app.latest_notice()), area);
}
