//! Application state for the TUI.
//!
//! Wraps a [`Session`] with the cursor and focus state of the three
//! selector lists.

use std::path::PathBuf;

use crate::catalog::CatalogId;
use crate::notice::Notice;
use crate::render::ChartKind;
use crate::session::{Session, Stage};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::Event;

/// Which selector list currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Catalogs,
    Queries,
    Charts,
}

impl Focus {
    /// Cycles to the next list.
    pub fn next(self) -> Self {
        match self {
            Self::Catalogs => Self::Queries,
            Self::Queries => Self::Charts,
            Self::Charts => Self::Catalogs,
        }
    }

    /// Cycles to the previous list.
    pub fn prev(self) -> Self {
        match self {
            Self::Catalogs => Self::Charts,
            Self::Queries => Self::Catalogs,
            Self::Charts => Self::Queries,
        }
    }
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus list.
    pub focus: Focus,
    pub catalog_cursor: usize,
    pub query_cursor: usize,
    pub chart_cursor: usize,
    /// True while a query is executing.
    pub is_processing: bool,
    /// Directory CSV exports are written to.
    pub export_dir: PathBuf,
    pub session: Session,
}

impl App {
    pub fn new(session: Session, export_dir: PathBuf) -> Self {
        Self {
            running: true,
            focus: Focus::default(),
            catalog_cursor: 0,
            query_cursor: 0,
            chart_cursor: 0,
            is_processing: false,
            export_dir,
            session,
        }
    }

    /// Connects to the database before the first frame.
    pub async fn start(&mut self) {
        self.session.start().await;
    }

    /// Whether `focus` can be entered at the current stage.
    fn can_focus(&self, focus: Focus) -> bool {
        match focus {
            Focus::Catalogs => true,
            Focus::Queries => self.session.catalog_id().is_some(),
            Focus::Charts => self.session.stage() == Stage::ChartChoice,
        }
    }

    fn cycle_focus(&mut self, step: fn(Focus) -> Focus) {
        let mut focus = step(self.focus);
        while !self.can_focus(focus) {
            focus = step(focus);
        }
        self.focus = focus;
    }

    /// Labels of the queries in the chosen catalog.
    pub fn query_labels(&self) -> Vec<&'static str> {
        self.session
            .current_catalog()
            .map(|c| c.labels())
            .unwrap_or_default()
    }

    /// The notice shown in the status line.
    pub fn latest_notice(&self) -> Option<&Notice> {
        self.session.notices().latest()
    }

    fn list_len(&self, focus: Focus) -> usize {
        match focus {
            Focus::Catalogs => CatalogId::ALL.len(),
            Focus::Queries => self.query_labels().len(),
            Focus::Charts => self.session.chart_kinds().len(),
        }
    }

    fn cursor_mut(&mut self, focus: Focus) -> &mut usize {
        match focus {
            Focus::Catalogs => &mut self.catalog_cursor,
            Focus::Queries => &mut self.query_cursor,
            Focus::Charts => &mut self.chart_cursor,
        }
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.list_len(self.focus);
        let cursor = self.cursor_mut(self.focus);
        if down {
            if *cursor + 1 < len {
                *cursor += 1;
            }
        } else {
            *cursor = cursor.saturating_sub(1);
        }
    }

    /// Handles an event and updates application state.
    pub async fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            self.handle_key(key).await;
        }
    }

    /// Handles a key press.
    pub async fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('q') => {
                self.running = false;
            }
            _ if self.session.is_halted() => {}
            KeyCode::Tab => self.cycle_focus(Focus::next),
            KeyCode::BackTab => self.cycle_focus(Focus::prev),
            KeyCode::Up => self.move_cursor(false),
            KeyCode::Down => self.move_cursor(true),
            KeyCode::Enter => self.select().await,
            KeyCode::Char('e') => {
                self.session.save_export(&self.export_dir);
            }
            _ => {}
        }
    }

    async fn select(&mut self) {
        match self.focus {
            Focus::Catalogs => {
                let Some(&id) = CatalogId::ALL.get(self.catalog_cursor) else {
                    return;
                };
                self.session.select_catalog(id);
                self.query_cursor = 0;
                self.chart_cursor = 0;
                self.focus = Focus::Queries;
            }
            Focus::Queries => {
                self.is_processing = true;
                self.session.select_query(self.query_cursor).await;
                self.is_processing = false;
                self.chart_cursor = 0;
                if self.session.stage() == Stage::ChartChoice {
                    self.focus = Focus::Charts;
                }
            }
            Focus::Charts => {
                let kinds: Vec<ChartKind> = self.session.chart_kinds();
                if let Some(&kind) = kinds.get(self.chart_cursor) {
                    self.session.select_chart(kind);
                }
            }
        }
    }
}
