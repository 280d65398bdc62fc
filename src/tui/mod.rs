//! Terminal user interface for the dashboard.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod events;
pub mod headless;
mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::error::{DashError, Result};
use crossterm::{
    event::KeyCode,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::{info, warn};

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| DashError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| DashError::internal(format!("Failed to enter alternate screen: {e}")))?;

        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
            .map_err(|e| DashError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| DashError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| DashError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| DashError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    fn draw(&mut self, app: &App) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| DashError::internal(format!("Failed to draw: {e}")))?;
        Ok(())
    }

    /// Runs the main event loop until the user quits.
    pub async fn run(&mut self, app: &mut App) -> Result<()> {
        // Restore the terminal on panic
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let result = self.run_event_loop(app).await;

        let _ = panic::take_hook();
        result
    }

    async fn run_event_loop(&mut self, app: &mut App) -> Result<()> {
        // Show the layout while the connection is being made
        app.is_processing = true;
        self.draw(app)?;
        app.start().await;
        app.is_processing = false;

        loop {
            self.draw(app)?;

            if !app.running {
                break;
            }

            let handler = self.event_handler;
            tokio::select! {
                event = tokio::task::spawn_blocking(move || handler.next()) => {
                    let event = event
                        .map_err(|e| DashError::internal(format!("Event task failed: {e}")))??;
                    let runs_query = app.focus == app::Focus::Queries
                        && !app.session.is_halted()
                        && matches!(&event, Event::Key(key) if key.code == KeyCode::Enter);
                    if runs_query {
                        // Show the busy indicator while the query runs
                        app.is_processing = true;
                        self.draw(app)?;
                    }
                    app.handle_event(event).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted");
                    app.running = false;
                }
            }
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive dashboard.
pub async fn run_tui(mut app: App) -> Result<()> {
    info!("Starting dashboard against {}", app.session.target());
    let mut tui = Tui::new()?;
    tui.run(&mut app).await
}
