//! Headless mode.
//!
//! Drives the dashboard on an off-screen terminal from a script of key
//! presses and assertions, then reports the final screen, the session
//! state and every notice raised along the way.

mod events;
mod output;

pub use events::{parse_script, Action, Check, Comparison, StateField, Step};
pub use output::{report, screen_text, OutputFormat};

use crate::cli::{HeadlessArgs, ScreenSize};
use crate::db::ConnectionProvider;
use crate::error::{DashError, Result};
use crate::notice::Notice;
use crate::session::Session;
use crate::tui::app::App;
use crate::tui::{ui, Event};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// How a scripted run is set up.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub size: ScreenSize,
    pub output_format: OutputFormat,
    /// Stop at the first failed assertion.
    pub fail_fast: bool,
    /// Report destination; stdout when unset.
    pub output_file: Option<PathBuf>,
}

impl HeadlessConfig {
    pub fn from_args(args: &HeadlessArgs) -> Self {
        Self {
            size: args.size,
            output_format: args.output,
            fail_fast: args.fail_fast,
            output_file: args.output_file.clone(),
        }
    }
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            size: ScreenSize {
                width: 120,
                height: 40,
            },
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
        }
    }
}

/// Passed and failed assertion counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
}

impl Tally {
    fn record(&mut self, passed: bool) {
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn any(&self) -> bool {
        self.passed + self.failed > 0
    }
}

/// Outcome of a scripted run.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen as plain text.
    pub screen: String,
    pub events_executed: usize,
    pub duration: Duration,
    pub assertions: Tally,
    pub state: HeadlessState,
    /// Every notice raised during the run, oldest first.
    pub notices: Vec<Notice>,
    /// Screens after each step; only recorded for frames output.
    pub frames: Vec<Frame>,
}

impl HeadlessResult {
    pub fn screen_lines(&self) -> Vec<&str> {
        self.screen.lines().collect()
    }

    /// 1 when any assertion failed.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.assertions.failed > 0)
    }
}

/// Snapshot of the dashboard state, queryable from `assert:state:` steps.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessState {
    /// Selection stage: `catalog`, `query`, `chart` or `halted`.
    pub stage: String,
    pub catalog: Option<String>,
    /// 1-based position of the selected query.
    pub query: Option<usize>,
    pub chart: Option<String>,
    pub row_count: usize,
    pub notice_count: usize,
    pub focus: String,
    pub is_processing: bool,
    pub running: bool,
}

impl HeadlessState {
    fn from_app(app: &App) -> Self {
        let session = &app.session;
        Self {
            stage: session.stage().name().to_string(),
            catalog: session.catalog_id().map(|id| id.title().to_string()),
            query: session.query_index().map(|i| i + 1),
            chart: session.chart().map(|kind| kind.name().to_string()),
            row_count: session.result().row_count,
            notice_count: session.notices().len(),
            focus: format!("{:?}", app.focus),
            is_processing: app.is_processing,
            running: app.running,
        }
    }
}

/// Screen after a step, or at start-up when `step` is `None`.
#[derive(Debug, Clone)]
pub struct Frame {
    pub number: usize,
    pub step: Option<String>,
    pub screen: String,
}

/// Plays a script against an [`App`] on a [`TestBackend`].
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    steps: Vec<Step>,
    frames: Vec<Frame>,
    tally: Tally,
}

impl HeadlessRunner {
    pub fn new(config: HeadlessConfig, app: App) -> Result<Self> {
        let backend = TestBackend::new(config.size.width, config.size.height);
        let terminal = Terminal::new(backend)
            .map_err(|e| DashError::internal(format!("Failed to create test terminal: {e}")))?;

        Ok(Self {
            config,
            terminal,
            app,
            steps: Vec::new(),
            frames: Vec::new(),
            tally: Tally::default(),
        })
    }

    /// Replaces the script with steps parsed from `input`.
    pub fn load_steps(&mut self, input: &str) -> Result<()> {
        self.steps = parse_script(input)?;
        Ok(())
    }

    /// Loads the script from a file, or from stdin when `path` is `-`.
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let text = if path == "-" {
            std::io::read_to_string(std::io::stdin())
        } else {
            std::fs::read_to_string(path)
        }
        .map_err(|e| DashError::internal(format!("Failed to read script {path}: {e}")))?;

        self.load_steps(&text)
    }

    /// Connects, plays every step and reports the outcome.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        let started = Instant::now();
        self.app.start().await;
        self.record(None)?;

        let mut executed = 0;
        for step in std::mem::take(&mut self.steps) {
            debug!("Headless step: {step}");
            if !self.apply(&step).await? {
                break;
            }
            executed += 1;

            if self.config.output_format == OutputFormat::Frames {
                self.record(Some(step.to_string()))?;
            }
            if !self.app.running {
                break;
            }
        }

        let screen = self.snapshot()?;
        Ok(HeadlessResult {
            screen,
            events_executed: executed,
            duration: started.elapsed(),
            assertions: self.tally,
            state: HeadlessState::from_app(&self.app),
            notices: self.app.session.notices().all().to_vec(),
            frames: self.frames,
        })
    }

    /// Plays one step. Returns false when the run should stop.
    async fn apply(&mut self, step: &Step) -> Result<bool> {
        match &step.action {
            Action::Key(key) => self.app.handle_event(Event::Key(*key)).await,
            Action::Wait(duration) => tokio::time::sleep(*duration).await,
            // Picked up by the terminal on the next draw.
            Action::Resize(size) => self.terminal.backend_mut().resize(size.width, size.height),
            Action::Snapshot(name) => debug!("Snapshot {name}"),
            Action::Assert(check) => {
                let screen = self.snapshot()?;
                let passed = check.passes(&screen, &HeadlessState::from_app(&self.app));
                self.tally.record(passed);
                if !passed {
                    debug!("Assertion failed: {step}");
                    return Ok(!self.config.fail_fast);
                }
            }
        }
        Ok(true)
    }

    /// Draws the dashboard and returns the screen text.
    fn snapshot(&mut self) -> Result<String> {
        self.terminal
            .draw(|frame| ui::render(frame, &self.app))
            .map_err(|e| DashError::internal(format!("Failed to render: {e}")))?;
        Ok(screen_text(self.terminal.backend().buffer()))
    }

    fn record(&mut self, step: Option<String>) -> Result<()> {
        let screen = self.snapshot()?;
        self.frames.push(Frame {
            number: self.frames.len(),
            step,
            screen,
        });
        Ok(())
    }
}

/// Runs the script named on the command line against `provider` and
/// prints the report. Returns the process exit code.
pub async fn run_headless(
    args: &HeadlessArgs,
    provider: ConnectionProvider,
    export_dir: PathBuf,
) -> Result<i32> {
    let config = HeadlessConfig::from_args(args);
    let app = App::new(Session::new(Arc::new(provider)), export_dir);
    let mut runner = HeadlessRunner::new(config.clone(), app)?;

    match (&args.events, &args.script) {
        (Some(steps), _) => runner.load_steps(steps)?,
        (None, Some(path)) => runner.load_script(path)?,
        (None, None) => return Err(DashError::config("--headless requires --events or --script")),
    }

    let result = runner.run().await?;
    let text = report(&result, config.output_format);

    match &config.output_file {
        Some(path) => std::fs::write(path, &text)
            .map_err(|e| DashError::internal(format!("Failed to write output file: {e}")))?,
        None => print!("{text}"),
    }

    Ok(result.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FailingConnector, MockConnector};
    use pretty_assertions::assert_eq;

    fn runner(script: &str) -> HeadlessRunner {
        let provider = ConnectionProvider::new(MockConnector::retail_sample());
        let app = App::new(Session::new(Arc::new(provider)), PathBuf::from("."));
        let mut runner = HeadlessRunner::new(HeadlessConfig::default(), app).unwrap();
        runner.load_steps(script).unwrap();
        runner
    }

    #[tokio::test]
    async fn test_snapshot_and_resize_steps() {
        let result = runner("snapshot:start,resize:90x30,assert:contains:Guvi Queries")
            .run()
            .await
            .unwrap();
        assert_eq!(result.events_executed, 3);
        assert_eq!(result.assertions, Tally { passed: 1, failed: 0 });
        assert!(result.screen_lines().iter().all(|line| line.chars().count() <= 90));
    }

    #[tokio::test]
    async fn test_frames_recorded_per_step() {
        let provider = ConnectionProvider::new(MockConnector::retail_sample());
        let app = App::new(Session::new(Arc::new(provider)), PathBuf::from("."));
        let config = HeadlessConfig {
            output_format: OutputFormat::Frames,
            ..HeadlessConfig::default()
        };
        let mut runner = HeadlessRunner::new(config, app).unwrap();
        runner.load_steps("key:down,key:enter").unwrap();

        let result = runner.run().await.unwrap();
        let causes: Vec<Option<&str>> = result.frames.iter().map(|f| f.step.as_deref()).collect();
        assert_eq!(causes, vec![None, Some("key:down"), Some("key:enter")]);
    }

    #[tokio::test]
    async fn test_initial_screen_lists_catalogs() {
        let result = runner("assert:contains:Guvi Queries").run().await.unwrap();
        assert_eq!(result.assertions.passed, 1);
        assert!(result.screen.contains("Own Queries"));
        assert!(result.screen.contains("Retail Order Data Analyst"));
        assert_eq!(result.state.stage, "catalog");
    }

    #[tokio::test]
    async fn test_script_reaches_chart_stage() {
        let script = "key:down,key:enter,key:enter,\
                      assert:state:stage=chart,assert:state:row_count=10,\
                      key:down,key:enter,assert:state:chart=Bar Chart";
        let result = runner(script).run().await.unwrap();
        assert_eq!(result.assertions.failed, 0);
        assert_eq!(result.assertions.passed, 3);
        assert!(result.screen.contains("Results for:"));
    }

    #[tokio::test]
    async fn test_fail_fast_stops_early() {
        let provider = ConnectionProvider::new(MockConnector::retail_sample());
        let app = App::new(Session::new(Arc::new(provider)), PathBuf::from("."));
        let config = HeadlessConfig {
            fail_fast: true,
            ..HeadlessConfig::default()
        };
        let mut runner = HeadlessRunner::new(config, app).unwrap();
        runner
            .load_steps("assert:contains:not on screen,key:down,key:down")
            .unwrap();
        let result = runner.run().await.unwrap();
        assert_eq!(result.assertions.failed, 1);
        assert_eq!(result.events_executed, 0);
    }

    #[tokio::test]
    async fn test_failed_connection_halts() {
        let provider = ConnectionProvider::new(FailingConnector::new("connection refused"));
        let app = App::new(Session::new(Arc::new(provider)), PathBuf::from("."));
        let mut runner = HeadlessRunner::new(HeadlessConfig::default(), app).unwrap();
        runner.load_steps("key:enter,assert:state:stage=halted").unwrap();

        let result = runner.run().await.unwrap();
        assert_eq!(result.assertions.passed, 1);
        assert_eq!(result.notices.len(), 1);
        assert!(result.notices[0]
            .message
            .starts_with("Failed to connect to the database:"));
    }
}
