//! Reports printed at the end of a headless run.

use std::fmt::Write as _;

use clap::ValueEnum;
use ratatui::buffer::Buffer;
use serde::Serialize;

use super::{HeadlessResult, HeadlessState, Tally};
use crate::notice::Notice;

/// How a headless run is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Final screen, a summary line and the notices.
    #[default]
    Text,
    /// Everything as one JSON document.
    Json,
    /// Every screen the script produced, one after another.
    Frames,
}

/// Plain text of a rendered buffer, without trailing blanks.
pub fn screen_text(buffer: &Buffer) -> String {
    let width = usize::from(buffer.area.width.max(1));
    let mut lines: Vec<String> = buffer
        .content()
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect();

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[derive(Serialize)]
struct JsonReport<'a> {
    screen: &'a str,
    screen_lines: Vec<&'a str>,
    events_executed: usize,
    duration_ms: u128,
    assertions: Tally,
    state: &'a HeadlessState,
    notices: &'a [Notice],
}

/// Formats `result` for printing.
pub fn report(result: &HeadlessResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{}\n{}", result.screen, footer(result)),
        OutputFormat::Frames => {
            let mut out = String::new();
            for frame in &result.frames {
                let cause = frame.step.as_deref().unwrap_or("start");
                let _ = write!(out, "--- frame {}: {cause} ---\n{}\n", frame.number, frame.screen);
            }
            out.push_str(&footer(result));
            out
        }
        OutputFormat::Json => {
            let json = JsonReport {
                screen: &result.screen,
                screen_lines: result.screen_lines(),
                events_executed: result.events_executed,
                duration_ms: result.duration.as_millis(),
                assertions: result.assertions,
                state: &result.state,
                notices: &result.notices,
            };
            serde_json::to_string_pretty(&json)
                .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
        }
    }
}

/// Summary line followed by one line per notice.
fn footer(result: &HeadlessResult) -> String {
    let mut out = format!(
        "{} events in {}ms",
        result.events_executed,
        result.duration.as_millis()
    );
    if result.assertions.any() {
        let _ = write!(
            out,
            ", assertions {} passed / {} failed",
            result.assertions.passed, result.assertions.failed
        );
    }
    out.push('\n');
    for notice in &result.notices {
        let _ = writeln!(out, "{notice}");
    }
    out
}
