//! Script steps for headless runs.
//!
//! A script is a list of `kind:value` steps separated by commas or
//! newlines; lines starting with `#` are ignored.
//!
//! ```text
//! # pick Own Queries
//! key:down, key:enter
//! wait:200ms
//! resize:100x30
//! snapshot:after-select
//! assert:contains:Results for:
//! assert:state:row_count>=1
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use regex::Regex;

use super::HeadlessState;
use crate::cli::ScreenSize;
use crate::error::{DashError, Result};

/// Keys the dashboard reacts to, by script name.
const KEYS: &[(&str, KeyCode, KeyModifiers)] = &[
    ("up", KeyCode::Up, KeyModifiers::NONE),
    ("down", KeyCode::Down, KeyModifiers::NONE),
    ("enter", KeyCode::Enter, KeyModifiers::NONE),
    ("tab", KeyCode::Tab, KeyModifiers::NONE),
    ("backtab", KeyCode::BackTab, KeyModifiers::SHIFT),
    ("shift+tab", KeyCode::BackTab, KeyModifiers::SHIFT),
    ("e", KeyCode::Char('e'), KeyModifiers::NONE),
    ("q", KeyCode::Char('q'), KeyModifiers::NONE),
    ("ctrl+c", KeyCode::Char('c'), KeyModifiers::CONTROL),
];

fn key(name: &str) -> Result<KeyEvent> {
    let wanted = name.trim().to_ascii_lowercase();
    KEYS.iter()
        .find(|(script_name, ..)| *script_name == wanted)
        .map(|&(_, code, modifiers)| KeyEvent::new(code, modifiers))
        .ok_or_else(|| {
            let known: Vec<&str> = KEYS.iter().map(|(script_name, ..)| *script_name).collect();
            DashError::config(format!(
                "Unknown key '{name}'. Known keys: {}",
                known.join(", ")
            ))
        })
}

/// `250ms`, `2s`, or a bare number of milliseconds.
fn duration(value: &str) -> Result<Duration> {
    let value = value.trim().to_ascii_lowercase();
    let (digits, unit_ms) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1)
    } else if let Some(secs) = value.strip_suffix('s') {
        (secs, 1000)
    } else {
        (value.as_str(), 1)
    };

    digits
        .trim()
        .parse::<u64>()
        .map(|n| Duration::from_millis(n.saturating_mul(unit_ms)))
        .map_err(|_| DashError::config(format!("Invalid wait '{value}'")))
}

/// Dashboard state readable from `assert:state:` steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateField {
    Stage,
    Catalog,
    Query,
    Chart,
    RowCount,
    NoticeCount,
    Focus,
    IsProcessing,
    Running,
}

impl StateField {
    const NAMES: [(&'static str, StateField); 9] = [
        ("stage", StateField::Stage),
        ("catalog", StateField::Catalog),
        ("query", StateField::Query),
        ("chart", StateField::Chart),
        ("row_count", StateField::RowCount),
        ("notice_count", StateField::NoticeCount),
        ("focus", StateField::Focus),
        ("is_processing", StateField::IsProcessing),
        ("running", StateField::Running),
    ];

    /// Current value as text. Nothing selected reads as `none`.
    pub fn read(self, state: &HeadlessState) -> String {
        let or_none = |value: Option<String>| value.unwrap_or_else(|| "none".to_string());
        match self {
            Self::Stage => state.stage.clone(),
            Self::Catalog => or_none(state.catalog.clone()),
            Self::Query => or_none(state.query.map(|q| q.to_string())),
            Self::Chart => or_none(state.chart.clone()),
            Self::RowCount => state.row_count.to_string(),
            Self::NoticeCount => state.notice_count.to_string(),
            Self::Focus => state.focus.clone(),
            Self::IsProcessing => state.is_processing.to_string(),
            Self::Running => state.running.to_string(),
        }
    }
}

impl FromStr for StateField {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, field)| *field)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::NAMES.iter().map(|(name, _)| *name).collect();
                DashError::config(format!(
                    "Unknown state field '{s}'. Fields: {}",
                    names.join(", ")
                ))
            })
    }
}

/// Comparison in a state assertion. Numbers compare as numbers; anything
/// else only supports `=` and `!=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    /// Two-character operators come first so `>=` is not read as `>`.
    const OPERATORS: [(&'static str, Comparison); 6] = [
        (">=", Comparison::Ge),
        ("<=", Comparison::Le),
        ("!=", Comparison::Ne),
        (">", Comparison::Gt),
        ("<", Comparison::Lt),
        ("=", Comparison::Eq),
    ];

    fn holds(self, actual: &str, expected: &str) -> bool {
        let ordering = match (actual.parse::<i64>(), expected.parse::<i64>()) {
            (Ok(a), Ok(e)) => a.cmp(&e),
            _ if matches!(self, Self::Eq | Self::Ne) => actual.cmp(expected),
            _ => return false,
        };
        match self {
            Self::Eq => ordering.is_eq(),
            Self::Ne => ordering.is_ne(),
            Self::Gt => ordering.is_gt(),
            Self::Ge => ordering.is_ge(),
            Self::Lt => ordering.is_lt(),
            Self::Le => ordering.is_le(),
        }
    }
}

/// Something an `assert:` step expects to hold.
#[derive(Debug, Clone)]
pub enum Check {
    /// Screen contains the text, ignoring case.
    Contains(String),
    /// Screen contains the text exactly.
    ContainsExact(String),
    /// Screen does not contain the text, ignoring case.
    Absent(String),
    Matches(Regex),
    State {
        field: StateField,
        op: Comparison,
        expected: String,
    },
}

impl Check {
    pub fn passes(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text.as_str()),
            Self::Absent(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(re) => re.is_match(screen),
            Self::State {
                field,
                op,
                expected,
            } => op.holds(&field.read(state), expected),
        }
    }
}

impl FromStr for Check {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, rest) = s.split_once(':').ok_or_else(|| {
            DashError::config(format!("Invalid assertion '{s}'. Expected assert:kind:value"))
        })?;
        let text = rest.trim().to_string();

        match kind.trim().to_ascii_lowercase().as_str() {
            "contains" => Ok(Self::Contains(text)),
            "contains-exact" => Ok(Self::ContainsExact(text)),
            "not-contains" => Ok(Self::Absent(text)),
            "matches" => Regex::new(&text)
                .map(Self::Matches)
                .map_err(|e| DashError::config(format!("Invalid pattern '{text}': {e}"))),
            "state" => parse_state_check(&text),
            other => Err(DashError::config(format!(
                "Unknown assertion '{other}'. Use contains, contains-exact, not-contains, matches or state"
            ))),
        }
    }
}

/// `field<op>value`, e.g. `stage=chart` or `row_count>=2`.
fn parse_state_check(text: &str) -> Result<Check> {
    let invalid = || DashError::config(format!("Invalid state assertion '{text}'"));

    let split = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .ok_or_else(invalid)?;
    let (field, rest) = text.split_at(split);
    let rest = rest.trim_start();

    let (op, expected) = Comparison::OPERATORS
        .iter()
        .find_map(|(symbol, op)| rest.strip_prefix(symbol).map(|value| (*op, value)))
        .ok_or_else(invalid)?;

    Ok(Check::State {
        field: field.parse()?,
        op,
        expected: expected.trim().to_string(),
    })
}

/// What a step does.
#[derive(Debug, Clone)]
pub enum Action {
    Key(KeyEvent),
    Wait(Duration),
    Resize(ScreenSize),
    /// Marks a frame; frames are captured after every step anyway.
    Snapshot(String),
    Assert(Check),
}

/// One parsed step, remembering how it was written.
#[derive(Debug, Clone)]
pub struct Step {
    pub action: Action,
    source: String,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Step {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        let source = s.trim();
        let (kind, value) = source.split_once(':').ok_or_else(|| {
            DashError::config(format!("Invalid step '{source}'. Expected kind:value"))
        })?;

        let action = match kind.trim().to_ascii_lowercase().as_str() {
            "key" => Action::Key(key(value)?),
            "wait" => Action::Wait(duration(value)?),
            "resize" => Action::Resize(value.parse().map_err(DashError::config)?),
            "snapshot" => Action::Snapshot(value.trim().to_string()),
            "assert" => Action::Assert(value.parse()?),
            other => {
                return Err(DashError::config(format!(
                    "Unknown step '{other}'. Use key, wait, resize, snapshot or assert"
                )))
            }
        };

        Ok(Self {
            action,
            source: source.to_string(),
        })
    }
}

/// Parses a whole script.
pub fn parse_script(input: &str) -> Result<Vec<Step>> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(str::parse::<Step>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn step(s: &str) -> Action {
        s.parse::<Step>().unwrap().action
    }

    fn state() -> HeadlessState {
        HeadlessState {
            stage: "chart".to_string(),
            catalog: Some("Own Queries".to_string()),
            query: Some(7),
            chart: None,
            row_count: 10,
            notice_count: 0,
            focus: "Charts".to_string(),
            is_processing: false,
            running: true,
        }
    }

    #[test]
    fn test_dashboard_keys() {
        let Action::Key(enter) = step("key:Enter") else {
            panic!("expected a key");
        };
        assert_eq!(enter, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        let Action::Key(quit) = step("key:ctrl+c") else {
            panic!("expected a key");
        };
        assert_eq!(quit.code, KeyCode::Char('c'));
        assert!(quit.modifiers.contains(KeyModifiers::CONTROL));

        let Action::Key(back) = step("key:shift+tab") else {
            panic!("expected a key");
        };
        assert_eq!(back.code, KeyCode::BackTab);
    }

    #[test]
    fn test_keys_the_dashboard_ignores_are_rejected() {
        let err = "key:f5".parse::<Step>().unwrap_err();
        assert!(err.to_string().contains("Known keys: up, down, enter"));
        assert!("key:x".parse::<Step>().is_err());
    }

    #[test]
    fn test_waits() {
        assert!(matches!(step("wait:250ms"), Action::Wait(d) if d == Duration::from_millis(250)));
        assert!(matches!(step("wait:2s"), Action::Wait(d) if d == Duration::from_secs(2)));
        assert!(matches!(step("wait:75"), Action::Wait(d) if d == Duration::from_millis(75)));
        assert!("wait:soon".parse::<Step>().is_err());
    }

    #[test]
    fn test_resize_uses_screen_size() {
        assert!(matches!(
            step("resize:100x30"),
            Action::Resize(ScreenSize { width: 100, height: 30 })
        ));
        assert!("resize:100".parse::<Step>().is_err());
    }

    #[test]
    fn test_script_with_comments_and_commas() {
        let script = "
# pick the second catalog
key:down, key:enter

key:enter
assert:state:stage=chart
";
        let steps = parse_script(script).unwrap();
        let written: Vec<String> = steps.iter().map(ToString::to_string).collect();
        assert_eq!(
            written,
            vec!["key:down", "key:enter", "key:enter", "assert:state:stage=chart"]
        );
    }

    #[test]
    fn test_bad_step_fails_the_whole_script() {
        assert!(parse_script("key:down,type:hello").is_err());
        assert!(parse_script("no_colon").is_err());
    }

    #[test]
    fn test_state_assertions() {
        let state = state();
        let check = |s: &str| s.parse::<Check>().unwrap().passes("", &state);

        assert!(check("state:stage=chart"));
        assert!(check("state:row_count>=10"));
        assert!(check("state:row_count < 11"));
        assert!(check("state:query!=3"));
        assert!(check("state:chart=none"));
        assert!(!check("state:chart=Line Chart"));
        assert!(!check("state:focus>Charts"));
    }

    #[test]
    fn test_unknown_state_field_is_a_parse_error() {
        let err = "state:bogus=1".parse::<Check>().unwrap_err();
        assert!(err.to_string().contains("Unknown state field 'bogus'"));
        assert!("state:stage".parse::<Check>().is_err());
    }

    #[test]
    fn test_screen_assertions() {
        let state = state();
        let screen = "Catalogs\n● Own Queries";
        let check = |s: &str| s.parse::<Check>().unwrap().passes(screen, &state);

        assert!(check("contains:own queries"));
        assert!(!check("contains-exact:own queries"));
        assert!(check("not-contains:Guvi"));
        assert!(check(r"matches:● \w+ Queries"));
        assert!("matches:(".parse::<Check>().is_err());
    }

    #[test]
    fn test_field_read_defaults() {
        let mut state = state();
        state.query = None;
        assert_eq!(StateField::Query.read(&state), "none");
        assert_eq!(StateField::Catalog.read(&state), "Own Queries");
        assert_eq!(StateField::Running.read(&state), "true");
    }
}
