//! User-facing notices.
//!
//! Operations that the dashboard must survive (failed connections, failed
//! queries, shapes a chart cannot draw) report here instead of returning
//! errors. Each notice is also written to the log.

use serde::Serialize;
use std::fmt;
use tracing::{error, info, warn};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A single message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.label(), self.message)
    }
}

/// Ordered collection of notices raised during a session.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    items: Vec<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.push(NoticeLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.push(NoticeLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        self.push(NoticeLevel::Error, message);
    }

    fn push(&mut self, level: NoticeLevel, message: String) {
        self.items.push(Notice { level, message });
    }

    pub fn all(&self) -> &[Notice] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if any notice has the given level.
    pub fn has_level(&self, level: NoticeLevel) -> bool {
        self.items.iter().any(|n| n.level == level)
    }

    /// Removes and returns every notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_keep_order() {
        let mut notices = Notices::new();
        notices.info("No data returned for this query.");
        notices.warn("Not enough numeric columns for Heatmap.");

        assert_eq!(notices.len(), 2);
        assert_eq!(notices.all()[0].level, NoticeLevel::Info);
        assert_eq!(
            notices.latest().unwrap().message,
            "Not enough numeric columns for Heatmap."
        );
    }

    #[test]
    fn test_has_level_and_drain() {
        let mut notices = Notices::new();
        assert!(!notices.has_level(NoticeLevel::Error));
        notices.error("Failed to connect to the database: refused");
        assert!(notices.has_level(NoticeLevel::Error));

        let drained = notices.drain();
        assert_eq!(drained.len(), 1);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_display() {
        let notice = Notice {
            level: NoticeLevel::Warning,
            message: "No numeric columns to plot.".to_string(),
        };
        assert_eq!(notice.to_string(), "[warning] No numeric columns to plot.");
    }
}
