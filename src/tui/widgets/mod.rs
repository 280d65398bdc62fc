//! TUI widgets for the dashboard.
//!
//! Contains reusable UI components.

pub mod chart;
pub mod header;
pub mod selector;
pub mod status;
pub mod table;
