//! retail-dash: a terminal dashboard of predefined retail sales analytics.
//!
//! This library exposes the core modules for use by the binary and the
//! integration tests.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod notice;
pub mod query;
pub mod render;
pub mod session;
pub mod tui;
