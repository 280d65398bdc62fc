//! Query execution for the dashboard.
//!
//! This module isolates SQL execution and failure reporting from the
//! selection flow.

pub mod executor;

pub use executor::run_query;
