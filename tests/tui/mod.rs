//! Headless binary tests.

mod common;
mod headless_test;
