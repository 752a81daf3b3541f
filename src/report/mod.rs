//! Reporting utilities: run summary and statistics tables for the terminal.

pub mod format;

pub use format::*;
