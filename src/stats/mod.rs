//! Descriptive statistics over a finished result set.

pub mod summary;

pub use summary::*;
