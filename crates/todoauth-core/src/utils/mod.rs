//! Formatting helpers for log output.

pub mod format;

pub use format::{mask_token, truncate_string};
