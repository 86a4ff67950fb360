//! Utility functions for date formatting and string matching.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{contains_ignore_case, day_name, days_until, format_date, relative_day, truncate_string, Language};
