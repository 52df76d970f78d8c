//! Utility functions and helpers.

pub mod http;
pub mod log;

use chrono::{Local, NaiveDate};

/// Today's local date, used for `lastmod` and "updated" stamps.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
