// src/utils/log.rs

//! Console-style progress output on top of the `log` facade.
//!
//! Pipeline entry points use these helpers for banners, numbered steps and
//! run summaries; everything else logs through the `log` macros directly.

const RULE_WIDTH: usize = 60;

/// Log an info message
pub fn info(message: &str) {
    ::log::info!("{message}");
}

/// Log a warning message
pub fn warn(message: &str) {
    ::log::warn!("{message}");
}

/// Log an error message
pub fn error(message: &str) {
    ::log::error!("{message}");
}

/// Log a success message (always shown as INFO)
pub fn success(message: &str) {
    ::log::info!("[OK] {message}");
}

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    ::log::info!("{}", step_line(step_num, total, message));
}

fn step_line(step_num: usize, total: usize, message: &str) -> String {
    format!("[STEP {step_num}/{total}] {message}")
}

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(RULE_WIDTH);
    ::log::info!("{border}");
    ::log::info!("  {title}");
    ::log::info!("{border}");
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    ::log::info!("    {message}");
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    for line in summary_lines(title, items) {
        ::log::info!("{line}");
    }
}

fn summary_lines(title: &str, items: &[(&str, String)]) -> Vec<String> {
    std::iter::once(format!("[SUMMARY] {title}"))
        .chain(items.iter().map(|(key, value)| format!("    {key}: {value}")))
        .collect()
}
