//! Console prefix helpers; colorization is centralized here.

use owo_colors::OwoColorize;

/// Colors are suppressed under `NO_COLOR`, per convention.
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors() {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

/// Prefix for per-file progress notices in verbose mode.
pub fn status_prefix() -> String {
    if use_colors() {
        "status:".blue().bold().to_string()
    } else {
        "status:".to_string()
    }
}
