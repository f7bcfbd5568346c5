//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output. Status lines for problems go
//! to stderr; everything else goes to stdout.

use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `key  value` line under a header
    pub fn field(key: &str, value: &str) {
        println!("  {}  {}", pad_key(key, FIELD_WIDTH).dimmed(), value);
    }

    /// Print an indented list item
    pub fn item(message: &str) {
        println!("  {} {}", "•".dimmed(), message);
    }
}

const FIELD_WIDTH: usize = 18;

/// Right-pad `key` to `width` characters
pub fn pad_key(key: &str, width: usize) -> String {
    format!("{:<width$}", key, width = width)
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Render a boolean the way build files spell it
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
