use colored::Colorize;
use provider::{Diagnostic, Severity};

/// Print an info message
pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    eprintln!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    eprintln!();
    eprintln!("{}", title.bold());
    eprintln!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    eprintln!();
    eprintln!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    eprintln!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Diagnostics
// ============================================================================

/// One line describing a diagnostic, without color
pub fn format_diagnostic(diag: &Diagnostic) -> String {
    let mut line = match &diag.attribute {
        Some(path) => format!("{} (at {path})", diag.summary),
        None => diag.summary.clone(),
    };
    if !diag.detail.is_empty() && diag.detail != diag.summary {
        line.push_str(": ");
        line.push_str(&diag.detail);
    }
    line
}

/// Print every diagnostic with its severity marker
pub fn diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        let line = format_diagnostic(diag);
        match diag.severity {
            Severity::Error => error(&line),
            Severity::Warning => warn(&line),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
