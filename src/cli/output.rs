//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: paths, secret paths, hints
//! - Dimmed: secondary info
//!
//! Status lines go to stderr so that `pull` output on stdout stays
//! pipeable; listings and success messages go to stdout.

use console::style;
use std::fmt::Display;
use std::io::{self, Write as IoWrite};

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ Profile created.`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("✓").green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
///
/// Example: `✗ secret/app does not exist`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message to stderr (yellow).
pub fn warn(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("⚠").yellow(), msg);
    } else {
        eprintln!("⚠ {}", msg);
    }
}

/// Print a hint message to stderr (cyan).
///
/// Example: `→ run: kvault unseal`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print an informational line to stderr.
pub fn info(msg: &str) {
    eprintln!("{}", msg);
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  staging  https://vault.example.com`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!("  {}  {}", style(label).dim(), style(value).bold());
    } else {
        println!("  {}  {}", label, value);
    }
}

/// Format a path in cyan for inline use.
pub fn path(p: impl Display) -> String {
    if colors_enabled() {
        style(p).cyan().to_string()
    } else {
        p.to_string()
    }
}

/// Start a progress line in the format `Label... ` on stderr.
///
/// Call `progress_done()` to finish the line.
pub fn progress(label: &str) {
    if colors_enabled() {
        eprint!("{}... ", style(label).dim());
    } else {
        eprint!("{}... ", label);
    }
    let _ = io::stderr().flush();
}

/// Finish a progress line with success/failure indicator.
pub fn progress_done(success: bool) {
    let word = if success { "ok" } else { "failed" };
    if colors_enabled() {
        if success {
            eprintln!("{}", style(word).green());
        } else {
            eprintln!("{}", style(word).red());
        }
    } else {
        eprintln!("{}", word);
    }
}

/// Print a dimmed/secondary message.
///
/// Example: `no profiles stored`
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", style(msg).dim());
    } else {
        println!("{}", msg);
    }
}
