//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for `--verbose`-gated output
//! - `ProgressCounter` for single-line progress display during generation
//!
//! # Example
//!
//! ```ignore
//! log!("generate"; "packaged {} assets", count);
//!
//! let progress = ProgressCounter::new("generate", total);
//! progress.inc();
//! progress.finish();
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module {
        "error" => prefix.bright_red().bold().to_string(),
        "warning" => prefix.bright_yellow().bold().to_string(),
        "extract" | "restore" => prefix.bright_green().bold().to_string(),
        _ => prefix.bright_blue().bold().to_string(),
    }
}

// ============================================================================
// Progress Counter (single-line count with overwrite)
// ============================================================================

/// Single-line `[module] n/total` progress display.
///
/// Writes over the same terminal line on each increment; `finish` clears it
/// so the closing `log!` summary replaces the counter.
pub struct ProgressCounter {
    module: &'static str,
    total: usize,
    done: AtomicUsize,
    line: Mutex<()>,
}

impl ProgressCounter {
    pub fn new(module: &'static str, total: usize) -> Self {
        Self {
            module,
            total,
            done: AtomicUsize::new(0),
            line: Mutex::new(()),
        }
    }

    /// Record one completed unit and redraw the counter line.
    pub fn inc(&self) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = self.line.lock();
        let mut stdout = stdout().lock();
        let prefix = colorize_prefix(self.module);
        write!(stdout, "\r{prefix} {done}/{}", self.total).ok();
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
        stdout.flush().ok();
    }

    /// Clear the counter line.
    pub fn finish(&self) {
        let _guard = self.line.lock();
        let mut stdout = stdout().lock();
        write!(stdout, "\r").ok();
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
        stdout.flush().ok();
    }
}

/// `"3 files"` / `"1 file"` style counts for log messages.
pub fn plural_count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "asset"), "0 assets");
        assert_eq!(plural_count(1, "asset"), "1 asset");
        assert_eq!(plural_count(4, "asset"), "4 assets");
    }
}
