//! ANSI escape sequences for the console mirror.

use crate::severity::Severity;

pub const TERM_DEBUG: &str = "\x1b[1;36m";
pub const TERM_INFO: &str = "\x1b[1;32m";
pub const TERM_WARN: &str = "\x1b[1;33m";
pub const TERM_ERROR: &str = "\x1b[1;31m";
pub const TERM_FATAL: &str = "\x1b[1;31m";
pub const TERM_BOLD: &str = "\x1b[1m";
pub const TERM_RESET: &str = "\x1b[0m";

/// Color used when mirroring a record of the given severity to stdout.
pub fn severity_color(level: Severity) -> &'static str {
    match level {
        Severity::Debug => TERM_DEBUG,
        Severity::Info => TERM_INFO,
        Severity::Warn => TERM_WARN,
        Severity::Error => TERM_ERROR,
        Severity::Fatal => TERM_FATAL,
    }
}
