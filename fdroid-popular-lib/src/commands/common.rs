//! Logging setup and error reporting shared between commands.

use super::Host;
use crate::Result;
use clap::{Args, ValueEnum};
use std::io::Write;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared between commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Surface the full error on failure and pretty-print the output
    #[arg(long, short = 'd')]
    pub debug: bool,
}

/// Initialize the global logger.
///
/// Only the first call in a process has an effect.
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Turn the result of a command into what the user sees.
///
/// Outside of debug mode a failure is printed as a single ASCII `Error: ...` line and the
/// host is told to exit with status 1. In debug mode the error is returned unchanged.
pub fn report_outcome<H: Host>(host: &mut H, debug: bool, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if debug => Err(e),
        Err(e) => {
            let _ = writeln!(host.output(), "Error: {}", error_line(&e.to_string()));
            host.exit(1);
            Ok(())
        }
    }
}

/// Collapse an error message to one line of ASCII text.
fn error_line(message: &str) -> String {
    let ascii: String = message.chars().filter(char::is_ascii).collect();
    ascii.split_whitespace().collect::<Vec<_>>().join(" ")
}
