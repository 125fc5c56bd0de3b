//! # Console Notifications
//!
//! Everything the pipeline reports goes through the `log` facade and is
//! rendered by `env_logger` as
//!
//! ```text
//! [INFO] (2026-10-19T12:00:00Z) Downloading CBA_A3...
//! ```
//!
//! Six severities are shown. `log` stops at `Error`, so critical records are
//! error records sent to [`CRITICAL_TARGET`], which the [`critical!`] macro
//! does. Colors are a pure function of the severity ([`severity_style`]) and
//! are only applied when the resolved [`ColorChoice`] allows it.
//!
//! ## Color detection
//!
//! `--color=always` and `--color=never` force the choice. In `auto` mode
//! colors are disabled when `NO_COLOR` is set, `CLICOLOR=0`, `TERM=dumb`, or
//! stderr is not a color-capable terminal; `CLICOLOR_FORCE=1` turns them
//! back on for non-terminals.

use std::env;
use std::io::Write;

use clap::ValueEnum;
use console::Style;
use env_logger::WriteStyle;
use log::{Level, LevelFilter, Record, SetLoggerError};

/// Log target marking a record as critical.
pub const CRITICAL_TARGET: &str = "workshop_sync::critical";

/// Log a critical message: an error that ends the run.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        ::log::error!(target: $crate::logging::CRITICAL_TARGET, $($arg)+)
    };
}

/// Severity of a console notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl Severity {
    /// Severity of a log record, honoring the critical target.
    pub fn of(record: &Record<'_>) -> Self {
        if record.target() == CRITICAL_TARGET {
            return Severity::Critical;
        }
        Self::from(record.level())
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Trace => "TRACE",
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => Severity::Error,
            Level::Warn => Severity::Warning,
            Level::Info => Severity::Info,
            Level::Debug => Severity::Debug,
            Level::Trace => Severity::Trace,
        }
    }
}

/// Console style used for a severity.
pub fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::new().red().bold(),
        Severity::Error => Style::new().red(),
        Severity::Warning => Style::new().yellow(),
        Severity::Info => Style::new().cyan(),
        Severity::Debug => Style::new().white(),
        Severity::Trace => Style::new().dim(),
    }
}

/// Render a notification line, without the trailing newline.
pub fn format_line(severity: Severity, timestamp: &str, message: &str, use_color: bool) -> String {
    let line = format!("[{}] ({}) {}", severity.label(), timestamp, message);
    if use_color {
        severity_style(severity)
            .force_styling(true)
            .apply_to(line)
            .to_string()
    } else {
        line
    }
}

/// When to color console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Decide whether to use colors, consulting the environment in `Auto` mode.
    pub fn use_color(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => detect_color_support(),
        }
    }
}

fn detect_color_support() -> bool {
    // presence alone disables colors, even when empty
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return false;
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
        return true;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::Term::stderr().features().colors_supported()
}

/// Install the console logger.
///
/// Fails if a logger has already been installed in this process.
pub fn init(level: LevelFilter, color: ColorChoice) -> Result<(), SetLoggerError> {
    let use_color = color.use_color();
    // env_logger strips escapes on non-terminals unless told otherwise
    let write_style = if use_color {
        WriteStyle::Always
    } else {
        WriteStyle::Never
    };
    env_logger::Builder::new()
        .filter_level(level)
        .write_style(write_style)
        .format(move |buf, record| {
            let timestamp = buf.timestamp_seconds().to_string();
            let line = format_line(
                Severity::of(record),
                &timestamp,
                &record.args().to_string(),
                use_color,
            );
            writeln!(buf, "{}", line)
        })
        .try_init()
}
