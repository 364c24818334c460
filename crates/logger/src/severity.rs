use crate::ParseSeverityError;
use colored::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;

/// Ordinal importance of a log entry.
///
/// Ordering follows importance: `Trace < Debug < ... < Panic`. A logger at a
/// given severity writes every entry at that severity or above.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fine-grained tracing of control flow, usually too noisy for production.
    Trace,
    /// Diagnostic detail useful while developing or debugging a deployment.
    Debug,
    /// Routine operational messages. The level a logger starts at.
    #[default]
    Info,
    /// Something unexpected happened but the process carries on.
    Warn,
    /// An operation failed. Forwarded to the error-reporting hook.
    Error,
    /// The process cannot continue. [`crate::Logger::fatal`] exits after
    /// writing the entry.
    Fatal,
    /// An invariant was broken. [`crate::Logger::panic`] panics after
    /// writing the entry.
    Panic,
}

impl Severity {
    /// Every severity, least important first.
    pub const ALL: [Severity; 7] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
        Severity::Panic,
    ];

    /// Lowercase name, as written in the `level=` field and accepted by
    /// [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Panic => "panic",
        }
    }

    /// Four-letter uppercase tag used by the colored layout.
    pub(crate) fn tag(self) -> &'static str {
        match self {
            Severity::Trace => "TRAC",
            Severity::Debug => "DEBU",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERRO",
            Severity::Fatal => "FATA",
            Severity::Panic => "PANI",
        }
    }

    /// Foreground color of the tag and field keys in the colored layout.
    pub(crate) fn color(self) -> Color {
        match self {
            Severity::Trace | Severity::Debug => Color::White,
            Severity::Info => Color::Cyan,
            Severity::Warn => Color::Yellow,
            Severity::Error | Severity::Fatal | Severity::Panic => Color::Red,
        }
    }

    /// Entries at this severity are forwarded to the error-reporting hook.
    pub fn is_error(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "panic" => Ok(Severity::Panic),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => Severity::Trace,
            Level::DEBUG => Severity::Debug,
            Level::INFO => Severity::Info,
            Level::WARN => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl From<Severity> for LevelFilter {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Trace => LevelFilter::TRACE,
            Severity::Debug => LevelFilter::DEBUG,
            Severity::Info => LevelFilter::INFO,
            Severity::Warn => LevelFilter::WARN,
            Severity::Error | Severity::Fatal | Severity::Panic => LevelFilter::ERROR,
        }
    }
}
