use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A severity name that is not one of `trace`, `debug`, `info`, `warn`,
/// `error`, `fatal` or `panic`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
///
/// Carries the rejected input verbatim.
#[error("not a valid log level: {0:?}")]
pub struct ParseSeverityError(pub String);

/// Error types that can occur while configuring or installing a logger.
///
/// Every variant returned by [`crate::Configurator::configure`] is terminal:
/// no logger is produced and startup is expected to stop.
#[derive(Debug, Error)]
pub enum Error {
    /// The log file could not be opened for appending.
    #[error("failed to open log file {}: {source}", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configured level is not a known severity.
    #[error(transparent)]
    Level(#[from] ParseSeverityError),

    /// The error-reporting integration refused its configuration.
    #[error("failed to configure error-reporting hook: {0}")]
    Hook(#[source] report::Error),

    /// A global `tracing` subscriber is already installed.
    #[error("failed to install global subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// A `log` facade logger is already installed.
    #[error("failed to install log bridge: {0}")]
    LogBridge(#[from] log::SetLoggerError),
}
