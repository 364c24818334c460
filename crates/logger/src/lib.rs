//! Structured logging configured from a declarative [`LoggingConfig`].
//!
//! [`configure_logging`] (or a customised [`Configurator`]) resolves the
//! formatter, sink, level, error-reporting hook and static fields and returns
//! a [`Logger`] handle. Nothing global is touched unless the handle is
//! explicitly installed with [`Logger::install`].

mod config;
mod configurator;
mod errors;
mod formatter;
mod layer;
mod logger;
mod severity;
mod sink;

pub use config::LoggingConfig;
pub use configurator::{Configurator, configure_logging};
pub use errors::{Error, ParseSeverityError};
pub use formatter::{Record, TextFormatter};
pub use layer::LoggerLayer;
pub use logger::{ERROR_KEY, Fields, Logger};
pub use severity::Severity;
pub use sink::Sink;

pub use report;
