use crate::logger::Core;
use crate::{Error, Fields, Logger, LoggingConfig, Severity, Sink, TextFormatter};
use report::{NoopReporter, Reporter};
use std::sync::Arc;

/// Turns a [`LoggingConfig`] into a [`Logger`].
///
/// The default configurator writes to standard error when no log file is
/// configured and hands the hook configuration to a [`NoopReporter`].
/// Both can be replaced before calling [`Configurator::configure`], which
/// consumes the configurator.
///
/// # Usage
/// ```ignore
/// let logger = Configurator::new()
///     .with_reporter(JsonLinesReporter::new(std::io::stderr()))
///     .configure(&config)?;
/// logger.info("started");
/// ```
pub struct Configurator {
    reporter: Arc<dyn Reporter>,
    default_sink: Sink,
}

impl Default for Configurator {
    fn default() -> Self {
        Self {
            reporter: Arc::new(NoopReporter),
            default_sink: Sink::stderr(),
        }
    }
}

impl Configurator {
    /// Configurator writing to standard error with a no-op reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Error-reporting integration configured with `error_hook`.
    ///
    /// Pass an `Arc` to keep a handle on the reporter after configuration.
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    /// Sink used when the configuration names no log file.
    pub fn with_default_sink(mut self, sink: Sink) -> Self {
        self.default_sink = sink;
        self
    }

    /// Builds a logger from `config`.
    ///
    /// Steps run in order: formatter, sink, level, error hook, static fields.
    /// The first failing step aborts the whole operation. Opening a log file
    /// logs `Set output file to <path>` through it, and setting a level logs
    /// `Set log level to: <level>` at debug severity.
    pub fn configure(self, config: &LoggingConfig) -> Result<Logger, Error> {
        let formatter = TextFormatter {
            timestamp_format: (!config.ts_format.is_empty()).then(|| config.ts_format.clone()),
            disable_colors: config.disable_colors,
            quote_empty_fields: config.quote_empty_fields,
        };

        let sink = if config.file.is_empty() {
            self.default_sink
        } else {
            Sink::open(&config.file).map_err(|source| Error::OpenFile {
                path: config.file.clone().into(),
                source,
            })?
        };

        let mut core = Core::new(sink, formatter);
        if !config.file.is_empty() {
            core.emit(
                Severity::Info,
                &format!("Set output file to {}", config.file),
                &Fields::new(),
            );
        }

        if !config.level.is_empty() {
            let level: Severity = config.level.parse()?;
            core.set_level(level);
            core.emit(
                Severity::Debug,
                &format!("Set log level to: {level}"),
                &Fields::new(),
            );
        }

        self.reporter
            .configure(config.error_hook.as_ref())
            .map_err(Error::Hook)?;
        if config.error_hook.is_some() {
            core.set_hook(self.reporter);
        }

        let fields: Fields = config
            .fields
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Logger::from_core(core, fields))
    }
}

/// Configures a logger with the default [`Configurator`].
pub fn configure_logging(config: &LoggingConfig) -> Result<Logger, Error> {
    Configurator::new().configure(config)
}
