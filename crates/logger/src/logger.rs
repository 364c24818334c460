use crate::formatter::{Record, TextFormatter};
use crate::{Severity, Sink};
use chrono::Local;
use report::{ErrorReport, Reporter};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Key/value pairs carried by a log entry, rendered in key order.
pub type Fields = BTreeMap<String, Value>;

/// Field key used by [`Logger::with_error`].
pub const ERROR_KEY: &str = "error";

/// State shared by a logger and every child derived from it.
pub(crate) struct Core {
    sink: Mutex<Sink>,
    formatter: TextFormatter,
    colored: bool,
    level: Severity,
    hook: Option<Arc<dyn Reporter>>,
    write_failed: AtomicBool,
}

impl Core {
    pub(crate) fn new(sink: Sink, formatter: TextFormatter) -> Self {
        let colored = formatter.colored(sink.is_terminal());
        Self {
            sink: Mutex::new(sink),
            formatter,
            colored,
            level: Severity::default(),
            hook: None,
            write_failed: AtomicBool::new(false),
        }
    }

    pub(crate) fn set_level(&mut self, level: Severity) {
        self.level = level;
    }

    pub(crate) fn set_hook(&mut self, hook: Arc<dyn Reporter>) {
        self.hook = Some(hook);
    }

    pub(crate) fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    /// Writes one entry if `severity` passes the level, then forwards
    /// error entries to the hook.
    pub(crate) fn emit(&self, severity: Severity, message: &str, fields: &Fields) {
        if !self.enabled(severity) {
            return;
        }

        let record = Record {
            time: Local::now(),
            severity,
            message,
            fields,
        };
        let line = self.formatter.format(&record, self.colored);

        let written = self
            .sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_entry(line.as_bytes());
        if let Err(err) = written {
            if !self.write_failed.swap(true, Ordering::Relaxed) {
                eprintln!("failed to write to log: {err}");
            }
        }

        if let Some(hook) = self.hook.as_ref().filter(|_| severity.is_error()) {
            hook.notify(&ErrorReport {
                severity: severity.to_string(),
                message: message.to_string(),
                unhandled: severity >= Severity::Fatal,
                metadata: fields.clone(),
            });
        }
    }
}

macro_rules! leveled {
    ($($severity:ident => $name:ident, $name_with:ident;)*) => {
        $(
            #[doc = concat!("Logs `msg` at `", stringify!($name), "` severity.")]
            pub fn $name(&self, msg: impl fmt::Display) {
                self.log(Severity::$severity, msg);
            }

            #[doc = concat!("Logs `msg` with extra `fields` at `", stringify!($name), "` severity.")]
            pub fn $name_with<I, K, V>(&self, msg: impl fmt::Display, fields: I)
            where
                I: IntoIterator<Item = (K, V)>,
                K: Into<String>,
                V: Into<Value>,
            {
                self.log_with(Severity::$severity, msg, fields);
            }
        )*
    };
}

/// A configured, thread-safe logging handle.
///
/// Cloning is cheap. Children made with [`Logger::with_fields`] share the
/// sink, level and hook of their parent and add their own static fields.
/// Fields passed to an individual call take precedence over static fields
/// with the same key.
///
/// # Thread Safety
/// `Logger` is `Send + Sync`. The sink sits behind a mutex, so each entry is
/// written whole; entries from concurrent callers land in lock order.
///
/// # Lifetime
/// There is no teardown. A file sink stays open until the last clone or
/// child of the handle is dropped.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    fields: Arc<Fields>,
}

impl Logger {
    pub(crate) fn from_core(core: Core, fields: Fields) -> Self {
        Self {
            core: Arc::new(core),
            fields: Arc::new(fields),
        }
    }

    /// Minimum severity this handle writes.
    pub fn level(&self) -> Severity {
        self.core.level
    }

    /// Whether an entry at `severity` would be written.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.core.enabled(severity)
    }

    /// Static fields attached to every entry of this handle.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Child handle with one more static field.
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_fields([(key, value)])
    }

    /// Child handle with `fields` merged over this handle's static fields.
    pub fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut merged = (*self.fields).clone();
        merged.extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self {
            core: Arc::clone(&self.core),
            fields: Arc::new(merged),
        }
    }

    /// Child handle carrying `err` under the `error` key.
    pub fn with_error(&self, err: &dyn std::error::Error) -> Self {
        self.with_field(ERROR_KEY, err.to_string())
    }

    /// Writes `msg` at `severity`.
    ///
    /// Unlike [`Logger::fatal`] and [`Logger::panic`], this never exits or
    /// panics, whatever the severity.
    pub fn log(&self, severity: Severity, msg: impl fmt::Display) {
        self.log_with(severity, msg, std::iter::empty::<(String, Value)>());
    }

    /// Writes `msg` at `severity` with extra `fields` for this entry only.
    pub fn log_with<I, K, V>(&self, severity: Severity, msg: impl fmt::Display, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        if !self.enabled(severity) {
            return;
        }
        let mut entry = (*self.fields).clone();
        entry.extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.core.emit(severity, &msg.to_string(), &entry);
    }

    leveled! {
        Trace => trace, trace_with;
        Debug => debug, debug_with;
        Info => info, info_with;
        Warn => warn, warn_with;
        Error => error, error_with;
    }

    /// Logs `msg` at `fatal` severity, then exits the process with status 1.
    pub fn fatal(&self, msg: impl fmt::Display) -> ! {
        self.log(Severity::Fatal, msg);
        std::process::exit(1)
    }

    pub fn fatal_with<I, K, V>(&self, msg: impl fmt::Display, fields: I) -> !
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.log_with(Severity::Fatal, msg, fields);
        std::process::exit(1)
    }

    /// Logs `msg` at `panic` severity, then panics with the same message.
    pub fn panic(&self, msg: impl fmt::Display) -> ! {
        let msg = msg.to_string();
        self.log(Severity::Panic, &msg);
        panic!("{msg}")
    }

    pub fn panic_with<I, K, V>(&self, msg: impl fmt::Display, fields: I) -> !
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let msg = msg.to_string();
        self.log_with(Severity::Panic, &msg, fields);
        panic!("{msg}")
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.core.level)
            .field("fields", &self.fields)
            .field("hook", &self.core.hook.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report::RecordingReporter;
    use std::io;

    struct BrokenPipe;

    impl io::Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_do_not_propagate() {
        let reporter = Arc::new(RecordingReporter::new());
        reporter
            .configure(Some(&report::ErrorHookConfig::new(
                "0123456789abcdef0123456789abcdef",
            )))
            .unwrap();

        let mut core = Core::new(Sink::writer(BrokenPipe), TextFormatter::default());
        core.set_hook(reporter.clone());
        let logger = Logger::from_core(core, Fields::new());

        logger.error("first");
        logger.error("second");

        assert!(logger.core.write_failed.load(Ordering::Relaxed));
        assert_eq!(reporter.reports().len(), 2);
    }

    #[test]
    fn debug_output_hides_sink() {
        let core = Core::new(Sink::writer(Vec::new()), TextFormatter::default());
        let logger = Logger::from_core(core, Fields::new()).with_field("k", "v");
        let debug = format!("{logger:?}");
        assert!(debug.contains("level: Info"), "{debug}");
        assert!(debug.contains("hook: false"), "{debug}");
    }
}
