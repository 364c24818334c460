use crate::{Error, ErrorHookConfig};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A single error-level log entry forwarded to the reporting hook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Lowercase severity name: `error`, `fatal` or `panic`.
    pub severity: String,
    pub message: String,
    /// Set for entries after which the process stops (`fatal`, `panic`).
    pub unhandled: bool,
    /// Every field carried by the entry, static fields included.
    pub metadata: BTreeMap<String, Value>,
}

/// An external error-reporting integration.
///
/// The logger calls [`Reporter::configure`] exactly once while it is being
/// configured, with `None` when no hook configuration was supplied. A
/// returned error aborts logger configuration. Once configured with a value,
/// the reporter receives every entry at `error` severity or above through
/// [`Reporter::notify`].
pub trait Reporter: Send + Sync {
    /// Prepares the integration. `None` means the hook is disabled.
    ///
    /// Called once, before any report. An error makes logger configuration
    /// fail as a whole.
    fn configure(&self, config: Option<&ErrorHookConfig>) -> Result<(), Error>;

    /// Delivers one report. Delivery failures are the reporter's concern and
    /// never reach the caller.
    fn notify(&self, report: &ErrorReport);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn configure(&self, config: Option<&ErrorHookConfig>) -> Result<(), Error> {
        (**self).configure(config)
    }

    fn notify(&self, report: &ErrorReport) {
        (**self).notify(report)
    }
}

/// Accepts any configuration and drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn configure(&self, _config: Option<&ErrorHookConfig>) -> Result<(), Error> {
        Ok(())
    }

    fn notify(&self, _report: &ErrorReport) {}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps the accepted configuration and every delivered report in memory.
///
/// Share it behind an [`Arc`] to inspect what a logger reported.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    config: Mutex<Option<ErrorHookConfig>>,
    reports: Mutex<Vec<ErrorReport>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration accepted by the last successful `configure` call.
    pub fn config(&self) -> Option<ErrorHookConfig> {
        lock(&self.config).clone()
    }

    /// Reports delivered so far, oldest first.
    pub fn reports(&self) -> Vec<ErrorReport> {
        lock(&self.reports).clone()
    }
}

impl Reporter for RecordingReporter {
    fn configure(&self, config: Option<&ErrorHookConfig>) -> Result<(), Error> {
        if let Some(config) = config {
            config.validate()?;
        }
        *lock(&self.config) = config.cloned();
        Ok(())
    }

    fn notify(&self, report: &ErrorReport) {
        let deliver = lock(&self.config)
            .as_ref()
            .is_some_and(ErrorHookConfig::should_notify);
        if deliver {
            lock(&self.reports).push(report.clone());
        }
    }
}

/// Writes each report as one JSON object per line.
///
/// Each line carries the release stage and app version next to the report
/// itself. Write failures are ignored.
pub struct JsonLinesReporter<W> {
    writer: Mutex<W>,
    config: Mutex<Option<ErrorHookConfig>>,
}

impl<W: Write + Send> JsonLinesReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            config: Mutex::new(None),
        }
    }

    /// Consumes the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Reporter for JsonLinesReporter<W> {
    fn configure(&self, config: Option<&ErrorHookConfig>) -> Result<(), Error> {
        if let Some(config) = config {
            config.validate()?;
        }
        *lock(&self.config) = config.cloned();
        Ok(())
    }

    fn notify(&self, report: &ErrorReport) {
        let line = {
            let config = lock(&self.config);
            let Some(config) = config.as_ref().filter(|c| c.should_notify()) else {
                return;
            };
            json!({
                "release_stage": config.release_stage(),
                "app_version": config.app_version,
                "report": report,
            })
        };

        let mut writer = lock(&self.writer);
        let _ = writeln!(writer, "{line}").and_then(|()| writer.flush());
    }
}
