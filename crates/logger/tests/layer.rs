mod common;

use common::{API_KEY, SharedBuffer};
use logger::report::{ErrorHookConfig, RecordingReporter};
use logger::{Configurator, Fields, LoggingConfig};
use serde_json::json;
use std::sync::Arc;

fn configured(level: &str) -> (logger::Logger, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let config = LoggingConfig {
        level: level.to_string(),
        ts_format: "ts".into(),
        fields: Some(Fields::from([("service".to_string(), json!("api"))])),
        ..LoggingConfig::default()
    };
    let logger = Configurator::new()
        .with_default_sink(buffer.sink())
        .configure(&config)
        .unwrap();
    (logger, buffer)
}

#[test]
fn tracing_events_use_the_logger_layout() {
    let (logger, buffer) = configured("info");

    tracing::subscriber::with_default(logger.subscriber(), || {
        tracing::info!(attempt = 3, ready = true, "connected to {}", "db");
        tracing::debug!("filtered out");
    });

    assert_eq!(
        buffer.contents(),
        "time=ts level=info msg=\"connected to db\" attempt=3 ready=true service=api\n"
    );
}

#[test]
fn span_fields_are_inherited() {
    let (logger, buffer) = configured("debug");

    tracing::subscriber::with_default(logger.subscriber(), || {
        let outer = tracing::info_span!("request", id = 7, path = "/users");
        let _outer = outer.enter();
        let inner = tracing::debug_span!("query", table = tracing::field::Empty);
        inner.record("table", "users");
        let _inner = inner.enter();
        tracing::warn!(id = 8, "slow");
    });

    assert_eq!(
        buffer.lines().last().unwrap(),
        "time=ts level=warn msg=slow id=8 path=/users service=api table=users"
    );
}

#[test]
fn tracing_errors_reach_the_hook() {
    let reporter = Arc::new(RecordingReporter::new());
    let config = LoggingConfig {
        error_hook: Some(ErrorHookConfig::new(API_KEY)),
        ..LoggingConfig::default()
    };
    let logger = Configurator::new()
        .with_default_sink(SharedBuffer::new().sink())
        .with_reporter(Arc::clone(&reporter))
        .configure(&config)
        .unwrap();

    tracing::subscriber::with_default(logger.subscriber(), || {
        tracing::warn!("ignored");
        tracing::error!(code = 503, "upstream unavailable");
    });

    let reports = reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].message, "upstream unavailable");
    assert_eq!(reports[0].metadata["code"], json!(503));
}

#[test]
fn fatal_level_silences_tracing_errors() {
    let (logger, buffer) = configured("fatal");
    tracing::subscriber::with_default(logger.subscriber(), || {
        tracing::error!("below fatal");
    });
    assert!(buffer.contents().is_empty());
}
