use crate::{Error, Fields, Logger, Severity};
use serde_json::{Number, Value};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_log::LogTracer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

const MESSAGE_FIELD: &str = "message";
// Metadata fields added by `tracing-log` to events bridged from `log`.
const LOG_FIELD_PREFIX: &str = "log.";

/// Renders `tracing` events through a [`Logger`].
///
/// Fields recorded on enclosing spans are attached to every event inside
/// them, outermost span first, with the event's own fields taking
/// precedence.
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    logger: Logger,
}

/// Fields recorded on a span, kept in its extensions.
struct SpanFields(Fields);

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Fields,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name().starts_with(LOG_FIELD_PREFIX) {
            return;
        }
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = Number::from_f64(value)
            .map_or_else(|| Value::String(value.to_string()), Value::Number);
        self.insert(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, value.into());
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, value.to_string().into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(format!("{value:?}"));
        } else {
            self.insert(field, format!("{value:?}").into());
        }
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        span.extensions_mut().insert(SpanFields(visitor.fields));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::default();
        values.record(&mut visitor);

        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanFields>() {
            Some(SpanFields(fields)) => fields.extend(visitor.fields),
            None => extensions.insert(SpanFields(visitor.fields)),
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let severity = Severity::from(*event.metadata().level());
        if !self.logger.enabled(severity) {
            return;
        }

        let mut fields = Fields::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(SpanFields(span_fields)) = span.extensions().get::<SpanFields>() {
                    fields.extend(span_fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        fields.extend(visitor.fields);

        self.logger
            .log_with(severity, visitor.message.unwrap_or_default(), fields);
    }
}

impl Logger {
    /// A [`Layer`] rendering `tracing` events through this logger.
    pub fn layer(&self) -> LoggerLayer {
        LoggerLayer {
            logger: self.clone(),
        }
    }

    /// This logger's level as a `tracing` filter. `fatal` and `panic` map to
    /// `ERROR`; the layer drops what the filter lets through below them.
    pub fn level_filter(&self) -> LevelFilter {
        self.level().into()
    }

    /// A standalone subscriber filtered at this logger's level, for use with
    /// [`tracing::subscriber::with_default`] or [`tracing::dispatcher`].
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry()
            .with(self.level_filter())
            .with(self.layer())
    }

    /// Makes this logger the process-wide destination of `tracing` events
    /// and of records sent through the `log` facade.
    ///
    /// `RUST_LOG` directives narrow what reaches the logger; entries below
    /// the logger's own level are dropped regardless.
    ///
    /// # Errors
    /// * [`Error::LogBridge`] if a `log` logger is already installed. Nothing
    ///   is changed in that case.
    /// * [`Error::Install`] if a global `tracing` subscriber is already
    ///   installed. The `log` bridge set up by the first step stays in place
    ///   and forwards to that existing subscriber.
    pub fn install(&self) -> Result<(), Error> {
        LogTracer::init()?;

        let filter = EnvFilter::builder()
            .with_default_directive(self.level_filter().into())
            .from_env_lossy();
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(self.layer());
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(())
    }
}
