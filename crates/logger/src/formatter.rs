use crate::{Fields, Severity};
use chrono::{DateTime, Local, SecondsFormat};
use colored::Colorize;
use colored::control::SHOULD_COLORIZE;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt::Write;

const MESSAGE_WIDTH: usize = 44;
const RESERVED_KEYS: [&str; 3] = ["time", "level", "msg"];

/// One entry as handed to the formatter.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub time: DateTime<Local>,
    pub severity: Severity,
    pub message: &'a str,
    pub fields: &'a Fields,
}

/// Renders entries as `key=value` text lines.
///
/// The timestamp is always rendered in full. Plain output looks like
///
/// ```text
/// time="2024-05-01T12:00:00.000000001+02:00" level=info msg="started" service=api
/// ```
///
/// and colored output (terminal sinks only) like
///
/// ```text
/// INFO[2024-05-01T12:00:00.000000001+02:00] started                                      service=api
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFormatter {
    /// `chrono` strftime format. `None` renders RFC 3339 with nanoseconds.
    pub timestamp_format: Option<String>,
    pub disable_colors: bool,
    pub quote_empty_fields: bool,
}

impl TextFormatter {
    /// Whether output to a sink should be colored.
    ///
    /// Colors need a terminal sink, `disable_colors` unset, and `colored`'s
    /// environment policy (`NO_COLOR`, `CLICOLOR`, `CLICOLOR_FORCE`, or a
    /// [`colored::control::set_override`]) to allow them.
    pub fn colored(&self, terminal: bool) -> bool {
        terminal && !self.disable_colors && SHOULD_COLORIZE.should_colorize()
    }

    pub fn timestamp(&self, time: &DateTime<Local>) -> String {
        let Some(format) = self.timestamp_format.as_deref() else {
            return time.to_rfc3339_opts(SecondsFormat::Nanos, true);
        };

        // chrono reports unknown specifiers as a formatting error; the format
        // string itself is written instead.
        let mut out = String::new();
        match write!(out, "{}", time.format(format)) {
            Ok(()) => out,
            Err(_) => format.to_string(),
        }
    }

    /// Formats `record` as one newline-terminated line.
    pub fn format(&self, record: &Record<'_>, colored: bool) -> String {
        let message = record.message.strip_suffix('\n').unwrap_or(record.message);
        let timestamp = self.timestamp(&record.time);
        let mut out = String::with_capacity(128);

        if colored {
            let color = record.severity.color();
            let _ = write!(
                out,
                "{}[{timestamp}] {message:<MESSAGE_WIDTH$} ",
                record.severity.tag().color(color)
            );
            for (key, value) in record.fields {
                let _ = write!(out, " {}=", field_key(key).as_ref().color(color));
                self.append_value(&mut out, &render_value(value));
            }
        } else {
            self.append_pair(&mut out, "time", &timestamp);
            self.append_pair(&mut out, "level", record.severity.as_str());
            if !message.is_empty() {
                self.append_pair(&mut out, "msg", message);
            }
            for (key, value) in record.fields {
                self.append_pair(&mut out, &field_key(key), &render_value(value));
            }
        }

        out.push('\n');
        out
    }

    fn append_pair(&self, out: &mut String, key: &str, value: &str) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(key);
        out.push('=');
        self.append_value(out, value);
    }

    fn append_value(&self, out: &mut String, value: &str) {
        if self.needs_quoting(value) {
            let _ = write!(out, "{value:?}");
        } else {
            out.push_str(value);
        }
    }

    fn needs_quoting(&self, text: &str) -> bool {
        if self.quote_empty_fields && text.is_empty() {
            return true;
        }
        text.chars().any(|c| {
            !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
        })
    }
}

/// User fields named like a built-in key are renamed `fields.<key>`.
fn field_key(key: &str) -> Cow<'_, str> {
    if RESERVED_KEYS.contains(&key) {
        Cow::Owned(format!("fields.{key}"))
    } else {
        Cow::Borrowed(key)
    }
}

fn render_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}
