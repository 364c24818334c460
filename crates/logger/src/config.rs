use crate::Fields;
use report::ErrorHookConfig;
use serde::Deserialize;

/// Declarative logger configuration.
///
/// Field names follow the configuration files this is usually read from
/// (`log_level`, `log_file`, ...). Every field is optional; the default value
/// configures an `info` logger writing plain text to standard error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum severity, parsed case-insensitively. Empty keeps `info`.
    #[serde(rename = "log_level", alias = "level")]
    pub level: String,

    /// Log file path. Empty writes to the default sink.
    #[serde(rename = "log_file", alias = "file")]
    pub file: String,

    /// Never color output, even when the sink is a terminal.
    pub disable_colors: bool,

    /// Quote empty field values instead of leaving them bare.
    pub quote_empty_fields: bool,

    /// `chrono` strftime format. Empty means RFC 3339 with nanoseconds.
    pub ts_format: String,

    /// Fields attached to every entry. `None` and an empty map are equivalent.
    pub fields: Option<Fields>,

    /// Configuration for the error-reporting hook. `None` disables it.
    #[serde(alias = "bugsnag")]
    pub error_hook: Option<ErrorHookConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_file_layout() {
        let config: LoggingConfig = serde_json::from_value(json!({
            "log_level": "debug",
            "log_file": "/var/log/app.log",
            "disable_colors": true,
            "ts_format": "%H:%M:%S",
            "fields": {"service": "api", "replicas": 3, "canary": false},
            "bugsnag": {"api_key": "0123456789abcdef0123456789abcdef"},
        }))
        .unwrap();

        assert_eq!(config.level, "debug");
        assert_eq!(config.file, "/var/log/app.log");
        assert!(config.disable_colors);
        assert!(!config.quote_empty_fields);
        assert_eq!(config.ts_format, "%H:%M:%S");

        let fields = config.fields.unwrap();
        assert_eq!(fields["service"], json!("api"));
        assert_eq!(fields["replicas"], json!(3));
        assert_eq!(fields["canary"], json!(false));

        let hook = config.error_hook.unwrap();
        assert_eq!(hook.api_key, "0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn empty_document_is_default() {
        let config: LoggingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn null_fields_are_absent() {
        let config: LoggingConfig = serde_json::from_str(r#"{"fields": null}"#).unwrap();
        assert_eq!(config.fields, None);
    }
}
