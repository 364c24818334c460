use crate::Error;
use serde::{Deserialize, Serialize};

/// Release stage assumed when the configuration does not name one.
pub const DEFAULT_RELEASE_STAGE: &str = "production";

const API_KEY_LEN: usize = 32;

/// Configuration handed to a [`crate::Reporter`].
///
/// The logger never looks inside this value; only the reporter interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorHookConfig {
    /// Project API key, 32 hexadecimal characters.
    pub api_key: String,
    /// Stage the process runs in, `production` when unset.
    pub release_stage: Option<String>,
    /// Stages in which reports are sent. Empty means every stage.
    pub notify_release_stages: Vec<String>,
    /// Version of the reporting application, attached to every report.
    pub app_version: Option<String>,
}

impl ErrorHookConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Configured release stage, or [`DEFAULT_RELEASE_STAGE`].
    pub fn release_stage(&self) -> &str {
        self.release_stage.as_deref().unwrap_or(DEFAULT_RELEASE_STAGE)
    }

    /// Checks that the configuration is usable by a real reporting backend.
    pub fn validate(&self) -> Result<(), Error> {
        if self.api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }

        let well_formed = self.api_key.len() == API_KEY_LEN
            && self.api_key.chars().all(|c| c.is_ascii_hexdigit());
        if !well_formed {
            return Err(Error::InvalidApiKey(self.api_key.clone()));
        }

        Ok(())
    }

    /// Whether reports should be delivered in the configured release stage.
    pub fn should_notify(&self) -> bool {
        self.notify_release_stages.is_empty()
            || self
                .notify_release_stages
                .iter()
                .any(|stage| stage == self.release_stage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789ABCDEF";

    #[test]
    fn accepts_well_formed_key() {
        assert!(ErrorHookConfig::new(KEY).validate().is_ok());
    }

    #[test]
    fn rejects_missing_key() {
        let err = ErrorHookConfig::default().validate().unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[test]
    fn rejects_malformed_key() {
        let too_long = format!("{KEY}0");
        for key in ["abc", "0123456789abcdef0123456789abcdeg", too_long.as_str()] {
            let err = ErrorHookConfig::new(key).validate().unwrap_err();
            assert!(matches!(err, Error::InvalidApiKey(ref k) if k == key));
        }
    }

    #[test]
    fn release_stage_gating() {
        let mut config = ErrorHookConfig::new(KEY);
        assert!(config.should_notify());

        config.notify_release_stages = vec!["production".into()];
        assert!(config.should_notify());

        config.release_stage = Some("development".into());
        assert!(!config.should_notify());

        config.notify_release_stages.push("development".into());
        assert!(config.should_notify());
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ErrorHookConfig =
            serde_json::from_str(r#"{"api_key": "k", "release_stage": "staging"}"#).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.release_stage(), "staging");
        assert!(config.notify_release_stages.is_empty());
        assert_eq!(config.app_version, None);
    }
}
