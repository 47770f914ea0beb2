use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::utils::FormError;

pub const ENV_MAX_ATTEMPTS: &str = "BL_FORMS_MAX_ATTEMPTS";
pub const ENV_INITIAL_BACKOFF_SECS: &str = "BL_FORMS_INITIAL_BACKOFF_SECS";
pub const ENV_BACKOFF_MULTIPLIER: &str = "BL_FORMS_BACKOFF_MULTIPLIER";

/// Tunables for the extraction pipeline.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Total model attempts, the first call included.
    pub max_attempts: u32,
    /// Pause before the second attempt, in seconds.
    pub initial_backoff_secs: f64,
    /// Factor applied to the pause after each further failure.
    pub backoff_multiplier: f64,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Scan OCR text for an ID/mobile when the model's value is unusable.
    pub enable_recovery: bool,
    pub enable_corrections: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_secs: 1.5,
            backoff_multiplier: 2.0,
            temperature: 0.0,
            max_tokens: 1800,
            enable_recovery: true,
            enable_corrections: true,
        }
    }
}

impl ExtractorConfig {
    /// Load a JSON config file; omitted keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FormError> {
        let text = std::fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Override retry settings from `BL_FORMS_*` environment variables.
    pub fn apply_env(mut self) -> Result<Self, FormError> {
        if let Some(value) = env_value(ENV_MAX_ATTEMPTS)? {
            self.max_attempts = value;
        }
        if let Some(value) = env_value(ENV_INITIAL_BACKOFF_SECS)? {
            self.initial_backoff_secs = value;
        }
        if let Some(value) = env_value(ENV_BACKOFF_MULTIPLIER)? {
            self.backoff_multiplier = value;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.max_attempts == 0 {
            return Err(FormError::Config("max_attempts must be at least 1".to_string()));
        }
        if !self.initial_backoff_secs.is_finite() || self.initial_backoff_secs < 0.0 {
            return Err(FormError::Config(format!(
                "initial_backoff_secs must be a non-negative number, got {}",
                self.initial_backoff_secs
            )));
        }
        if Duration::try_from_secs_f64(self.initial_backoff_secs).is_err() {
            return Err(FormError::Config(format!(
                "initial_backoff_secs is too large, got {}",
                self.initial_backoff_secs
            )));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(FormError::Config(format!(
                "backoff_multiplier must be at least 1, got {}",
                self.backoff_multiplier
            )));
        }
        Ok(())
    }

    /// Saturates at `Duration::MAX` for values `validate` would reject.
    pub fn initial_backoff(&self) -> Duration {
        Duration::try_from_secs_f64(self.initial_backoff_secs).unwrap_or(Duration::MAX)
    }
}

fn env_value<T: std::str::FromStr>(name: &str) -> Result<Option<T>, FormError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| FormError::Config(format!("{} has an invalid value: '{}'", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_documented_retry_policy() {
        let config = ExtractorConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_backoff(), Duration::from_millis(1500));
        assert_eq!(config.backoff_multiplier, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_attempts": 5, "enable_recovery": false}}"#).unwrap();

        let config = ExtractorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert!(!config.enable_recovery);
        assert_eq!(config.max_tokens, 1800);
    }

    #[test]
    fn unknown_keys_and_bad_values_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_attempt": 5}}"#).unwrap();
        assert!(matches!(
            ExtractorConfig::from_file(file.path()),
            Err(FormError::Json(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_attempts": 0}}"#).unwrap();
        assert!(matches!(
            ExtractorConfig::from_file(file.path()),
            Err(FormError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = ExtractorConfig::from_file("/nonexistent/bituach-forms.json");
        assert!(matches!(result, Err(FormError::Io(_))));
    }

    #[test]
    fn env_values_parse_or_fail_loudly() {
        std::env::set_var("BL_FORMS_TEST_ENV_VALUE", " 7 ");
        assert_eq!(env_value::<u32>("BL_FORMS_TEST_ENV_VALUE").unwrap(), Some(7));
        std::env::set_var("BL_FORMS_TEST_ENV_VALUE", "seven");
        assert!(env_value::<u32>("BL_FORMS_TEST_ENV_VALUE").is_err());
        std::env::remove_var("BL_FORMS_TEST_ENV_VALUE");
        assert_eq!(env_value::<u32>("BL_FORMS_TEST_ENV_VALUE").unwrap(), None);
    }

    #[test]
    fn validate_rejects_shrinking_backoff() {
        let config = ExtractorConfig {
            backoff_multiplier: 0.5,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
        let config = ExtractorConfig {
            initial_backoff_secs: f64::NAN,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_backoff_is_a_config_error() {
        let config = ExtractorConfig {
            initial_backoff_secs: 1e30,
            ..ExtractorConfig::default()
        };
        assert!(matches!(config.validate(), Err(FormError::Config(_))));
        assert_eq!(config.initial_backoff(), Duration::MAX);

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"initial_backoff_secs": 1e30}}"#).unwrap();
        assert!(matches!(
            ExtractorConfig::from_file(file.path()),
            Err(FormError::Config(_))
        ));
    }
}
