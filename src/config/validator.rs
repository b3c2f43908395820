use thiserror::Error;

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if settings.server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }
        if settings.server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "port must be non-zero".to_string(),
            });
        }
        if settings.rate_limit.enabled && settings.rate_limit.publish_per_hour == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "rate_limit.publish_per_hour".to_string(),
                reason: "must allow at least one request per hour when enabled".to_string(),
            });
        }
        if settings.generator.max_upload_bytes == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "generator.max_upload_bytes".to_string(),
                reason: "upload limit must be positive".to_string(),
            });
        }
        if settings.generator.detect_sample_limit == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "generator.detect_sample_limit".to_string(),
                reason: "sample limit must be positive".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorConfig, RateLimitConfig, ServerSettings};

    fn settings() -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3100,
            },
            rate_limit: RateLimitConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(ConfigValidator::validate(&settings()).is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut s = settings();
        s.server.port = 0;
        let errors = ConfigValidator::validate(&s).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_zero_publish_quota_rejected_when_enabled() {
        let mut s = settings();
        s.rate_limit.publish_per_hour = 0;
        assert!(ConfigValidator::validate(&s).is_err());
        s.rate_limit.enabled = false;
        assert!(ConfigValidator::validate(&s).is_ok());
    }
}
