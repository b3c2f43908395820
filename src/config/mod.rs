use config::{Config, File};
use serde::{Deserialize, Serialize};

pub mod validator;

use crate::cli::Cli;

/// Application settings, layered from `ergane.toml`, `ERGANE_*` environment
/// variables, and CLI overrides (CLI > env > file > defaults).
#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Rate limit for the publish endpoint.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,
    /// Publish requests allowed per hourly window.
    #[serde(default = "default_publish_per_hour")]
    pub publish_per_hour: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            publish_per_hour: default_publish_per_hour(),
        }
    }
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_publish_per_hour() -> u32 {
    3
}

/// Knobs for bulk ingestion and detection.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeneratorConfig {
    /// Maximum accepted upload size for CSV/JSON ingestion, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Row-sample bound for column type detection during bulk ingestion.
    #[serde(default = "default_detect_sample_limit")]
    pub detect_sample_limit: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            detect_sample_limit: default_detect_sample_limit(),
        }
    }
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_detect_sample_limit() -> usize {
    200
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_sources(std::path::Path::new("ergane.toml"), None)
    }

    /// Create settings from CLI arguments (config file plus CLI overrides).
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        Self::from_sources(&cli.config, Some(cli))
    }

    fn from_sources(
        config_path: &std::path::Path,
        cli: Option<&Cli>,
    ) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix("ERGANE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3100)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        if let Some(cli) = cli {
            settings.apply_cli_overrides(cli);
        }

        validator::ConfigValidator::validate(&settings).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;

        Ok(settings)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(publish_per_hour) = cli.publish_per_hour {
            self.rate_limit.publish_per_hour = publish_per_hour;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new().expect("default settings load");
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3100);
        assert!(settings.rate_limit.enabled);
        assert_eq!(settings.rate_limit.publish_per_hour, 3);
        assert_eq!(settings.generator.detect_sample_limit, 200);
    }
}
