use clap::Parser;
use ergane::cli::Cli;
use ergane::config::Settings;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_settings_from_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("ergane.toml");

    let ergane_toml = r#"
[server]
host = "0.0.0.0"
port = 4000

[rate_limit]
enabled = true
publish_per_hour = 5

[generator]
max_upload_bytes = 1048576
detect_sample_limit = 50
"#;
    fs::write(&config_path, ergane_toml)?;

    let cli = Cli::parse_from(["ergane", "--config", config_path.to_str().unwrap()]);
    let settings = Settings::new_with_cli(&cli)?;

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 4000);
    assert_eq!(settings.rate_limit.publish_per_hour, 5);
    assert_eq!(settings.generator.detect_sample_limit, 50);
    Ok(())
}

#[test]
fn test_cli_overrides_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("ergane.toml");
    fs::write(&config_path, "[server]\nhost = \"0.0.0.0\"\nport = 4000\n")?;

    let cli = Cli::parse_from([
        "ergane",
        "--config",
        config_path.to_str().unwrap(),
        "--port",
        "5000",
        "--publish-per-hour",
        "7",
    ]);
    let settings = Settings::new_with_cli(&cli)?;

    assert_eq!(settings.server.port, 5000);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.rate_limit.publish_per_hour, 7);
    Ok(())
}

#[test]
fn test_missing_file_falls_back_to_defaults() -> anyhow::Result<()> {
    let cli = Cli::parse_from(["ergane", "--config", "/nonexistent/ergane.toml"]);
    let settings = Settings::new_with_cli(&cli)?;
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 3100);
    Ok(())
}

#[test]
fn test_invalid_settings_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("ergane.toml");
    fs::write(
        &config_path,
        "[server]\nhost = \"127.0.0.1\"\nport = 3100\n\n[generator]\nmax_upload_bytes = 0\n",
    )?;

    let cli = Cli::parse_from(["ergane", "--config", config_path.to_str().unwrap()]);
    let result = Settings::new_with_cli(&cli);
    assert!(result.is_err());
    Ok(())
}
