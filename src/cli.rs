use clap::Parser;
use std::path::PathBuf;

/// Ergane - definition-to-code compiler service for forms and tables
#[derive(Parser, Debug, Clone)]
#[command(name = "ergane", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "ERGANE_CONFIG", default_value = "ergane.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "ERGANE_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "ERGANE_PORT")]
    pub port: Option<u16>,

    /// Publish requests allowed per hour
    #[arg(long, env = "ERGANE_PUBLISH_PER_HOUR")]
    pub publish_per_hour: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["ergane"]);
        assert_eq!(cli.config, PathBuf::from("ergane.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from(["ergane", "--port", "8080", "--publish-per-hour", "10"]);
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.publish_per_hour, Some(10));
    }
}
