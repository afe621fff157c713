//! Configuration management for sectxt.
//!
//! Structured options loaded from environment variables and then overridden
//! by command-line arguments. Centralizes network limits (timeouts, redirect
//! budget, body size, concurrency) and output preferences.

use std::time::Duration;

use crate::cli::{Cli, OutputFormat};

/// Main configuration structure for sectxt.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Network operation settings
    pub network: NetworkConfig,

    /// Output preferences
    pub output: OutputConfig,
}

/// Network-related configuration options
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Total timeout for one document fetch (connect + transfer)
    pub fetch_timeout: Duration,

    /// Timeout for establishing the connection
    pub connect_timeout: Duration,

    /// Maximum number of redirects followed
    pub max_redirects: usize,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Largest accepted document body (in bytes)
    pub max_document_bytes: usize,

    /// Maximum number of hosts resolved at the same time
    pub max_concurrent_lookups: usize,
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Rendering format
    pub format: OutputFormat,

    /// Whether to include tool name / version / timestamp
    pub include_metadata: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            max_redirects: 10,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
            max_document_bytes: 1024 * 1024, // 1 MiB
            max_concurrent_lookups: 8,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            include_metadata: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("SECTXT_FETCH_TIMEOUT_SECS")
            && let Ok(secs) = timeout.parse::<u64>()
        {
            config.network.fetch_timeout = Duration::from_secs(secs);
        }

        if let Ok(timeout) = std::env::var("SECTXT_CONNECT_TIMEOUT_SECS")
            && let Ok(secs) = timeout.parse::<u64>()
        {
            config.network.connect_timeout = Duration::from_secs(secs);
        }

        if let Ok(redirects) = std::env::var("SECTXT_MAX_REDIRECTS")
            && let Ok(n) = redirects.parse::<usize>()
        {
            config.network.max_redirects = n;
        }

        if let Ok(limit) = std::env::var("SECTXT_MAX_DOCUMENT_BYTES")
            && let Ok(n) = limit.parse::<usize>()
        {
            config.network.max_document_bytes = n;
        }

        if let Ok(concurrency) = std::env::var("SECTXT_MAX_CONCURRENT")
            && let Ok(n) = concurrency.parse::<usize>()
        {
            config.network.max_concurrent_lookups = n;
        }

        if let Ok(agent) = std::env::var("SECTXT_USER_AGENT") {
            config.network.user_agent = agent;
        }

        config
    }

    /// Merge with CLI arguments, giving CLI precedence
    pub fn merge_with_cli(&mut self, cli: &Cli) {
        if let Some(secs) = cli.timeout {
            self.network.fetch_timeout = Duration::from_secs(secs);
            if self.network.connect_timeout > self.network.fetch_timeout {
                self.network.connect_timeout = self.network.fetch_timeout;
            }
        }

        if let Some(n) = cli.concurrency {
            self.network.max_concurrent_lookups = n;
        }

        self.output.format = cli.format;
        if cli.no_metadata {
            self.output.include_metadata = false;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.fetch_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "network.fetch_timeout".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.network.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "network.connect_timeout".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.network.max_document_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "network.max_document_bytes".to_string(),
                value: "0".to_string(),
                reason: "Document size limit must be greater than 0".to_string(),
            });
        }

        if self.network.max_concurrent_lookups == 0 {
            return Err(ConfigError::InvalidValue {
                field: "network.max_concurrent_lookups".to_string(),
                value: "0".to_string(),
                reason: "At least one lookup must be allowed".to_string(),
            });
        }

        if self.network.user_agent.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "network.user_agent".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Missing required configuration
    MissingRequired { field: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for '{}': {}", value, field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required configuration field: {}", field)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.network.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.network.max_redirects, 10);
        assert!(config.network.user_agent.starts_with("sectxt/"));
        assert!(config.output.include_metadata);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.network.fetch_timeout = Duration::from_secs(0);
        assert!(config.validate().is_err());

        config.network.fetch_timeout = Duration::from_secs(5);
        config.network.max_concurrent_lookups = 0;
        assert!(config.validate().is_err());

        config.network.max_concurrent_lookups = 1;
        config.network.user_agent = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired { .. })
        ));
    }

    #[test]
    fn test_env_loading() {
        unsafe {
            env::set_var("SECTXT_FETCH_TIMEOUT_SECS", "15");
            env::set_var("SECTXT_MAX_CONCURRENT", "3");
            env::set_var("SECTXT_MAX_REDIRECTS", "not-a-number");
        }

        let config = Config::from_env();
        assert_eq!(config.network.fetch_timeout, Duration::from_secs(15));
        assert_eq!(config.network.max_concurrent_lookups, 3);
        assert_eq!(config.network.max_redirects, 10);

        // Clean up
        unsafe {
            env::remove_var("SECTXT_FETCH_TIMEOUT_SECS");
            env::remove_var("SECTXT_MAX_CONCURRENT");
            env::remove_var("SECTXT_MAX_REDIRECTS");
        }
    }

    #[test]
    fn test_cli_precedence() {
        let cli = Cli::parse_from([
            "sectxt",
            "--timeout",
            "2",
            "--concurrency",
            "4",
            "--format",
            "yaml",
            "--no-metadata",
            "example.com",
        ]);
        let mut config = Config::default();
        config.merge_with_cli(&cli);
        assert_eq!(config.network.fetch_timeout, Duration::from_secs(2));
        assert_eq!(config.network.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.network.max_concurrent_lookups, 4);
        assert_eq!(config.output.format, OutputFormat::Yaml);
        assert!(!config.output.include_metadata);
    }
}
