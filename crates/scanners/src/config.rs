//! Configuration consumed by the engine.
//!
//! Values arrive either from a TOML file or from [`Config::default`]; the
//! engine itself only ever sees plain values. Every section tolerates being
//! omitted from the file.

use crate::report::ReportFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transport: TransportConfig,
    pub plugins: PluginConfig,
    pub reports: ReportConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write config file: {}", path.display()))
    }

    /// Commented sample configuration written by `harpoon init-config`.
    pub fn sample() -> &'static str {
        r#"# Harpoon scanner configuration

[transport]
# Upper bound on simultaneous in-flight HTTP requests across all plugins.
max_concurrent_requests = 10

# Per-request timeout in seconds.
request_timeout_secs = 30

# Retries after the first attempt for connection-level failures.
retry_attempts = 3

# Minimum pause after each completed request, in milliseconds. Applied while
# the concurrency permit is still held, so it throttles the request rate.
delay_between_requests_ms = 100

# Base unit of the exponential retry backoff, in milliseconds.
retry_backoff_base_ms = 1000

user_agent = "harpoon/0.1.0 security scanner"
follow_redirects = true
verify_ssl = true

[plugins]
# With a non-empty enabled list, only those plugins run. Disabled always
# overrides enabled.
enabled_plugins = []
disabled_plugins = []

# Directories scanned for external plugin manifests (*.toml).
plugin_directories = []

[reports]
# json, html, txt or xml
default_format = "json"

# Include raw request/response captures in generated reports.
include_request_response = false

[logging]
level = "info"
"#
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub max_concurrent_requests: usize,
    pub request_timeout_secs: u64,
    pub retry_attempts: u32,
    pub delay_between_requests_ms: u64,
    pub retry_backoff_base_ms: u64,
    pub user_agent: String,
    pub follow_redirects: bool,
    pub verify_ssl: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 10,
            request_timeout_secs: 30,
            retry_attempts: 3,
            delay_between_requests_ms: 100,
            retry_backoff_base_ms: 1000,
            user_agent: format!("harpoon/{} security scanner", crate::VERSION),
            follow_redirects: true,
            verify_ssl: true,
        }
    }
}

impl TransportConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn delay_between_requests(&self) -> Duration {
        Duration::from_millis(self.delay_between_requests_ms)
    }

    pub fn retry_backoff_base(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_base_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Allow-list: when non-empty, only these plugins are active.
    pub enabled_plugins: Vec<String>,
    /// Deny-list; overrides the allow-list on conflict.
    pub disabled_plugins: Vec<String>,
    pub plugin_directories: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub default_format: ReportFormat,
    pub include_request_response: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_format: ReportFormat::Json,
            include_request_response: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            parsed.transport.max_concurrent_requests,
            config.transport.max_concurrent_requests
        );
        assert_eq!(parsed.reports.default_format, ReportFormat::Json);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let parsed: Config = toml::from_str("[transport]\nretry_attempts = 1\n").unwrap();
        assert_eq!(parsed.transport.retry_attempts, 1);
        assert_eq!(parsed.transport.max_concurrent_requests, 10);
        assert!(parsed.plugins.enabled_plugins.is_empty());
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_sample_parses() {
        let parsed: Config = toml::from_str(Config::sample()).unwrap();
        assert_eq!(parsed.transport.retry_attempts, 3);
        assert!(!parsed.reports.include_request_response);
    }
}
