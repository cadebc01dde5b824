//! Daemon configuration with TOML file support.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use village_community::CitySeed;
use village_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the village daemon.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; every field
/// has a default so an empty file is valid. The mail provider key is not
/// part of the file.
#[derive(Clone, Debug, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// LMDB map size in mebibytes.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "debug,village_rpc=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Public URL of the web client, linked from emails.
    #[serde(default = "default_app_url")]
    pub app_url: String,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    #[serde(default = "default_mail_api_url")]
    pub mail_api_url: String,

    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Approved cities inserted at start when missing.
    #[serde(default)]
    pub seed_cities: Vec<CitySeed>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./village_data")
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_map_size_mb() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_mail_from() -> String {
    "YC Startup Village <noreply@ycaisus.mubashirs.com>".to_string()
}

fn default_mail_api_url() -> String {
    village_mail::client::DEFAULT_API_URL.to_string()
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind_addr: default_bind_addr(),
            http_port: default_http_port(),
            map_size_mb: default_map_size_mb(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            app_url: default_app_url(),
            mail_from: default_mail_from(),
            mail_api_url: default_mail_api_url(),
            enable_cors: default_true(),
            seed_cities: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.data_dir, PathBuf::from("./village_data"));
        assert_eq!(config.map_size_bytes(), 256 * 1024 * 1024);
        assert_eq!(config.log_format, LogFormat::Human);
        assert!(config.enable_cors);
        assert!(config.seed_cities.is_empty());
        assert_eq!(config.mail_api_url, "https://api.resend.com/emails");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            http_port = 8080
            log_format = "json"
            enable_cors = false

            [[seed_cities]]
            city_name = "San Francisco"
            country = "USA"
            region = "California"
            tier = 1

            [[seed_cities]]
            city_name = "Toronto"
            country = "Canada"
        "#;
        let config = DaemonConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.enable_cors);
        assert_eq!(config.log_level, "info"); // default
        assert_eq!(config.seed_cities.len(), 2);
        assert_eq!(config.seed_cities[0].tier, 1);
        assert_eq!(config.seed_cities[1].region, None);
    }

    #[test]
    fn bad_values_are_parse_errors() {
        let err = DaemonConfig::from_toml_str("http_port = \"eighty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = DaemonConfig::from_toml_str("log_format = \"pretty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "http_port = 4000").unwrap();
        let config = DaemonConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.http_port, 4000);
    }

    #[test]
    fn missing_file_returns_read_error() {
        let result = DaemonConfig::from_toml_file(Path::new("/nonexistent/village.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
