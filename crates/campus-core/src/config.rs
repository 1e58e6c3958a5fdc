//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server and avatar-storage sections. Every section defaults sensibly so a
//! completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub avatars: AvatarConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            avatars: AvatarConfig::default(),
        }
    }
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    ///
    /// This is intentionally string-based so the caller can read the file
    /// however it sees fit (async, embedded, etc.).
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Check the configuration for suspicious values.
    ///
    /// Returns human-readable warnings; an empty vector means the config
    /// looks sane.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.host.is_empty() {
            warnings.push("server.host is empty".to_string());
        }
        if self.server.port == 0 {
            warnings.push("server.port is 0; the OS will pick a random port".to_string());
        }
        if self.server.pool_size == 0 {
            warnings.push("server.pool_size is 0; no database connection can be opened".to_string());
        }
        if self.avatars.dir.as_os_str().is_empty() {
            warnings.push("avatars.dir is empty; files would land in the working directory".to_string());
        }

        warnings
    }
}

/// Load configuration from an optional file path.
///
/// A missing path or a path that does not exist yields [`Config::default`];
/// an existing file that fails to parse is an error.
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) if p.exists() => {
            let contents = std::fs::read_to_string(p)?;
            Config::from_json(&contents)
        }
        _ => Ok(Config::default()),
    }
}

/// HTTP server and database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Maximum number of pooled database connections.
    pub pool_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            db_path: PathBuf::from("campus.db"),
            pool_size: 4,
        }
    }
}

/// Avatar file-storage settings.
///
/// The avatars directory is process-wide configuration injected at startup;
/// it is never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Root directory for the on-disk avatar copies.
    pub dir: PathBuf,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("avatars"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_valid() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.avatars.dir, PathBuf::from("avatars"));
    }

    #[test]
    fn partial_json_overrides() {
        let config = Config::from_json(r#"{"server": {"port": 9090}}"#).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn invalid_json_is_error() {
        assert!(Config::from_json("not json").is_err());
    }

    #[test]
    fn default_has_no_warnings() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn zero_port_warns() {
        let mut config = Config::default();
        config.server.port = 0;
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("port"));
    }

    #[test]
    fn zero_pool_size_warns() {
        let mut config = Config::default();
        config.server.pool_size = 0;
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("pool_size"));
    }

    #[test]
    fn load_missing_path_is_default() {
        let config = load_or_default(Some(Path::new("/nonexistent/campus.json"))).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn load_none_is_default() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
