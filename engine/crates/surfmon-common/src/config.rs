//! Configuration management for surfmon

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use surfmon_core::{Error, Result};

/// Default number of cache entries kept per store
pub const DEFAULT_MAX_ENTRIES: usize = 16;

/// Upper bound accepted for `cache.max_entries`
pub const MAX_ENTRIES_LIMIT: usize = 1024;

/// File name of the default cache, placed in the user's home directory
pub const DEFAULT_CACHE_FILE: &str = ".surfmon.db";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Snapshot cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Local collector settings
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Merge with environment variables (SURFMON_ prefix)
    pub fn merge_env(self) -> Self {
        self.merge_vars(std::env::vars())
    }

    /// Merge with an explicit set of SURFMON_* variables
    pub fn merge_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, val) in vars {
            let val = val.into();
            match key.as_ref() {
                "SURFMON_CACHE_PATH" => self.cache.path = Some(PathBuf::from(val)),
                "SURFMON_MAX_ENTRIES" => {
                    if let Ok(n) = val.parse() {
                        self.cache.max_entries = n;
                    }
                }
                "SURFMON_SHELL" => self.collector.shell = val,
                "SURFMON_LOG_LEVEL" => self.logging.level = val,
                "SURFMON_LOG_FORMAT" => self.logging.format = val,
                _ => {}
            }
        }
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.cache.max_entries < 1 || self.cache.max_entries > MAX_ENTRIES_LIMIT {
            return Err(Error::InvalidConfig {
                key: "cache.max_entries".into(),
                message: format!(
                    "maximum number of cache entries invalid or set too high [1-{}]",
                    MAX_ENTRIES_LIMIT
                ),
            });
        }
        if self.collector.shell.trim().is_empty() {
            return Err(Error::InvalidConfig {
                key: "collector.shell".into(),
                message: "shell must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Resolved cache location: configured path, else `$HOME/.surfmon.db`
    pub fn cache_path(&self) -> PathBuf {
        self.cache.path.clone().unwrap_or_else(default_cache_path)
    }
}

/// Default cache location, falling back to the working directory without a home
pub fn default_cache_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_CACHE_FILE)
}

/// Snapshot cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache file location (default: $HOME/.surfmon.db)
    pub path: Option<PathBuf>,

    /// Entries kept after each run
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Local collector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Shell used to run probe commands
    #[serde(default = "default_shell")]
    pub shell: String,
}

fn default_shell() -> String {
    String::from("/bin/sh")
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    String::from("warn")
}

fn default_log_format() -> String {
    String::from("compact")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Builder for constructing Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cache.path = Some(path.into());
        self
    }

    pub fn max_entries(mut self, n: usize) -> Self {
        self.config.cache.max_entries = n;
        self
    }

    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.config.collector.shell = shell.into();
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [cache]
            path = "/var/lib/surfmon/cache.json"
            max_entries = 32

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(
            config.cache_path(),
            PathBuf::from("/var/lib/surfmon/cache.json")
        );
        assert_eq!(config.cache.max_entries, 32);
        assert_eq!(config.collector.shell, "/bin/sh");
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("surfmon.toml");
        std::fs::write(&path, "[cache]\nmax_entries = 4\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.cache.max_entries, 4);
        assert!(Config::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .cache_path("/tmp/cache.db")
            .max_entries(8)
            .log_level("info")
            .build();

        assert_eq!(config.cache_path(), PathBuf::from("/tmp/cache.db"));
        assert_eq!(config.cache.max_entries, 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_merge_vars() {
        let config = Config::default().merge_vars([
            ("SURFMON_MAX_ENTRIES", "3"),
            ("SURFMON_LOG_LEVEL", "trace"),
            ("SURFMON_CACHE_PATH", "/srv/cache.db"),
            ("UNRELATED", "x"),
        ]);

        assert_eq!(config.cache.max_entries, 3);
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.cache_path(), PathBuf::from("/srv/cache.db"));
    }

    #[test]
    fn test_merge_vars_ignores_unparsable_number() {
        let config = Config::default().merge_vars([("SURFMON_MAX_ENTRIES", "lots")]);
        assert_eq!(config.cache.max_entries, DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(Config::builder().max_entries(0).build().validate().is_err());
        assert!(Config::builder().max_entries(1).build().validate().is_ok());
        assert!(Config::builder().max_entries(1024).build().validate().is_ok());
        assert!(Config::builder().max_entries(1025).build().validate().is_err());
        assert!(Config::builder().shell(" ").build().validate().is_err());
    }
}
