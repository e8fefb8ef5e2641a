// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub max_body_size: u64,
}

/// Storage configuration - selects the JSON backing file location
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Explicit backing file path; takes precedence over everything else
    #[serde(default)]
    pub data_file: Option<String>,
    /// Use the system temp directory instead of ./data (for read-only
    /// deployment filesystems)
    pub tmp_storage: bool,
}

impl StorageConfig {
    /// Resolve the backing file path once at startup.
    /// Precedence: explicit override > temp-dir flag > `data/posts.json`.
    pub fn resolve_data_file(&self) -> PathBuf {
        match &self.data_file {
            Some(path) => PathBuf::from(path),
            None if self.tmp_storage => std::env::temp_dir().join("posts.json"),
            None => PathBuf::from("data").join("posts.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let storage = StorageConfig {
            data_file: Some("/var/lib/board/posts.json".to_string()),
            tmp_storage: true,
        };
        assert_eq!(
            storage.resolve_data_file(),
            PathBuf::from("/var/lib/board/posts.json")
        );
    }

    #[test]
    fn test_tmp_flag_selects_temp_dir() {
        let storage = StorageConfig {
            data_file: None,
            tmp_storage: true,
        };
        assert_eq!(
            storage.resolve_data_file(),
            std::env::temp_dir().join("posts.json")
        );
    }

    #[test]
    fn test_baseline_default_path() {
        let storage = StorageConfig {
            data_file: None,
            tmp_storage: false,
        };
        assert_eq!(
            storage.resolve_data_file(),
            PathBuf::from("data").join("posts.json")
        );
    }
}
