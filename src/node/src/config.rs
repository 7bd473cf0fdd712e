//! Node configuration loading
//!
//! YAML file first, then `DAG_`-prefixed environment overrides with dots in
//! key paths replaced by underscores (`dag.max_parents` becomes
//! `DAG_DAG_MAX_PARENTS`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_SYNC_INTERVAL: i64 = 30;

/// Complete node configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,

    /// The YAML section keeps the historical `leveldb` name for config-file
    /// compatibility; the backing store is RocksDB.
    #[serde(default, rename = "leveldb")]
    pub storage: StorageSection,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub dag: DagSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// One of debug, info, warn, error; anything else falls back to info
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "stdout" or "file"
    #[serde(default = "default_log_output")]
    pub output: String,

    /// Log file path, used when `output` is "file"
    #[serde(default)]
    pub file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DagSection {
    #[serde(default = "default_max_parents")]
    pub max_parents: usize,

    #[serde(default = "default_weight")]
    pub default_weight: f64,

    /// Base URLs of peers to pull vertices from
    #[serde(default)]
    pub peers: Vec<String>,

    /// Seconds between sync cycles; non-positive values reset to 30
    #[serde(default = "default_sync_interval")]
    pub sync_interval: i64,
}

fn default_listen_addr() -> String {
    ":8080".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/dag")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

fn default_max_parents() -> usize {
    2
}

fn default_weight() -> f64 {
    1.0
}

fn default_sync_interval() -> i64 {
    DEFAULT_SYNC_INTERVAL
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: default_log_output(),
            file: String::new(),
        }
    }
}

impl Default for DagSection {
    fn default() -> Self {
        Self {
            max_parents: default_max_parents(),
            default_weight: default_weight(),
            peers: Vec::new(),
            sync_interval: default_sync_interval(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file and apply environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .context("Failed to read configuration file")?;

        let mut config: Config =
            serde_yaml::from_str(&contents).context("Failed to parse configuration file")?;

        config.apply_env_overrides(|key| std::env::var(key).ok());

        if config.dag.sync_interval <= 0 {
            config.dag.sync_interval = DEFAULT_SYNC_INTERVAL;
        }

        Ok(config)
    }

    fn apply_env_overrides<F: Fn(&str) -> Option<String>>(&mut self, var: F) {
        if let Some(v) = var("DAG_SERVER_LISTEN_ADDR") {
            self.server.listen_addr = v;
        }
        if let Some(v) = var("DAG_LEVELDB_PATH") {
            self.storage.path = PathBuf::from(v);
        }
        if let Some(v) = var("DAG_LOGGING_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("DAG_LOGGING_OUTPUT") {
            self.logging.output = v;
        }
        if let Some(v) = var("DAG_LOGGING_FILE") {
            self.logging.file = v;
        }
        if let Some(v) = var("DAG_DAG_MAX_PARENTS") {
            if let Ok(n) = v.parse() {
                self.dag.max_parents = n;
            }
        }
        if let Some(v) = var("DAG_DAG_DEFAULT_WEIGHT") {
            if let Ok(w) = v.parse() {
                self.dag.default_weight = w;
            }
        }
        if let Some(v) = var("DAG_DAG_PEERS") {
            self.dag.peers = v
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }
        if let Some(v) = var("DAG_DAG_SYNC_INTERVAL") {
            if let Ok(n) = v.parse() {
                self.dag.sync_interval = n;
            }
        }
    }
}

impl ServerSection {
    /// Address suitable for `TcpListener::bind`; a bare `:port` (the common
    /// YAML shorthand) binds all interfaces.
    pub fn bind_addr(&self) -> String {
        if self.listen_addr.starts_with(':') {
            format!("0.0.0.0{}", self.listen_addr)
        } else {
            self.listen_addr.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
server:
  listen_addr: ":9090"
leveldb:
  path: /tmp/dag-data
logging:
  level: debug
  output: file
  file: /tmp/dag.log
dag:
  max_parents: 4
  default_weight: 2.0
  peers:
    - http://peer-a:8080
    - http://peer-b:8080
  sync_interval: 15
"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.listen_addr, ":9090");
        assert_eq!(config.storage.path, PathBuf::from("/tmp/dag-data"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.output, "file");
        assert_eq!(config.dag.max_parents, 4);
        assert_eq!(config.dag.default_weight, 2.0);
        assert_eq!(config.dag.peers.len(), 2);
        assert_eq!(config.dag.sync_interval, 15);
    }

    #[test]
    fn test_defaults_applied() {
        let file = write_config("server:\n  listen_addr: \":8080\"\n");

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.dag.max_parents, 2);
        assert_eq!(config.dag.default_weight, 1.0);
        assert!(config.dag.peers.is_empty());
        assert_eq!(config.dag.sync_interval, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.output, "stdout");
    }

    #[test]
    fn test_non_positive_sync_interval_resets() {
        let file = write_config("dag:\n  sync_interval: -5\n");

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.dag.sync_interval, 30);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config {
            server: ServerSection::default(),
            storage: StorageSection::default(),
            logging: LoggingSection::default(),
            dag: DagSection::default(),
        };

        config.apply_env_overrides(|key| match key {
            "DAG_SERVER_LISTEN_ADDR" => Some(":7070".to_string()),
            "DAG_LEVELDB_PATH" => Some("/var/lib/dag".to_string()),
            "DAG_DAG_MAX_PARENTS" => Some("8".to_string()),
            "DAG_DAG_PEERS" => Some("http://a:1, http://b:2".to_string()),
            _ => None,
        });

        assert_eq!(config.server.listen_addr, ":7070");
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/dag"));
        assert_eq!(config.dag.max_parents, 8);
        assert_eq!(config.dag.peers, vec!["http://a:1", "http://b:2"]);
    }

    #[test]
    fn test_bind_addr_expands_bare_port() {
        let section = ServerSection {
            listen_addr: ":8080".to_string(),
        };
        assert_eq!(section.bind_addr(), "0.0.0.0:8080");

        let section = ServerSection {
            listen_addr: "127.0.0.1:8080".to_string(),
        };
        assert_eq!(section.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/config.yaml").is_err());
    }
}
