// CLI configuration loaded from YAML

use crate::error::TodoError;
use crate::provider::{self, FileProvider, Provider, SqliteProvider};
use crate::store::{DEFAULT_KEY, StoreOptions};
use crate::todo::IdStrategy;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const APP_DIR: &str = "todostore";
const CONFIG_FILE: &str = "config.yml";
const SQLITE_FILE: &str = "todostore.db";

/// Storage backend the CLI persists into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `{store_path}/{key}.json`
    #[default]
    File,
    /// `{store_path}/todostore.db`
    Sqlite,
}

impl FromStr for Backend {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Backend::File),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(TodoError::InvalidBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub backend: Backend,
    pub store_path: PathBuf,
    pub key: String,
    pub id_strategy: IdStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            store_path: default_store_path(),
            key: DEFAULT_KEY.to_string(),
            id_strategy: IdStrategy::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `path` is `None`
    ///
    /// A missing file at the default location yields the defaults; an
    /// explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&content).with_context(|| format!("Invalid config {}", path.display()))?;
        debug!(path = ?path, ?config, "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        provider::validate_key(&config.key)?;
        Ok(config)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            key: self.key.clone(),
            id_strategy: self.id_strategy,
        }
    }

    /// Open the configured backend
    pub fn open_provider(&self) -> Result<Box<dyn Provider>> {
        let provider: Box<dyn Provider> = match self.backend {
            Backend::File => Box::new(FileProvider::open(&self.store_path)?),
            Backend::Sqlite => Box::new(SqliteProvider::open(self.store_path.join(SQLITE_FILE))?),
        };
        Ok(provider)
    }
}

/// `{config_dir}/todostore/config.yml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `{data_dir}/todostore`, or `./.todostore` when the platform has no data dir
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".todostore"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::File);
        assert_eq!(config.key, "todos");
        assert_eq!(config.id_strategy, IdStrategy::Uuid);
        assert_eq!(config.store_path, default_store_path());
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = Config::from_yaml("backend: sqlite\nid_strategy: timestamp\n").unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.id_strategy, IdStrategy::Timestamp);
        assert_eq!(config.key, "todos");
    }

    #[test]
    fn test_from_yaml_empty() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_from_yaml_rejects_unknown_fields() {
        assert!(Config::from_yaml("theme: dark\n").is_err());
        assert!(Config::from_yaml("backend: redis\n").is_err());
        assert!(Config::from_yaml("key: ''\n").is_err());
    }

    #[test]
    fn test_from_yaml_rejects_unusable_key() {
        let err = Config::from_yaml("key: my todos\n").unwrap_err();
        assert!(err.to_string().contains("Invalid key"));
        assert!(Config::from_yaml("key: ../outside\n").is_err());
        assert!(Config::from_yaml("key: work-2024\n").is_ok());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, format!("store_path: {}\nkey: work\n", temp.path().display())).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store_path, temp.path());
        assert_eq!(config.key, "work");
        assert_eq!(config.store_options().key, "work");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(Some(&temp.path().join("nope.yml"))).is_err());
    }

    #[test]
    fn test_open_provider_backends() {
        let temp = TempDir::new().unwrap();

        for backend in [Backend::File, Backend::Sqlite] {
            let config = Config {
                backend,
                store_path: temp.path().join(format!("{:?}", backend)),
                ..Config::default()
            };
            let mut provider = config.open_provider().unwrap();
            provider.set("todos", "[]").unwrap();
            assert_eq!(provider.get("todos").unwrap().as_deref(), Some("[]"));
        }

        assert!(temp.path().join("File/todos.json").exists());
        assert!(temp.path().join("Sqlite/todostore.db").exists());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("sqlite".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert!("redis".parse::<Backend>().is_err());
    }
}
