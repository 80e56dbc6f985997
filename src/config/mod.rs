//! Configuration loading and management

use crate::core::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where collection snapshots are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process memory; lost on exit
    #[default]
    Memory,
    /// One JSON file per collection under `dir`
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub kind: StorageKind,

    /// Snapshot directory (file storage only)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self {
            kind: StorageKind::File,
            dir: Some(dir.into()),
        }
    }
}

/// Page size of each listing view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSizes {
    /// Public job board
    pub jobs: usize,
    pub admin_jobs: usize,
    pub applications: usize,
    pub companies: usize,
    pub users: usize,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            jobs: 6,
            admin_jobs: 10,
            applications: 10,
            companies: 10,
            users: 10,
        }
    }
}

impl PageSizes {
    fn entries(&self) -> [(&'static str, usize); 5] {
        [
            ("jobs", self.jobs),
            ("admin_jobs", self.admin_jobs),
            ("applications", self.applications),
            ("companies", self.companies),
            ("users", self.users),
        ]
    }
}

/// Complete configuration for a job board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub storage: StorageConfig,

    /// Install the default dataset into collections that load empty
    pub seed_on_empty: bool,

    /// Simulated latency before seeded data appears
    pub seed_delay_ms: u64,

    /// Quiet period before a typed search is applied
    pub search_debounce_ms: u64,

    pub page_sizes: PageSizes,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            seed_on_empty: true,
            seed_delay_ms: 800,
            search_debounce_ms: 300,
            page_sizes: PageSizes::default(),
        }
    }
}

impl BoardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory storage, no seeding, no delays
    pub fn ephemeral() -> Self {
        Self {
            seed_on_empty: false,
            seed_delay_ms: 0,
            search_debounce_ms: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = self.page_sizes.entries();
        if let Some((name, _)) = entries.into_iter().find(|(_, size)| *size == 0) {
            return Err(ConfigError::Invalid(format!(
                "page_sizes.{} must be greater than zero",
                name
            )));
        }

        if self.storage.kind == StorageKind::File && self.storage.dir.is_none() {
            return Err(ConfigError::Invalid(
                "storage.dir is required for file storage".to_string(),
            ));
        }

        Ok(())
    }

    pub fn seed_delay(&self) -> Duration {
        Duration::from_millis(self.seed_delay_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();

        assert_eq!(config.storage.kind, StorageKind::Memory);
        assert!(config.seed_on_empty);
        assert_eq!(config.seed_delay(), Duration::from_millis(800));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.page_sizes.jobs, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = BoardConfig {
            storage: StorageConfig::file("/tmp/board"),
            ..BoardConfig::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();

        // Should be able to parse it back
        let parsed = BoardConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = BoardConfig::from_yaml_str("page_sizes:\n  jobs: 12\n").unwrap();

        assert_eq!(config.page_sizes.jobs, 12);
        assert_eq!(config.page_sizes.users, 10);
        assert_eq!(config.seed_delay_ms, 800);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let err = BoardConfig::from_yaml_str("page_sizes:\n  companies: 0\n").unwrap_err();
        assert!(err.to_string().contains("page_sizes.companies"));

        let err = BoardConfig::from_yaml_str("storage:\n  kind: file\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        assert!(matches!(
            BoardConfig::from_yaml_str("storage:\n  kind: cloud\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
