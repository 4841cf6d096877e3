//! CLI configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `<seq>.json` ledger files
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Ledgers analyzed concurrently
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    /// Upper bounds of the free-fraction histogram
    #[serde(default = "default_histogram_buckets")]
    pub histogram_buckets: Vec<f64>,
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_histogram_buckets() -> Vec<f64> {
    spar_metrics::Histogram::default_bounds()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            jobs: default_jobs(),
            histogram_buckets: default_histogram_buckets(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".spar"))
    }

    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from `path`, or the default location when `None`
    ///
    /// A missing file yields the defaults. An unreadable or malformed file
    /// is logged and also yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Self::default(),
        };
        if !path.exists() {
            return Self::default();
        }

        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Save config to `path`, or the default location when `None`
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, std::io::Error> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::default_path)
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "Cannot determine config path")
            })?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        std::fs::write(&path, content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.data_dir.is_none());
        assert!(config.jobs >= 1);
        assert_eq!(config.histogram_buckets.len(), 10);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            data_dir = "/var/lib/spar/ledgers"
            jobs = 3
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/spar/ledgers")));
        assert_eq!(config.jobs, 3);
        assert_eq!(config.histogram_buckets, default_histogram_buckets());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/ledgers")),
            jobs: 2,
            histogram_buckets: vec![0.5, 1.0],
        };
        let written = config.save(Some(&path)).unwrap();
        assert_eq!(written, path);

        assert_eq!(Config::load(Some(&path)), config);
    }

    #[test]
    fn test_config_load_missing_or_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert_eq!(Config::load(Some(&missing)), Config::default());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "jobs = \"many\"").unwrap();
        assert_eq!(Config::load(Some(&broken)), Config::default());
    }
}
