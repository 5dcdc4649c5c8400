//! Settings types.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::TaskMode;

/// Name of the repository settings file, marking the repository root.
pub const REPOSITORY_CONFIG_FILE: &str = ".monobuild.yaml";

/// Tool settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub discover: DiscoverConfig,

    #[serde(default)]
    pub includes: IncludesConfig,

    #[serde(default)]
    pub tasks: TasksConfig,

    #[serde(default)]
    pub loader: LoaderConfig,
}

/// Where application configs are searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverConfig {
    /// Directories, relative to the repository root, searched for app configs.
    #[serde(default = "default_discover_dirs")]
    pub dirs: Vec<PathBuf>,

    /// How many directory levels below each search directory are searched.
    #[serde(default = "default_search_depth")]
    pub search_depth: usize,

    /// File names of application configs.
    #[serde(default = "default_app_file_names")]
    pub app_file_names: Vec<String>,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            dirs: default_discover_dirs(),
            search_depth: default_search_depth(),
            app_file_names: default_app_file_names(),
        }
    }
}

fn default_discover_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

fn default_search_depth() -> usize {
    10
}

fn default_app_file_names() -> Vec<String> {
    vec![".app.toml".to_string(), ".app.yaml".to_string()]
}

/// Where include files are loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludesConfig {
    /// Directories, relative to the repository root, containing include files.
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
}

/// Task validation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default)]
    pub mode: TaskMode,
}

/// Concurrency of application loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Maximum number of app configs read at the same time.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
        }
    }
}

fn default_parallelism() -> usize {
    16
}

impl Settings {
    /// Check the settings for values that can never work.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.discover.dirs.is_empty() {
            anyhow::bail!("discover.dirs can not be empty");
        }

        if self.discover.app_file_names.iter().any(String::is_empty) {
            anyhow::bail!("discover.app_file_names can not contain empty names");
        }

        if self.loader.parallelism == 0 {
            anyhow::bail!("loader.parallelism must be greater than 0");
        }

        Ok(())
    }

    /// Discovery directories resolved against `root`.
    pub fn discover_dirs(&self, root: &Path) -> Vec<PathBuf> {
        self.discover.dirs.iter().map(|d| root.join(d)).collect()
    }

    /// Include directories resolved against `root`.
    pub fn include_dirs(&self, root: &Path) -> Vec<PathBuf> {
        self.includes.dirs.iter().map(|d| root.join(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.tasks.mode, TaskMode::Multiple);
        assert_eq!(settings.discover.search_depth, 10);
    }

    #[test]
    fn test_zero_parallelism_is_invalid() {
        let mut settings = Settings::default();
        settings.loader.parallelism = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("includes:\n  dirs: [includes]\n").unwrap();
        assert_eq!(settings.includes.dirs, vec![PathBuf::from("includes")]);
        assert_eq!(settings.discover.dirs, vec![PathBuf::from(".")]);
        assert_eq!(settings.loader.parallelism, 16);
    }
}
