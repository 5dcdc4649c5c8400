//! Settings loader with tier-based merging.
//!
//! Loads settings from multiple tiers and merges them field-by-field.

use super::merge::deep_merge_all;
use super::types::{REPOSITORY_CONFIG_FILE, Settings};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::fs::find_file_in_parent_dirs;

/// Settings files of each tier.
#[derive(Debug, Clone, Default)]
pub struct SettingsPaths {
    /// Repository settings file
    pub repository_file: Option<PathBuf>,
    /// User settings directory
    pub user_dir: Option<PathBuf>,
    /// Explicit settings file replacing the repository and user tiers
    pub explicit_file: Option<PathBuf>,
}

impl SettingsPaths {
    /// Discover settings paths from `start` and the environment.
    ///
    /// The repository file is searched in `start` and its parent
    /// directories.
    pub fn discover(start: &Path) -> crate::error::Result<Self> {
        let repository_file = find_file_in_parent_dirs(start, REPOSITORY_CONFIG_FILE)?;

        // User dir: MONOBUILD_USER_DIR or ~/.monobuild
        let user_dir = std::env::var("MONOBUILD_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".monobuild")));

        let explicit_file = std::env::var("MONOBUILD_CONFIG_PATH").ok().map(PathBuf::from);

        Ok(Self {
            repository_file,
            user_dir,
            explicit_file,
        })
    }

    /// Create paths with explicit locations.
    pub fn with_files(repository_file: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            repository_file,
            user_dir,
            explicit_file: None,
        }
    }

    /// The repository root: the directory holding the repository file.
    pub fn repository_root(&self) -> Option<&Path> {
        self.repository_file.as_deref().and_then(Path::parent)
    }

    fn user_file(&self) -> Option<PathBuf> {
        self.user_dir.as_ref().map(|d| d.join("config.yaml"))
    }
}

/// Settings loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    /// Paths for each tier
    pub paths: SettingsPaths,
    settings: Settings,
    /// Files that contributed to the settings, in tier order
    sources: Vec<PathBuf>,
}

impl SettingsLoader {
    /// Load settings for the repository containing `start`.
    pub fn load(start: &Path) -> Result<Self> {
        let paths = SettingsPaths::discover(start)?;
        Self::load_with_paths(paths)
    }

    /// Load settings with explicit paths and the process environment.
    pub fn load_with_paths(paths: SettingsPaths) -> Result<Self> {
        Self::load_with_env(paths, |key| std::env::var(key).ok())
    }

    /// Load settings with explicit paths and environment lookup.
    pub fn load_with_env(paths: SettingsPaths, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut configs: Vec<Value> = Vec::new();
        let mut sources = Vec::new();

        // Tier 1: Defaults
        configs.push(serde_json::to_value(Settings::default())?);

        if let Some(ref explicit) = paths.explicit_file {
            // An explicit file replaces the file tiers, it must exist.
            configs.push(read_yaml(explicit)?);
            sources.push(explicit.clone());
        } else {
            // Tier 2: Repository settings
            if let Some(ref file) = paths.repository_file {
                configs.push(read_yaml(file)?);
                sources.push(file.clone());
            }

            // Tier 3: User settings
            if let Some(file) = paths.user_file()
                && file.exists()
            {
                configs.push(read_yaml(&file)?);
                sources.push(file);
            }
        }

        let merged = deep_merge_all(configs);
        let mut settings: Settings =
            serde_json::from_value(merged).context("Invalid settings")?;

        // Tier 4: Environment variable overrides
        Self::apply_env_overrides(&mut settings, env)?;
        settings.validate()?;

        debug!(sources = ?sources, "settings loaded");

        Ok(Self {
            paths,
            settings,
            sources,
        })
    }

    /// Apply environment variable overrides to settings.
    fn apply_env_overrides(
        settings: &mut Settings,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(parallelism) = env("MONOBUILD_PARALLELISM") {
            settings.loader.parallelism = parallelism
                .parse()
                .with_context(|| format!("Invalid MONOBUILD_PARALLELISM '{}'", parallelism))?;
        }

        if let Some(mode) = env("MONOBUILD_TASK_MODE") {
            settings.tasks.mode = mode
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid MONOBUILD_TASK_MODE")?;
        }

        if let Some(depth) = env("MONOBUILD_SEARCH_DEPTH") {
            settings.discover.search_depth = depth
                .parse()
                .with_context(|| format!("Invalid MONOBUILD_SEARCH_DEPTH '{}'", depth))?;
        }

        Ok(())
    }

    /// Get the loaded settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Consume the loader and return the settings.
    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// Settings files that were read.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// The repository root, if a repository settings file was found.
    pub fn repository_root(&self) -> Option<&Path> {
        self.paths.repository_root()
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskMode;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_defaults_only() {
        let temp = TempDir::new().unwrap();
        let paths = SettingsPaths::with_files(None, Some(temp.path().join("user")));

        let loader = SettingsLoader::load_with_env(paths, no_env).unwrap();

        assert_eq!(loader.settings(), &Settings::default());
        assert!(loader.sources().is_empty());
    }

    #[test]
    fn test_repository_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let repo_file = temp.path().join(REPOSITORY_CONFIG_FILE);
        std::fs::write(&repo_file, "loader:\n  parallelism: 4\n").unwrap();

        let paths = SettingsPaths::with_files(Some(repo_file), Some(temp.path().join("user")));
        let loader = SettingsLoader::load_with_env(paths, no_env).unwrap();

        assert_eq!(loader.settings().loader.parallelism, 4);
        assert_eq!(loader.settings().discover.search_depth, 10);
        assert_eq!(loader.repository_root(), Some(temp.path()));
    }

    #[test]
    fn test_user_file_overrides_repository() {
        let temp = TempDir::new().unwrap();
        let repo_file = temp.path().join(REPOSITORY_CONFIG_FILE);
        let user_dir = temp.path().join("user");
        std::fs::create_dir_all(&user_dir).unwrap();

        std::fs::write(
            &repo_file,
            "loader:\n  parallelism: 4\ndiscover:\n  search_depth: 3\n",
        )
        .unwrap();
        std::fs::write(user_dir.join("config.yaml"), "loader:\n  parallelism: 2\n").unwrap();

        let paths = SettingsPaths::with_files(Some(repo_file), Some(user_dir));
        let loader = SettingsLoader::load_with_env(paths, no_env).unwrap();

        assert_eq!(loader.settings().loader.parallelism, 2);
        assert_eq!(loader.settings().discover.search_depth, 3);
        assert_eq!(loader.sources().len(), 2);
    }

    #[test]
    fn test_env_overrides_files() {
        let temp = TempDir::new().unwrap();
        let repo_file = temp.path().join(REPOSITORY_CONFIG_FILE);
        std::fs::write(&repo_file, "tasks:\n  mode: multiple\n").unwrap();

        let env: HashMap<&str, &str> = [
            ("MONOBUILD_TASK_MODE", "single"),
            ("MONOBUILD_PARALLELISM", "3"),
        ]
        .into_iter()
        .collect();

        let paths = SettingsPaths::with_files(Some(repo_file), None);
        let loader =
            SettingsLoader::load_with_env(paths, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(loader.settings().tasks.mode, TaskMode::Single);
        assert_eq!(loader.settings().loader.parallelism, 3);
    }

    #[test]
    fn test_invalid_env_value_is_an_error() {
        let paths = SettingsPaths::default();
        let result = SettingsLoader::load_with_env(paths, |k| {
            (k == "MONOBUILD_PARALLELISM").then(|| "many".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_file_replaces_file_tiers() {
        let temp = TempDir::new().unwrap();
        let repo_file = temp.path().join(REPOSITORY_CONFIG_FILE);
        let explicit = temp.path().join("ci.yaml");
        std::fs::write(&repo_file, "loader:\n  parallelism: 4\n").unwrap();
        std::fs::write(&explicit, "discover:\n  search_depth: 1\n").unwrap();

        let mut paths = SettingsPaths::with_files(Some(repo_file), None);
        paths.explicit_file = Some(explicit.clone());
        let loader = SettingsLoader::load_with_env(paths, no_env).unwrap();

        assert_eq!(loader.settings().loader.parallelism, 16);
        assert_eq!(loader.settings().discover.search_depth, 1);
        assert_eq!(loader.sources(), &[explicit]);
    }

    #[test]
    fn test_zero_parallelism_is_rejected() {
        let temp = TempDir::new().unwrap();
        let repo_file = temp.path().join(REPOSITORY_CONFIG_FILE);
        std::fs::write(&repo_file, "loader:\n  parallelism: 0\n").unwrap();

        let paths = SettingsPaths::with_files(Some(repo_file), None);
        assert!(SettingsLoader::load_with_env(paths, no_env).is_err());
    }

    #[test]
    fn test_discover_finds_repository_file_in_parent() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(REPOSITORY_CONFIG_FILE), "").unwrap();
        let nested = temp.path().join("services").join("shop");
        std::fs::create_dir_all(&nested).unwrap();

        let paths = SettingsPaths::discover(&nested).unwrap();
        assert_eq!(
            paths.repository_file,
            Some(temp.path().join(REPOSITORY_CONFIG_FILE))
        );
    }
}
