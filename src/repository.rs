//! A repository: its settings, include store and application configs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, anyhow};
use tracing::info;

use crate::config::{REPOSITORY_CONFIG_FILE, Settings, SettingsLoader, SettingsPaths};
use crate::error::Result;
use crate::fs::{dirs_exist, find_files_in_sub_dir};
use crate::include_store::IncludeStore;
use crate::loader::AppLoader;
use crate::model::App;

/// A loaded repository.
///
/// Opening a repository loads its include store; application configs are
/// only discovered, they are read by [`Repository::load_apps`].
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    settings: Settings,
    store: Arc<IncludeStore>,
    app_files: Vec<PathBuf>,
}

impl Repository {
    /// Find the repository containing `start` and open it.
    pub fn find(start: &Path) -> anyhow::Result<Self> {
        Self::find_with_paths(SettingsPaths::discover(start)?)
    }

    /// Open the repository described by `paths`.
    pub fn find_with_paths(paths: SettingsPaths) -> anyhow::Result<Self> {
        let loader = SettingsLoader::load_with_paths(paths)?;

        let root = loader
            .repository_root()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                anyhow!(
                    "{} not found in the current directory or any parent, run 'monobuild init repo' first",
                    REPOSITORY_CONFIG_FILE
                )
            })?;

        Self::open(root, loader.into_settings())
    }

    /// Open the repository at `root` with the given settings.
    pub fn open(root: PathBuf, settings: Settings) -> anyhow::Result<Self> {
        settings.validate()?;

        let include_dirs = settings.include_dirs(&root);
        dirs_exist(&include_dirs).context("Invalid includes.dirs setting")?;
        let store = IncludeStore::load(&include_dirs)?;

        let app_files = discover_app_files(&root, &settings)?;

        info!(
            root = %root.display(),
            includes = store.len(),
            apps = app_files.len(),
            "repository opened"
        );

        Ok(Self {
            root,
            settings,
            store: Arc::new(store),
            app_files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &IncludeStore {
        &self.store
    }

    /// Discovered application config files, sorted.
    pub fn app_files(&self) -> &[PathBuf] {
        &self.app_files
    }

    /// An application loader sharing this repository's include store.
    pub fn loader(&self) -> AppLoader {
        AppLoader::new(Arc::clone(&self.store), self.settings.tasks.mode)
    }

    /// Load every discovered application config.
    pub async fn load_apps(&self) -> Vec<(PathBuf, Result<App>)> {
        self.loader()
            .load_all(self.app_files.clone(), self.settings.loader.parallelism)
            .await
    }

    /// Load the application called `name`.
    ///
    /// Configs that fail to load are skipped while searching; when no app
    /// matches, the error names how many configs could not be read.
    pub async fn app_by_name(&self, name: &str) -> anyhow::Result<App> {
        let mut failed = 0;

        for (_, result) in self.load_apps().await {
            match result {
                Ok(app) if app.name == name => return Ok(app),
                Ok(_) => {}
                Err(_) => failed += 1,
            }
        }

        if failed > 0 {
            Err(anyhow!(
                "app '{}' not found, {} app config(s) failed to load",
                name,
                failed
            ))
        } else {
            Err(anyhow!("app '{}' not found", name))
        }
    }
}

/// Find application config files below the discovery directories.
fn discover_app_files(root: &Path, settings: &Settings) -> anyhow::Result<Vec<PathBuf>> {
    let dirs = settings.discover_dirs(root);
    dirs_exist(&dirs).context("Invalid discover.dirs setting")?;

    let mut files = Vec::new();
    for dir in &dirs {
        for name in &settings.discover.app_file_names {
            files.extend(find_files_in_sub_dir(dir, name, settings.discover.search_depth)?);
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_without_repository_file_fails() {
        let paths = SettingsPaths::with_files(None, None);
        let err = Repository::find_with_paths(paths).unwrap_err();
        assert!(err.to_string().contains(REPOSITORY_CONFIG_FILE));
    }

    #[test]
    fn test_missing_include_dir_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.includes.dirs = vec![PathBuf::from("includes")];

        assert!(Repository::open(temp.path().to_path_buf(), settings).is_err());
    }

    #[test]
    fn test_discovery_respects_search_depth() {
        let temp = TempDir::new().unwrap();
        let shallow = temp.path().join("shop");
        let deep = temp.path().join("a").join("b").join("c");
        std::fs::create_dir_all(&shallow).unwrap();
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(shallow.join(".app.toml"), "").unwrap();
        std::fs::write(deep.join(".app.toml"), "").unwrap();

        let mut settings = Settings::default();
        settings.discover.search_depth = 1;

        let files = discover_app_files(temp.path(), &settings).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("shop/.app.toml"));
    }
}
