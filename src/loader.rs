//! Application config loading.
//!
//! Loading one application file runs three stages: decoding, include
//! resolution against the shared [`IncludeStore`] and validation. The first
//! error of any stage aborts the load of that application.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::codec;
use crate::error::{Error, Result};
use crate::include_store::IncludeStore;
use crate::model::{App, TaskMode};
use crate::resolve::resolve_app;

/// Loads application configs against a complete include store.
#[derive(Debug, Clone)]
pub struct AppLoader {
    store: Arc<IncludeStore>,
    task_mode: TaskMode,
}

impl AppLoader {
    pub fn new(store: Arc<IncludeStore>, task_mode: TaskMode) -> Self {
        Self { store, task_mode }
    }

    pub fn store(&self) -> &IncludeStore {
        &self.store
    }

    pub fn task_mode(&self) -> TaskMode {
        self.task_mode
    }

    /// Load, resolve and validate the application config at `path`.
    pub fn load(&self, path: &Path) -> Result<App> {
        let mut app: App = codec::from_file(path)?;
        app.remove_empty_sections();

        resolve_app(&mut app, &self.store).map_err(|e| e.in_file("resolving includes of", path))?;

        app.validate(self.task_mode)
            .map_err(|e| Error::from(e).in_file("validating app config", path))?;

        debug!(app = %app.name, tasks = app.tasks.len(), path = %path.display(), "loaded app config");
        Ok(app)
    }

    /// Load many application configs concurrently.
    ///
    /// At most `parallelism` files are read at the same time. A failing
    /// application does not stop the others; results are returned in the
    /// order of `paths`.
    pub async fn load_all(&self, paths: Vec<PathBuf>, parallelism: usize) -> Vec<(PathBuf, Result<App>)> {
        let permits = Arc::new(Semaphore::new(parallelism.max(1)));
        let mut handles = Vec::with_capacity(paths.len());

        for path in &paths {
            let loader = self.clone();
            let permits = Arc::clone(&permits);
            let path = path.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permits.acquire_owned().await;
                tokio::task::spawn_blocking(move || loader.load(&path)).await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (path, handle) in paths.into_iter().zip(handles) {
            let result = match handle.await {
                Ok(Ok(result)) => result,
                // The blocking load or the task driving it panicked or was cancelled.
                Ok(Err(join_err)) | Err(join_err) => Err(aborted(&path, join_err)),
            };

            if let Err(ref e) = result {
                warn!(path = %path.display(), error = %e, "loading app config failed");
            }
            results.push((path, result));
        }

        results
    }
}

fn aborted(path: &Path, join_err: tokio::task::JoinError) -> Error {
    Error::io(path, std::io::Error::other(join_err.to_string()))
}
