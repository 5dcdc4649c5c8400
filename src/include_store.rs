//! Repository-wide store of include fragments.
//!
//! Includes are registered through an [`IncludeStoreBuilder`]. Building the
//! store resolves the includes of tasks inside task groups, after every file
//! was registered, so the order in which include files are discovered does
//! not matter. An [`IncludeStore`] is therefore always complete; it is never
//! modified afterwards and can be shared between threads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec::{self, ConfigFormat};
use crate::error::{Error, Namespace, Result};
use crate::fs::{SymlinkMode, walk_files};
use crate::model::{IncludeFile, InputFragment, OutputFragment, TaskGroupFragment};
use crate::resolve::resolve_task;

/// Kind of an include fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Input,
    Output,
    TaskGroup,
}

impl FragmentKind {
    pub fn namespace(self) -> Namespace {
        match self {
            FragmentKind::Input | FragmentKind::Output => Namespace::InputOutput,
            FragmentKind::TaskGroup => Namespace::TaskGroup,
        }
    }
}

/// A fragment and the file it was defined in.
#[derive(Debug, Clone)]
struct Registered<T> {
    fragment: T,
    origin: PathBuf,
}

/// Read-only lookup of include fragments by id.
#[derive(Debug, Clone, Default)]
pub struct IncludeStore {
    inputs: BTreeMap<String, Registered<InputFragment>>,
    outputs: BTreeMap<String, Registered<OutputFragment>>,
    task_groups: BTreeMap<String, Registered<TaskGroupFragment>>,
}

impl IncludeStore {
    /// Load every include file found in `dirs`.
    ///
    /// Directories are searched recursively, symlinks are errors. Files
    /// without a `.toml`, `.yaml` or `.yml` extension are ignored.
    pub fn load<P: AsRef<Path>>(dirs: &[P]) -> Result<Self> {
        let mut builder = IncludeStoreBuilder::new();

        for dir in dirs {
            builder.load_dir(dir.as_ref())?;
        }

        let store = builder.build()?;
        info!(
            inputs = store.inputs.len(),
            outputs = store.outputs.len(),
            task_groups = store.task_groups.len(),
            "include store loaded"
        );

        Ok(store)
    }

    pub fn input(&self, id: &str) -> Option<&InputFragment> {
        self.inputs.get(id).map(|r| &r.fragment)
    }

    pub fn output(&self, id: &str) -> Option<&OutputFragment> {
        self.outputs.get(id).map(|r| &r.fragment)
    }

    pub fn task_group(&self, id: &str) -> Option<&TaskGroupFragment> {
        self.task_groups.get(id).map(|r| &r.fragment)
    }

    pub fn contains(&self, kind: FragmentKind, id: &str) -> bool {
        match kind {
            FragmentKind::Input => self.inputs.contains_key(id),
            FragmentKind::Output => self.outputs.contains_key(id),
            FragmentKind::TaskGroup => self.task_groups.contains_key(id),
        }
    }

    /// The file a fragment was defined in.
    pub fn origin(&self, kind: FragmentKind, id: &str) -> Option<&Path> {
        let origin = match kind {
            FragmentKind::Input => self.inputs.get(id).map(|r| &r.origin),
            FragmentKind::Output => self.outputs.get(id).map(|r| &r.origin),
            FragmentKind::TaskGroup => self.task_groups.get(id).map(|r| &r.origin),
        };
        origin.map(PathBuf::as_path)
    }

    /// Ids of all fragments of a kind, sorted.
    pub fn ids(&self, kind: FragmentKind) -> Vec<&str> {
        match kind {
            FragmentKind::Input => self.inputs.keys().map(String::as_str).collect(),
            FragmentKind::Output => self.outputs.keys().map(String::as_str).collect(),
            FragmentKind::TaskGroup => self.task_groups.keys().map(String::as_str).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.len() + self.outputs.len() + self.task_groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The file already defining `id` in the namespace of `kind`.
    fn conflicting_origin(&self, kind: FragmentKind, id: &str) -> Option<&Path> {
        match kind.namespace() {
            Namespace::InputOutput => self
                .origin(FragmentKind::Input, id)
                .or_else(|| self.origin(FragmentKind::Output, id)),
            Namespace::TaskGroup => self.origin(FragmentKind::TaskGroup, id),
        }
    }
}

/// Collects include files into an [`IncludeStore`].
#[derive(Debug, Default)]
pub struct IncludeStoreBuilder {
    store: IncludeStore,
}

impl IncludeStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse, validate and register all include files below `dir`.
    pub fn load_dir(&mut self, dir: &Path) -> Result<()> {
        walk_files(dir, SymlinkMode::Error, &mut |path: &Path| {
            if ConfigFormat::from_path(path).is_none() {
                debug!(path = %path.display(), "skipping non-config file in include directory");
                return Ok(());
            }

            self.load_file(path)
        })
    }

    /// Parse, validate and register one include file.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let mut include: IncludeFile = codec::from_file(path)?;
        include.remove_empty_sections();

        include
            .validate()
            .map_err(|e| Error::from(e).in_file("validating include file", path))?;

        self.add(include, path)
    }

    /// Register the fragments of one include file.
    ///
    /// Every id is checked before anything is inserted: when an id collides
    /// with a registered one, or with another id of the same file, the
    /// builder is left unchanged.
    pub fn add(&mut self, include: IncludeFile, origin: &Path) -> Result<()> {
        let mut pending: Vec<(FragmentKind, &str)> = Vec::new();

        let candidates = include
            .inputs
            .iter()
            .map(|f| (FragmentKind::Input, f.id.as_str()))
            .chain(include.outputs.iter().map(|f| (FragmentKind::Output, f.id.as_str())))
            .chain(
                include
                    .task_groups
                    .iter()
                    .map(|f| (FragmentKind::TaskGroup, f.id.as_str())),
            );

        for (kind, id) in candidates {
            let namespace = kind.namespace();

            let first = self.store.conflicting_origin(kind, id).map(Path::to_path_buf).or_else(|| {
                pending
                    .iter()
                    .any(|(k, pid)| k.namespace() == namespace && *pid == id)
                    .then(|| origin.to_path_buf())
            });

            if let Some(first) = first {
                return Err(Error::DuplicateId {
                    id: id.to_string(),
                    namespace,
                    first,
                    second: origin.to_path_buf(),
                });
            }

            pending.push((kind, id));
        }

        for fragment in include.inputs {
            debug!(id = %fragment.id, path = %origin.display(), "registered input include");
            self.store.inputs.insert(
                fragment.id.clone(),
                Registered {
                    fragment,
                    origin: origin.to_path_buf(),
                },
            );
        }

        for fragment in include.outputs {
            debug!(id = %fragment.id, path = %origin.display(), "registered output include");
            self.store.outputs.insert(
                fragment.id.clone(),
                Registered {
                    fragment,
                    origin: origin.to_path_buf(),
                },
            );
        }

        for fragment in include.task_groups {
            debug!(id = %fragment.id, path = %origin.display(), "registered task group include");
            self.store.task_groups.insert(
                fragment.id.clone(),
                Registered {
                    fragment,
                    origin: origin.to_path_buf(),
                },
            );
        }

        Ok(())
    }

    /// Ids registered so far, sorted.
    pub fn pending_ids(&self, kind: FragmentKind) -> Vec<&str> {
        self.store.ids(kind)
    }

    /// Skip the task-group pass, leaving group tasks with their includes.
    #[cfg(test)]
    pub(crate) fn into_unresolved(self) -> IncludeStore {
        self.store
    }

    /// Resolve the includes of tasks inside task groups and return the store.
    pub fn build(self) -> Result<IncludeStore> {
        let mut store = self.store;
        let mut groups = std::mem::take(&mut store.task_groups);

        for registered in groups.values_mut() {
            for task in &mut registered.fragment.tasks {
                resolve_task(task, &store)
                    .map_err(|e| e.in_file("resolving task group includes of", &registered.origin))?;
            }
        }

        store.task_groups = groups;
        Ok(store)
    }
}
