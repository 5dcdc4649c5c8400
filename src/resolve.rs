//! Include resolution.
//!
//! Tasks reference Input and Output includes by id, apps reference task-group
//! includes. Resolution merges the referenced fragments into the referencing
//! task or app and drains its `includes` list, so a resolved value carries no
//! unresolved references.
//!
//! Merging appends: every list of the fragment is appended after the entries
//! the task already has, in include order, without deduplication.

use tracing::debug;

use crate::error::{Error, Namespace, Result};
use crate::include_store::IncludeStore;
use crate::model::{App, FileInputs, GitFileInputs, GolangSources, Input, Output, Task};

/// Append-merge of list-shaped configuration.
pub trait DeepMerge {
    /// Append the entries of `other` after the entries of `self`.
    fn deep_merge(&mut self, other: &Self);
}

impl DeepMerge for FileInputs {
    fn deep_merge(&mut self, other: &Self) {
        self.paths.extend(other.paths.iter().cloned());
    }
}

impl DeepMerge for GitFileInputs {
    fn deep_merge(&mut self, other: &Self) {
        self.paths.extend(other.paths.iter().cloned());
    }
}

impl DeepMerge for GolangSources {
    fn deep_merge(&mut self, other: &Self) {
        self.environment.extend(other.environment.iter().cloned());
        self.paths.extend(other.paths.iter().cloned());
    }
}

impl DeepMerge for Input {
    fn deep_merge(&mut self, other: &Self) {
        self.files.deep_merge(&other.files);
        self.git_files.deep_merge(&other.git_files);
        self.golang_sources.deep_merge(&other.golang_sources);
    }
}

impl DeepMerge for Output {
    fn deep_merge(&mut self, other: &Self) {
        self.docker_image.extend(other.docker_image.iter().cloned());
        self.file.extend(other.file.iter().cloned());
    }
}

/// Merge the Input and Output includes of `task`.
///
/// Ids are looked up in the Input includes first, then in the Output
/// includes.
pub fn resolve_task(task: &mut Task, store: &IncludeStore) -> Result<()> {
    let includes = std::mem::take(&mut task.includes);

    for id in includes {
        if let Some(fragment) = store.input(&id) {
            task.input.deep_merge(&fragment.to_input());
            debug!(task = %task.name, include = %id, "merged input include");
        } else if let Some(fragment) = store.output(&id) {
            task.output.deep_merge(&fragment.to_output());
            debug!(task = %task.name, include = %id, "merged output include");
        } else {
            return Err(Error::Reference {
                id,
                namespace: Namespace::InputOutput,
                referrer: format!("task '{}'", task.name),
            });
        }
    }

    Ok(())
}

/// Resolve the includes of every task of `app`, then append the tasks of its
/// task-group includes.
///
/// Tasks from task groups were resolved when the store was loaded.
pub fn resolve_app(app: &mut App, store: &IncludeStore) -> Result<()> {
    for task in &mut app.tasks {
        resolve_task(task, store)?;
    }

    let includes = std::mem::take(&mut app.includes);

    for id in includes {
        let Some(group) = store.task_group(&id) else {
            return Err(Error::Reference {
                id,
                namespace: Namespace::TaskGroup,
                referrer: format!("app '{}'", app.name),
            });
        };

        app.tasks.extend(group.tasks.iter().cloned());
        debug!(app = %app.name, include = %id, tasks = group.tasks.len(), "appended task group");
    }

    Ok(())
}
