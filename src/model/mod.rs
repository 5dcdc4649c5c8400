//! Configuration data model.
//!
//! Field names follow the on-disk layout: sections are capitalized
//! (`[[Task]]`, `[Task.Input.Files]`), scalar settings are snake_case.
//!
//! String fields may contain variables that are substituted when a task is
//! executed, not while loading:
//! - `$ROOT` - repository root directory
//! - `$APPNAME` - name of the application
//! - `$UUID` - a random UUID
//! - `$GITCOMMIT` - current Git commit id

mod app;
mod include;
mod input;
mod output;
mod task;

pub use app::{App, SINGLE_TASK_NAME, TaskMode, example_app};
pub use include::{IncludeFile, InputFragment, OutputFragment, TaskGroupFragment, example_include};
pub use input::{FileInputs, GitFileInputs, GolangSources, Input, example_input};
pub use output::{
    DockerImageOutput, DockerImageRegistryUpload, FileCopy, FileOutput, Output, S3Upload,
    example_output,
};
pub use task::{Task, example_task, validate_tasks};

/// Variables recognized in string fields.
pub const RESERVED_VARIABLES: [&str; 4] = ["$ROOT", "$APPNAME", "$UUID", "$GITCOMMIT"];
