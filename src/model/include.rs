//! Reusable configuration fragments.
//!
//! An include file holds any number of Input, Output and task-group
//! fragments. Each fragment carries an `id` that tasks and apps reference in
//! their `includes` lists.

use serde::{Deserialize, Serialize};

use super::input::{FileInputs, GitFileInputs, GolangSources, Input, example_input};
use super::output::{DockerImageOutput, FileCopy, FileOutput, Output, example_output};
use super::task::{Task, validate_tasks};
use crate::validation::{ElementPathExt, ValidationError, ValidationResult, named_segment};

/// The content of one include file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeFile {
    #[serde(rename = "Input", default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputFragment>,

    #[serde(rename = "Output", default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputFragment>,

    #[serde(rename = "TaskGroup", default, skip_serializing_if = "Vec::is_empty")]
    pub task_groups: Vec<TaskGroupFragment>,
}

impl IncludeFile {
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty() && self.task_groups.is_empty()
    }

    /// Drop empty placeholder outputs in every fragment.
    pub fn remove_empty_sections(&mut self) {
        for output in &mut self.outputs {
            output.remove_empty_sections();
        }

        for group in &mut self.task_groups {
            for task in &mut group.tasks {
                task.output.remove_empty_sections();
            }
        }
    }

    pub fn validate(&self) -> ValidationResult {
        if self.is_empty() {
            return Err(ValidationError::whole(
                "the include does not contain any definition, either an Input, Output or TaskGroup must be defined",
            ));
        }

        for input in &self.inputs {
            input
                .validate()
                .in_element(named_segment("Input", "id", &input.id))?;
        }

        for output in &self.outputs {
            output
                .validate()
                .in_element(named_segment("Output", "id", &output.id))?;
        }

        for group in &self.task_groups {
            group
                .validate()
                .in_element(named_segment("TaskGroup", "id", &group.id))?;
        }

        Ok(())
    }
}

/// A reusable Input definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFragment {
    /// Identifier of the include.
    #[serde(default)]
    pub id: String,

    #[serde(rename = "Files", default, skip_serializing_if = "FileInputs::is_empty")]
    pub files: FileInputs,

    #[serde(rename = "GitFiles", default, skip_serializing_if = "GitFileInputs::is_empty")]
    pub git_files: GitFileInputs,

    #[serde(
        rename = "GolangSources",
        default,
        skip_serializing_if = "GolangSources::is_empty"
    )]
    pub golang_sources: GolangSources,
}

impl InputFragment {
    /// The input sections of the fragment.
    pub fn to_input(&self) -> Input {
        Input {
            files: self.files.clone(),
            git_files: self.git_files.clone(),
            golang_sources: self.golang_sources.clone(),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        if self.id.is_empty() {
            return Err(ValidationError::new("id", "can not be empty"));
        }

        let input = self.to_input();
        if input.is_empty() {
            return Err(ValidationError::new("Input", "no input is defined"));
        }

        input.validate()
    }
}

/// A reusable Output definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFragment {
    /// Identifier of the include.
    #[serde(default)]
    pub id: String,

    #[serde(rename = "DockerImage", default, skip_serializing_if = "Vec::is_empty")]
    pub docker_image: Vec<DockerImageOutput>,

    #[serde(rename = "File", default, skip_serializing_if = "Vec::is_empty")]
    pub file: Vec<FileOutput>,
}

impl OutputFragment {
    /// The output sections of the fragment.
    pub fn to_output(&self) -> Output {
        Output {
            docker_image: self.docker_image.clone(),
            file: self.file.clone(),
        }
    }

    pub fn remove_empty_sections(&mut self) {
        self.file.retain(|f| !f.is_empty());
        self.docker_image.retain(|d| !d.is_empty());
    }

    pub fn validate(&self) -> ValidationResult {
        if self.id.is_empty() {
            return Err(ValidationError::new("id", "can not be empty"));
        }

        let output = self.to_output();
        if output.is_empty() {
            return Err(ValidationError::new("Output", "no output is defined"));
        }

        output.validate()
    }
}

/// A reusable bundle of tasks, appended to every app that includes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGroupFragment {
    /// Identifier of the include.
    #[serde(default)]
    pub id: String,

    #[serde(rename = "Task", default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
}

impl TaskGroupFragment {
    pub fn validate(&self) -> ValidationResult {
        if self.id.is_empty() {
            return Err(ValidationError::new("id", "can not be empty"));
        }

        if self.tasks.is_empty() {
            return Err(ValidationError::new("Task", "no task is defined"));
        }

        validate_tasks(&self.tasks)
    }
}

/// An include file with one fragment of each kind.
pub fn example_include() -> IncludeFile {
    let input = example_input();
    let output = example_output();

    IncludeFile {
        inputs: vec![InputFragment {
            id: "go_input".to_string(),
            files: input.files,
            git_files: input.git_files,
            golang_sources: input.golang_sources,
        }],
        outputs: vec![OutputFragment {
            id: "tar_output".to_string(),
            docker_image: output.docker_image,
            file: output.file,
        }],
        task_groups: vec![TaskGroupFragment {
            id: "c_tasks".to_string(),
            tasks: vec![Task {
                name: "cbuild".to_string(),
                command: "make".to_string(),
                includes: vec!["go_input".to_string()],
                input: Input {
                    git_files: GitFileInputs {
                        paths: vec!["*.c".to_string(), "*.h".to_string(), "Makefile".to_string()],
                    },
                    ..Default::default()
                },
                output: Output {
                    file: vec![FileOutput {
                        path: "a.out".to_string(),
                        file_copy: FileCopy {
                            path: "/artifacts".to_string(),
                        },
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            }],
        }],
    }
}
