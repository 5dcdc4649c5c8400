use serde::{Deserialize, Serialize};

use super::input::{Input, example_input};
use super::output::{Output, example_output};
use crate::validation::{ElementPathExt, ValidationError, ValidationResult};

/// A unit of build work of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifies the task within its application.
    #[serde(default)]
    pub name: String,

    /// Command the task executes.
    #[serde(default)]
    pub command: String,

    /// Ids of Input and Output includes merged into this task.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    /// Source files and other inputs of the command.
    #[serde(rename = "Input", default, skip_serializing_if = "Input::is_empty")]
    pub input: Input,

    /// Artifacts produced by the command.
    #[serde(rename = "Output", default, skip_serializing_if = "Output::is_empty")]
    pub output: Output,
}

impl Task {
    /// Validate the task.
    ///
    /// A task without a command is invalid. Input and Output sections may be
    /// empty.
    pub fn validate(&self) -> ValidationResult {
        if self.name.is_empty() {
            return Err(ValidationError::new("name", "can not be empty"));
        }

        if self.command.is_empty() {
            return Err(ValidationError::new("command", "can not be empty"));
        }

        self.input.validate().in_element("Input")?;
        self.output.validate().in_element("Output")?;

        Ok(())
    }
}

/// Validate a list of tasks: names must be unique, each task must be valid.
///
/// Errors of a task are wrapped with a `Task(name: ...)` segment.
pub fn validate_tasks(tasks: &[Task]) -> ValidationResult {
    let mut seen = std::collections::HashSet::with_capacity(tasks.len());

    for task in tasks {
        let segment = crate::validation::named_segment("Task", "name", &task.name);

        if !task.name.is_empty() && !seen.insert(task.name.as_str()) {
            return Err(ValidationError::new(
                segment,
                format!(
                    "multiple tasks with the name '{}' are defined, task names must be unique",
                    task.name
                ),
            ));
        }

        task.validate().in_element(segment)?;
    }

    Ok(())
}

/// An exemplary build task.
pub fn example_task() -> Task {
    Task {
        name: "build".to_string(),
        command: "make dist".to_string(),
        includes: Vec::new(),
        input: example_input(),
        output: example_output(),
    }
}
