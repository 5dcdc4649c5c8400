use serde::{Deserialize, Serialize};

use super::task::{Task, example_task, validate_tasks};
use crate::validation::{ValidationError, ValidationResult, named_segment};

/// Name of the only task allowed in [`TaskMode::Single`].
pub const SINGLE_TASK_NAME: &str = "build";

/// How many tasks an application may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMode {
    /// Exactly one task named `build`.
    Single,
    /// Any number of uniquely named tasks.
    #[default]
    Multiple,
}

impl std::str::FromStr for TaskMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(TaskMode::Single),
            "multiple" => Ok(TaskMode::Multiple),
            other => Err(format!("invalid task mode '{}', expected 'single' or 'multiple'", other)),
        }
    }
}

/// An application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    /// Name of the application.
    #[serde(default)]
    pub name: String,

    /// Ids of task-group includes whose tasks are appended to this app.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    #[serde(rename = "Task", default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
}

impl App {
    /// Drop empty placeholder outputs of every task.
    pub fn remove_empty_sections(&mut self) {
        for task in &mut self.tasks {
            task.output.remove_empty_sections();
        }
    }

    /// Validate the application.
    ///
    /// Includes must be resolved before, validation only sees the
    /// materialized tasks. Any include reference left on the app or one of
    /// its tasks is an error.
    pub fn validate(&self, mode: TaskMode) -> ValidationResult {
        if self.name.is_empty() {
            return Err(ValidationError::new("name", "can not be empty"));
        }

        if !self.includes.is_empty() {
            return Err(unresolved(&self.includes));
        }

        for task in &self.tasks {
            if !task.includes.is_empty() {
                return Err(unresolved(&task.includes)
                    .prepend(named_segment("Task", "name", &task.name)));
            }
        }

        if mode == TaskMode::Single {
            if self.tasks.len() != 1 {
                return Err(ValidationError::new(
                    "Task",
                    format!("exactly 1 task must be defined, found {}", self.tasks.len()),
                ));
            }

            if self.tasks[0].name != SINGLE_TASK_NAME {
                return Err(ValidationError::new(
                    "Task",
                    format!(
                        "invalid task name '{}', task name must be '{}'",
                        self.tasks[0].name, SINGLE_TASK_NAME
                    ),
                ));
            }
        }

        validate_tasks(&self.tasks)
    }
}

fn unresolved(includes: &[String]) -> ValidationError {
    ValidationError::new(
        "includes",
        format!("unresolved include references: {}", includes.join(", ")),
    )
}

/// An exemplary application with the given name.
pub fn example_app(name: &str) -> App {
    App {
        name: name.to_string(),
        includes: Vec::new(),
        tasks: vec![example_task()],
    }
}
