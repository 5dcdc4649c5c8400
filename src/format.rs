//! Output formatting for markdown and JSON reports.

use crate::error::{ErrorReport, Result};
use crate::model::{App, Task};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// Output format for command reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

/// Path of `path` relative to `root`, for display.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn format_task_short(task: &Task) -> String {
    let mut line = format!("- `{}`: `{}`", task.name, task.command);

    let mut parts = Vec::new();
    let inputs = task.input.files.paths.len()
        + task.input.git_files.paths.len()
        + task.input.golang_sources.paths.len();
    if inputs > 0 {
        parts.push(format!("{} input(s)", inputs));
    }
    let outputs = task.output.file.len() + task.output.docker_image.len();
    if outputs > 0 {
        parts.push(format!("{} output(s)", outputs));
    }
    if !parts.is_empty() {
        line.push_str(&format!(" ({})", parts.join(", ")));
    }

    line.push('\n');
    line
}

/// Format a single resolved app as markdown.
pub fn format_app_markdown(app: &App) -> String {
    let mut md = String::new();

    md.push_str(&format!("## App: {}\n", app.name));
    for task in &app.tasks {
        md.push_str(&format_task_short(task));
    }

    md
}

/// Format the results of loading every app as markdown.
///
/// Failed apps are listed first, with the element path of validation errors.
pub fn format_check_markdown(results: &[(PathBuf, Result<App>)], root: &Path) -> String {
    let mut md = String::new();

    let failed: Vec<_> = results.iter().filter(|(_, r)| r.is_err()).collect();
    md.push_str(&format!(
        "# Apps ({} loaded, {} failed)\n\n",
        results.len() - failed.len(),
        failed.len()
    ));

    if !failed.is_empty() {
        md.push_str("## Failed\n\n");
        for (path, result) in &failed {
            if let Err(err) = result {
                let report = ErrorReport::from(err);
                md.push_str(&format!("- `{}`: {}\n", display_path(path, root), report.message));
                if let Some(element_path) = report.element_path
                    && !element_path.is_empty()
                {
                    md.push_str(&format!("  - **element**: `{}`\n", element_path.join(".")));
                }
            }
        }
        md.push('\n');
    }

    for (path, result) in results {
        if let Ok(app) = result {
            md.push_str(&format_app_markdown(app));
            md.push_str(&format!("- **file**: `{}`\n\n", display_path(path, root)));
        }
    }

    md
}

/// Format the results of loading every app as JSON.
pub fn format_check_json(results: &[(PathBuf, Result<App>)], root: &Path) -> Value {
    let apps: Vec<Value> = results
        .iter()
        .map(|(path, result)| match result {
            Ok(app) => json!({
                "file": display_path(path, root),
                "name": app.name,
                "tasks": app.tasks.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            }),
            Err(err) => json!({
                "file": display_path(path, root),
                "error": ErrorReport::from(err),
            }),
        })
        .collect();

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    json!({
        "loaded": results.len() - failed,
        "failed": failed,
        "apps": apps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::example_app;
    use crate::validation::ValidationError;

    fn results() -> Vec<(PathBuf, Result<App>)> {
        let err = Error::from(
            ValidationError::new("command", "can not be empty").prepend("Task(name: build)"),
        )
        .in_file("validating app config", Path::new("/repo/broken/.app.toml"));

        vec![
            (PathBuf::from("/repo/shop/.app.toml"), Ok(example_app("shop"))),
            (PathBuf::from("/repo/broken/.app.toml"), Err(err)),
        ]
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("xml"), None);
    }

    #[test]
    fn test_check_markdown_lists_failures_with_element_path() {
        let md = format_check_markdown(&results(), Path::new("/repo"));

        assert!(md.starts_with("# Apps (1 loaded, 1 failed)"));
        assert!(md.contains("`broken/.app.toml`"));
        assert!(md.contains("`Task(name: build).command`"));
        assert!(md.contains("## App: shop"));
    }

    #[test]
    fn test_check_json() {
        let value = format_check_json(&results(), Path::new("/repo"));

        assert_eq!(value["loaded"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["apps"][0]["name"], "shop");
        assert_eq!(value["apps"][1]["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            value["apps"][1]["error"]["element_path"],
            json!(["Task(name: build)", "command"])
        );
    }
}
