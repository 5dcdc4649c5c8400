//! Task inputs.
//!
//! Inputs decide whether a task has to run again; the paths and globs are
//! resolved to files by the caller.

use serde::{Deserialize, Serialize};

use crate::validation::{ElementPathExt, ValidationError, ValidationResult};

/// Inputs of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Inputs specified by file glob paths.
    #[serde(rename = "Files", default, skip_serializing_if = "FileInputs::is_empty")]
    pub files: FileInputs,

    /// Inputs specified by path, matching only files tracked by Git.
    #[serde(rename = "GitFiles", default, skip_serializing_if = "GitFileInputs::is_empty")]
    pub git_files: GitFileInputs,

    /// Directories containing Go applications whose sources are discovered.
    #[serde(
        rename = "GolangSources",
        default,
        skip_serializing_if = "GolangSources::is_empty"
    )]
    pub golang_sources: GolangSources,
}

impl Input {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.git_files.is_empty() && self.golang_sources.is_empty()
    }

    pub fn validate(&self) -> ValidationResult {
        self.files.validate().in_element("Files")?;
        self.git_files.validate().in_element("GitFiles")?;
        self.golang_sources.validate().in_element("GolangSources")?;
        Ok(())
    }
}

/// Relative paths to source files.
///
/// Glob syntax is supported, `**` matches directories recursively and may
/// appear once per path. Valid variables: `$ROOT`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInputs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

impl FileInputs {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn validate(&self) -> ValidationResult {
        for path in &self.paths {
            if path.is_empty() {
                return Err(ValidationError::new("paths", "a path can not be empty"));
            }

            if path.matches("**").count() > 1 {
                return Err(ValidationError::new(
                    "paths",
                    format!("invalid path '{}': '**' can only appear one time in a path", path),
                ));
            }
        }

        Ok(())
    }
}

/// Paths matched against files tracked by Git, using `git ls-files`
/// patterns. Valid variables: `$ROOT`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitFileInputs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

impl GitFileInputs {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn validate(&self) -> ValidationResult {
        if self.paths.iter().any(String::is_empty) {
            return Err(ValidationError::new("paths", "a path can not be empty"));
        }

        Ok(())
    }
}

/// Go source discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GolangSources {
    /// Environment used when discovering sources (GOFLAGS, GOPATH, ...).
    /// Valid variables: `$ROOT`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,

    /// Directories containing Go source files. Imported packages are
    /// discovered too; stdlib packages and test files are ignored.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

impl GolangSources {
    pub fn is_empty(&self) -> bool {
        self.environment.is_empty() && self.paths.is_empty()
    }

    pub fn validate(&self) -> ValidationResult {
        if !self.environment.is_empty() && self.paths.is_empty() {
            return Err(ValidationError::new(
                "paths",
                "must be set if environment is set",
            ));
        }

        if self.paths.iter().any(String::is_empty) {
            return Err(ValidationError::new("paths", "a path can not be empty"));
        }

        Ok(())
    }
}

/// An exemplary input section.
pub fn example_input() -> Input {
    Input {
        files: FileInputs {
            paths: vec!["dbmigrations/*.sql".to_string()],
        },
        git_files: GitFileInputs {
            paths: vec!["Makefile".to_string()],
        },
        golang_sources: GolangSources {
            environment: vec!["GOFLAGS=-mod=vendor".to_string(), "GO111MODULE=on".to_string()],
            paths: vec![".".to_string()],
        },
    }
}
