//! Error types for configuration loading.

use crate::codec::CodecError;
use crate::validation::ValidationError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The two independent include id namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Input and Output includes share one namespace.
    InputOutput,
    /// Task-group includes.
    TaskGroup,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::InputOutput => write!(f, "input/output"),
            Namespace::TaskGroup => write!(f, "task group"),
        }
    }
}

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ParseError,
    ReferenceError,
    DuplicateIdError,
    ValidationError,
    IoError,
}

/// Errors raised while loading includes and applications.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration file could not be decoded.
    #[error("parsing {path:?} failed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// An include id was not found in the namespace it was looked up in.
    #[error("could not find {namespace} include with id '{id}' referenced by {referrer}")]
    Reference {
        id: String,
        namespace: Namespace,
        referrer: String,
    },

    /// Two includes in one namespace share an id.
    #[error(
        "multiple {namespace} includes with id '{id}' are defined ({first:?} and {second:?}), ids must be unique"
    )]
    DuplicateId {
        id: String,
        namespace: Namespace,
        first: PathBuf,
        second: PathBuf,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A symlink was found where symlinks are not allowed.
    #[error("{path:?} is a symlink")]
    Symlink { path: PathBuf },

    /// Context added by the stage that processed a file.
    #[error("{context} {path:?} failed: {source}")]
    InFile {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap this error with the file being processed.
    pub fn in_file(self, context: &'static str, path: &Path) -> Self {
        Self::InFile {
            context,
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }

    /// The innermost error below all file context layers.
    pub fn root(&self) -> &Error {
        match self {
            Error::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    /// The validation error, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self.root() {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self.root() {
            Error::Parse { .. } => ErrorCode::ParseError,
            Error::Reference { .. } => ErrorCode::ReferenceError,
            Error::DuplicateId { .. } => ErrorCode::DuplicateIdError,
            Error::Validation(_) => ErrorCode::ValidationError,
            Error::Io { .. } | Error::Symlink { .. } => ErrorCode::IoError,
            Error::InFile { source, .. } => source.code(),
        }
    }
}

/// Serializable error report for machine-readable CLI output.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_path: Option<Vec<String>>,
}

impl From<&Error> for ErrorReport {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            element_path: err.as_validation().map(|v| v.element_path.clone()),
        }
    }
}
