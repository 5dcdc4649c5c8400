//! Path-qualified validation errors.
//!
//! A [`ValidationError`] is created where an invariant is violated, carrying
//! the name of the offending field as its only path segment. Every validator
//! that propagates the error prepends exactly one segment naming the element
//! it validated, so the final path reads outer-to-inner:
//!
//! ```
//! use monobuild::validation::ValidationError;
//!
//! let err = ValidationError::new("bucket", "can not be empty")
//!     .prepend("S3Upload")
//!     .prepend("File")
//!     .prepend("Output")
//!     .prepend("Task(name: build)");
//!
//! assert_eq!(
//!     err.to_string(),
//!     "Task(name: build).Output.File.S3Upload.bucket: can not be empty"
//! );
//! ```

use std::fmt;

/// An invariant violation located by its element path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path segments, outermost first.
    pub element_path: Vec<String>,
    pub message: String,
}

impl ValidationError {
    /// Create an error at the given element.
    pub fn new(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            element_path: vec![element.into()],
            message: message.into(),
        }
    }

    /// Create an error that refers to the validated value as a whole.
    pub fn whole(message: impl Into<String>) -> Self {
        Self {
            element_path: Vec::new(),
            message: message.into(),
        }
    }

    /// Prepend one path segment.
    pub fn prepend(mut self, segment: impl Into<String>) -> Self {
        self.element_path.insert(0, segment.into());
        self
    }

    /// The element path joined with dots.
    pub fn path(&self) -> String {
        self.element_path.join(".")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.element_path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path(), self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validators.
pub type ValidationResult = Result<(), ValidationError>;

/// Wraps child validation results with the parent's segment.
pub trait ElementPathExt {
    fn in_element(self, segment: impl Into<String>) -> Self;
}

impl ElementPathExt for ValidationResult {
    fn in_element(self, segment: impl Into<String>) -> Self {
        self.map_err(|err| err.prepend(segment))
    }
}

/// Segment naming a list entry by its name, or the bare section when unnamed.
pub fn named_segment(section: &str, key: &str, value: &str) -> String {
    if value.is_empty() {
        section.to_string()
    } else {
        format!("{}({}: {})", section, key, value)
    }
}
