//! Task outputs and their upload destinations.

use serde::{Deserialize, Serialize};

use crate::validation::{ElementPathExt, ValidationError, ValidationResult};

/// Artifacts produced by a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Docker images produced by the task command.
    #[serde(rename = "DockerImage", default, skip_serializing_if = "Vec::is_empty")]
    pub docker_image: Vec<DockerImageOutput>,

    /// Files produced by the task command.
    #[serde(rename = "File", default, skip_serializing_if = "Vec::is_empty")]
    pub file: Vec<FileOutput>,
}

impl Output {
    pub fn is_empty(&self) -> bool {
        self.docker_image.is_empty() && self.file.is_empty()
    }

    /// Drop entries whose every field is empty.
    ///
    /// Generated templates contain placeholder sections that are present but
    /// blank; they must not be treated as real declarations.
    pub fn remove_empty_sections(&mut self) {
        self.file.retain(|f| !f.is_empty());
        self.docker_image.retain(|d| !d.is_empty());
    }

    pub fn validate(&self) -> ValidationResult {
        for file in &self.file {
            file.validate().in_element("File")?;
        }

        for image in &self.docker_image {
            image.validate().in_element("DockerImage")?;
        }

        Ok(())
    }
}

/// A file artifact and where it is published.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutput {
    /// Path relative to the application directory. Valid variables: `$APPNAME`.
    #[serde(default)]
    pub path: String,

    /// Copy the file to a local directory.
    #[serde(rename = "FileCopy", default, skip_serializing_if = "FileCopy::is_empty")]
    pub file_copy: FileCopy,

    /// Upload the file to S3.
    #[serde(rename = "S3Upload", default, skip_serializing_if = "S3Upload::is_empty")]
    pub s3_upload: S3Upload,
}

impl FileOutput {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.file_copy.is_empty() && self.s3_upload.is_empty()
    }

    pub fn validate(&self) -> ValidationResult {
        if self.path.is_empty() {
            return Err(ValidationError::new("path", "can not be unset or empty"));
        }

        self.s3_upload.validate().in_element("S3Upload")
    }
}

/// Local copy destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCopy {
    /// Destination path.
    #[serde(default)]
    pub path: String,
}

impl FileCopy {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// S3 upload destination. Either both fields are set or none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Upload {
    /// Bucket name. Valid variables: `$APPNAME`.
    #[serde(default)]
    pub bucket: String,

    /// Remote file name. Valid variables: `$APPNAME`, `$UUID`, `$GITCOMMIT`.
    #[serde(default)]
    pub dest_file: String,
}

impl S3Upload {
    pub fn is_empty(&self) -> bool {
        self.bucket.is_empty() && self.dest_file.is_empty()
    }

    pub fn validate(&self) -> ValidationResult {
        if self.is_empty() {
            return Ok(());
        }

        if self.bucket.is_empty() {
            return Err(ValidationError::new("bucket", "can not be unset or empty"));
        }

        if self.dest_file.is_empty() {
            return Err(ValidationError::new("dest_file", "can not be unset or empty"));
        }

        Ok(())
    }
}

/// A docker image artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImageOutput {
    /// File written by the task command containing the image id
    /// (`docker build --iidfile`). Valid variables: `$APPNAME`.
    #[serde(default)]
    pub idfile: String,

    /// Registry repository the image is pushed to.
    #[serde(
        rename = "RegistryUpload",
        default,
        skip_serializing_if = "DockerImageRegistryUpload::is_empty"
    )]
    pub registry_upload: DockerImageRegistryUpload,
}

impl DockerImageOutput {
    pub fn is_empty(&self) -> bool {
        self.idfile.is_empty() && self.registry_upload.is_empty()
    }

    pub fn validate(&self) -> ValidationResult {
        if self.idfile.is_empty() {
            return Err(ValidationError::new("idfile", "can not be unset or empty"));
        }

        self.registry_upload.validate().in_element("RegistryUpload")
    }
}

/// Registry destination. Either both fields are set or none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImageRegistryUpload {
    /// `[<server[:port]>/]<owner>/<repository>`. Valid variables: `$APPNAME`.
    #[serde(default)]
    pub repository: String,

    /// Tag applied to the image. Valid variables: `$APPNAME`, `$UUID`, `$GITCOMMIT`.
    #[serde(default)]
    pub tag: String,
}

impl DockerImageRegistryUpload {
    pub fn is_empty(&self) -> bool {
        self.repository.is_empty() && self.tag.is_empty()
    }

    pub fn validate(&self) -> ValidationResult {
        if self.is_empty() {
            return Ok(());
        }

        if self.repository.is_empty() {
            return Err(ValidationError::new("repository", "can not be unset or empty"));
        }

        if self.tag.is_empty() {
            return Err(ValidationError::new("tag", "can not be unset or empty"));
        }

        Ok(())
    }
}

/// An exemplary output section.
pub fn example_output() -> Output {
    Output {
        docker_image: vec![DockerImageOutput {
            idfile: "$APPNAME-container.id".to_string(),
            registry_upload: DockerImageRegistryUpload {
                repository: "my-company/$APPNAME".to_string(),
                tag: "$GITCOMMIT".to_string(),
            },
        }],
        file: vec![FileOutput {
            path: "dist/$APPNAME.tar.xz".to_string(),
            file_copy: FileCopy {
                path: "/mnt/fileserver/build_artifacts/$APPNAME-$GITCOMMIT.tar.xz".to_string(),
            },
            s3_upload: S3Upload {
                bucket: "go-artifacts/".to_string(),
                dest_file: "$APPNAME-$GITCOMMIT.tar.xz".to_string(),
            },
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_empty_sections() {
        let mut output = Output {
            docker_image: vec![DockerImageOutput::default()],
            file: vec![
                FileOutput::default(),
                FileOutput {
                    path: "a.out".to_string(),
                    ..Default::default()
                },
            ],
        };

        output.remove_empty_sections();

        assert!(output.docker_image.is_empty());
        assert_eq!(output.file.len(), 1);
        assert_eq!(output.file[0].path, "a.out");
    }

    #[test]
    fn test_partial_s3_upload_is_invalid() {
        let file = FileOutput {
            path: "dist/app.tar".to_string(),
            s3_upload: S3Upload {
                bucket: String::new(),
                dest_file: "app.tar".to_string(),
            },
            ..Default::default()
        };

        let err = Output {
            file: vec![file],
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert_eq!(err.path(), "File.S3Upload.bucket");
    }

    #[test]
    fn test_partial_registry_upload_is_invalid() {
        let image = DockerImageOutput {
            idfile: "id".to_string(),
            registry_upload: DockerImageRegistryUpload {
                repository: "org/app".to_string(),
                tag: String::new(),
            },
        };

        let err = image.validate().unwrap_err();
        assert_eq!(err.path(), "RegistryUpload.tag");
    }

    #[test]
    fn test_file_output_without_path_is_invalid() {
        let file = FileOutput {
            file_copy: FileCopy {
                path: "/tmp".to_string(),
            },
            ..Default::default()
        };

        let err = file.validate().unwrap_err();
        assert_eq!(err.element_path, vec!["path"]);
    }

    #[test]
    fn test_example_output_is_valid() {
        assert!(example_output().validate().is_ok());
    }
}
