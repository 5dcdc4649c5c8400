//! Encoding and decoding of configuration files.
//!
//! The format is chosen from the file extension: `.toml` files use TOML,
//! `.yaml`/`.yml` files use YAML. Both encoders keep struct field order, and
//! empty optional sections are skipped by the model's serde attributes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Failure while converting between bytes and typed configuration.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("file is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(ConfigFormat::Toml),
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }

    pub fn decode<T: DeserializeOwned>(self, content: &[u8]) -> std::result::Result<T, CodecError> {
        let text = std::str::from_utf8(content)?;
        match self {
            ConfigFormat::Toml => Ok(toml::from_str(text)?),
            ConfigFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        }
    }

    pub fn encode<T: Serialize>(self, value: &T) -> std::result::Result<String, CodecError> {
        match self {
            ConfigFormat::Toml => Ok(toml::to_string_pretty(value)?),
            ConfigFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

/// Read and decode a configuration file, picking the format from its extension.
pub fn from_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = ConfigFormat::from_path(path).unwrap_or(ConfigFormat::Toml);
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;

    format.decode(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode `value` and write it to `path`.
///
/// Without `overwrite` an existing file is an error.
pub fn to_file<T: Serialize>(value: &T, path: &Path, overwrite: bool) -> Result<()> {
    let format = ConfigFormat::from_path(path).unwrap_or(ConfigFormat::Toml);
    let content = format.encode(value).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(path).map_err(|e| Error::io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::io(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        paths: Vec<String>,
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/.app.toml")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("inc.yml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("README.md")), None);
    }

    #[test]
    fn test_toml_keeps_field_order() {
        let sample = Sample {
            name: "shop".to_string(),
            paths: vec!["*.go".to_string()],
        };
        let text = ConfigFormat::Toml.encode(&sample).unwrap();
        let name_pos = text.find("name").unwrap();
        let paths_pos = text.find("paths").unwrap();
        assert!(name_pos < paths_pos);
    }

    #[test]
    fn test_to_file_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sample.yaml");
        let sample = Sample {
            name: "a".to_string(),
            paths: vec![],
        };

        to_file(&sample, &path, false).unwrap();
        let err = to_file(&sample, &path, false).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));

        to_file(&sample, &path, true).unwrap();
        let read: Sample = from_file(&path).unwrap();
        assert_eq!(read, sample);
    }

    #[test]
    fn test_parse_error_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        std::fs::write(&path, "name = [unterminated").unwrap();

        let err = from_file::<Sample>(&path).unwrap_err();
        match err {
            Error::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
