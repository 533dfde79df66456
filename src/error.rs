use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use serde_yaml::Error as YamlError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum CommentError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Content conversion error: {0}")]
    Conversion(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Comment document has no 'content' or 'comment' field")]
    MissingContent,
    #[error("Comment document has no 'post_id' field")]
    MissingIdentifier,
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("Comment document parse error: {0}")]
    Parse(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl CommentError {
    /// True for the failures that make a single comment file unusable (the ParseError family).
    /// The store recovers from these by skipping the file.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            CommentError::Parse(_)
                | CommentError::Io(_)
                | CommentError::NotFound(_)
                | CommentError::PermissionDenied
                | CommentError::MissingContent
                | CommentError::MissingIdentifier
        )
    }
}

impl From<YamlError> for CommentError {
    fn from(src: YamlError) -> CommentError {
        CommentError::Parse(format!("YAML exception: {src}"))
    }
}

impl From<JsonError> for CommentError {
    fn from(src: JsonError) -> CommentError {
        CommentError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<toml::de::Error> for CommentError {
    fn from(src: toml::de::Error) -> CommentError {
        CommentError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for CommentError {
    fn from(src: toml::ser::Error) -> CommentError {
        CommentError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<io::Error> for CommentError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => CommentError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => CommentError::PermissionDenied,
            io::ErrorKind::InvalidData => {
                CommentError::Parse(format!("File is not valid UTF-8: {x}"))
            }
            _ => CommentError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<walkdir::Error> for CommentError {
    fn from(x: walkdir::Error) -> Self {
        let path = x.path().map(|p| p.display().to_string()).unwrap_or_default();
        match x.into_io_error() {
            Some(io_error) if io_error.kind() == io::ErrorKind::PermissionDenied => {
                CommentError::PermissionDenied
            }
            Some(io_error) => CommentError::Io(format!("{path}: {}", io_error.kind())),
            None => CommentError::Io(format!("{path}: filesystem loop detected")),
        }
    }
}
