//! Error types for the generation pipeline

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A planned artifact names a template that is not embedded
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// A binary template was planned with variable bindings
    #[error("template '{0}' is binary and cannot be rendered")]
    BinaryTemplate(String),

    /// Two artifacts were planned for the same destination path
    #[error("artifact planned twice for {}", .0.display())]
    DuplicateArtifact(PathBuf),

    #[error("unknown test framework '{name}' (available: {available})")]
    UnknownTestFramework { name: String, available: String },

    #[error("invalid options file {}: {source}", path.display())]
    InvalidOptionsFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to render template '{template}': {source}")]
    Render {
        template: String,
        source: tera::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    /// The dependency installer could not run or exited unsuccessfully
    #[error("`{command}` failed: {reason}")]
    Install { command: String, reason: String },

    #[error("terminal output failed: {0}")]
    Terminal(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error is a configuration (programmer) error rather than an
    /// environmental failure
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::TemplateNotFound(_)
                | Error::BinaryTemplate(_)
                | Error::DuplicateArtifact(_)
                | Error::UnknownTestFramework { .. }
                | Error::InvalidOptionsFile { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(Error::TemplateNotFound("x".into()).is_configuration());
        assert!(Error::DuplicateArtifact(PathBuf::from("a")).is_configuration());
        assert!(!Error::Install {
            command: "npm install".into(),
            reason: "exit code 1".into()
        }
        .is_configuration());
    }

    #[test]
    fn test_duplicate_message_names_path() {
        let err = Error::DuplicateArtifact(PathBuf::from("app/index.html"));
        assert_eq!(err.to_string(), "artifact planned twice for app/index.html");
    }
}
