/// Error types for tokenshift.
///
/// Only a small part of a run can actually fail. Validation problems abort before any file
/// is touched; everything that happens afterwards degrades into per-file outcomes or
/// warnings. The variants below are what the library hands back through `Result`:
/// ```rust,ignore
/// match renamer.run() {
///     Ok(report) => // inspect report.summary,
///     Err(RenameError::Validation(issues)) => // print each (field, message, value),
///     Err(e) => // walking the tree or building the worker pool failed
/// }
/// ```
///
/// The driver also uses these errors internally for a single file and turns them into the
/// message stored on that file's `FileOutcome`, so the `Display` text doubles as the
/// user-facing per-file error.
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type for rename operations
pub type RenameResult<T> = Result<T, RenameError>;

/// Errors that can occur while renaming
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid UTF-8 in file {0}")]
    InvalidUtf8(PathBuf),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid options:\n{0}")]
    Validation(ValidationErrors),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Git error: {0}")]
    GitError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl RenameError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn invalid_utf8(path: impl Into<PathBuf>) -> Self {
        Self::InvalidUtf8(path.into())
    }

    pub fn invalid_pattern(pattern: impl Into<String>) -> Self {
        Self::InvalidPattern(pattern.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn git_error(msg: impl Into<String>) -> Self {
        Self::GitError(msg.into())
    }

    /// Maps an I/O error on `path` to the most specific variant.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}

impl From<ValidationErrors> for RenameError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
