//! Semantic error types for the gemsecrets application.
//!
//! This module defines the error hierarchy for gemsecrets, following the
//! principle of using semantic error enums (via `thiserror`) for conditions the
//! caller might inspect or report per file, while reserving opaque errors
//! (`eyre::Report`) for the application boundary.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while resolving generator input.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file named explicitly on the command line was not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file '{path}': {message}")]
    ParseError {
        /// The path of the offending file.
        path: PathBuf,
        /// A description of the parse error.
        message: String,
    },

    /// One or more required values are missing after every source was consulted.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The names of the missing fields, comma separated.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// No configuration file was found and no value was supplied at all.
    #[error("nothing to do: no configuration file found and no flags provided\n{sample}")]
    NothingToDo {
        /// Sample configuration shown to the user.
        sample: &'static str,
    },

    /// Reading an interactive answer failed.
    #[error("failed to read '{field}' from the terminal: {message}")]
    PromptFailed {
        /// The field being prompted for.
        field: String,
        /// A description of the failure.
        message: String,
    },

    /// The `OrthoConfig` library returned an error while merging layers.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors that can occur while rendering a manifest.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The effective configuration lacks a field the manifest shape needs.
    #[error("cannot render {manifest}: missing field '{field}'")]
    MissingField {
        /// The manifest being rendered.
        manifest: String,
        /// The absent field.
        field: String,
    },

    /// A Kubernetes name or data key is not valid.
    #[error("invalid {kind} '{value}': {reason}")]
    InvalidName {
        /// What was being named (`secret name`, `namespace`, `data key`).
        kind: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A secret was rendered without any data entries.
    #[error("secret '{name}' has no data entries")]
    EmptyData {
        /// The secret name.
        name: String,
    },

    /// Structured serialisation failed.
    #[error("failed to serialise {manifest}: {message}")]
    Serialise {
        /// The manifest being rendered.
        manifest: String,
        /// The serialiser's message.
        message: String,
    },
}

/// Errors that can occur during filesystem operations.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// A file or directory was not found.
    #[error("path not found: {path}: {message}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
        /// The underlying I/O error.
        message: String,
    },

    /// Permission denied when accessing a path.
    #[error("permission denied: {path}: {message}")]
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
        /// The underlying I/O error.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error at '{path}': {message}")]
    IoError {
        /// The path where the error occurred.
        path: PathBuf,
        /// A description of the I/O error.
        message: String,
    },

    /// At least one manifest of a multi-file run could not be written.
    #[error("failed to write {failed} of {total} manifests")]
    PartialWrite {
        /// Number of failed writes.
        failed: usize,
        /// Number of attempted writes.
        total: usize,
    },
}

impl FilesystemError {
    /// Classify an I/O error for `path` by its kind.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path_buf = path.into();
        let message = error.to_string();
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                path: path_buf,
                message,
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path_buf,
                message,
            },
            _ => Self::IoError {
                path: path_buf,
                message,
            },
        }
    }
}

/// Top-level error type for the gemsecrets application.
///
/// This enum aggregates all domain-specific errors into a single type that can
/// be used throughout the application. At the application boundary (main.rs),
/// these errors are converted to `eyre::Report` for human-readable reporting.
#[derive(Debug, Error)]
pub enum GemSecretsError {
    /// An error occurred while resolving input.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while rendering a manifest.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// An error occurred during filesystem operations.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// A specialised `Result` type for gemsecrets operations.
pub type Result<T> = std::result::Result<T, GemSecretsError>;
