// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for cfglayer.
//!
//! Each pipeline concern has its own error enum. They are gathered into
//! [`CfgError`] for the CLI, and [`BuildError`] tags a pipeline failure with
//! the stage that produced it.

use std::path::PathBuf;
use thiserror::Error;

use crate::build::{BuildState, BuildStep};
use crate::config::{DocumentRole, NodeKind};

/// The main error type for cfglayer operations.
#[derive(Error, Debug)]
pub enum CfgError {
    // Pipeline errors, tagged with their stage
    #[error(transparent)]
    Build(#[from] BuildError),

    // Document loading errors outside the pipeline
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    // Schema compilation errors outside the pipeline
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    // Output errors outside the pipeline
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    // Scaffolding errors
    #[error("Scaffold error: {0}")]
    Scaffold(#[from] ScaffoldError),

    // Tool settings errors
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // UI/Interactive errors
    #[error("UI error: {0}")]
    Ui(String),

    // User cancelled operation
    #[error("Operation cancelled by user")]
    Cancelled,

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl From<dialoguer::Error> for CfgError {
    fn from(err: dialoguer::Error) -> Self {
        CfgError::Ui(err.to_string())
    }
}

/// Errors raised while discovering and parsing configuration documents.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Configuration directory not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Cannot read {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("No valid configuration documents in {dir}")]
    NoValidDocuments { dir: PathBuf },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("No base document (default*) in {dir}")]
    MissingBase { dir: PathBuf },

    #[error("More than one {role} document: {first} and {second}")]
    DuplicateRole {
        role: DocumentRole,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Errors raised by the schema compiler.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Key '{key}' at '{path}' cannot be used as an accessor name: {reason}")]
    UnrepresentableKey {
        path: String,
        key: String,
        reason: String,
    },

    #[error("Resolved configuration must be a mapping, found {found}")]
    NotAMapping { found: NodeKind },

    #[error("Invalid root type name '{name}'")]
    InvalidRootType { name: String },
}

/// Errors raised while rendering or writing the generated accessor source.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to render accessor source: {message}")]
    RenderError { message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: PathBuf, message: String },
}

/// Errors raised while writing starter documents.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("{dir} already contains {file}, please choose a clean directory")]
    DirectoryNotClean { dir: PathBuf, file: String },

    #[error("Directory does not exist: {dir}")]
    MissingDirectory { dir: PathBuf },

    #[error("No flavors selected")]
    NoFlavors,

    #[error("Invalid template for flavor '{flavor}': {message}")]
    InvalidTemplate { flavor: String, message: String },
}

/// Errors raised while loading the tool's own settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse settings: {message}")]
    ParseError { message: String },
}

/// The concern-specific error carried by a [`BuildError`].
#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// A pipeline failure, tagged with the step that failed and the last state reached.
#[derive(Error, Debug)]
#[error("{step} stage failed: {source}")]
pub struct BuildError {
    /// The step that was being attempted.
    pub step: BuildStep,
    /// The last state successfully reached before the failure.
    pub reached: BuildState,
    /// The underlying cause.
    #[source]
    pub source: StageError,
}

impl BuildError {
    /// Create a new build error.
    pub fn new(step: BuildStep, reached: BuildState, source: impl Into<StageError>) -> Self {
        Self {
            step,
            reached,
            source: source.into(),
        }
    }
}

/// Result type alias for cfglayer operations.
pub type Result<T> = std::result::Result<T, CfgError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CfgError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::NotFound {
            path: PathBuf::from("/path/to/config"),
        };
        assert!(err.to_string().contains("/path/to/config"));
    }

    #[test]
    fn test_build_error_is_stage_tagged() {
        let err = BuildError::new(
            BuildStep::Load,
            BuildState::Start,
            LoadError::NoValidDocuments {
                dir: PathBuf::from("conf"),
            },
        );
        let message = err.to_string();
        assert!(message.starts_with("load stage failed"));
        assert!(message.contains("conf"));
    }

    #[test]
    fn test_unrepresentable_key_display() {
        let err = SchemaError::UnrepresentableKey {
            path: "db".to_string(),
            key: "$$".to_string(),
            reason: "no alphanumeric characters".to_string(),
        };
        assert!(err.to_string().contains("'$$'"));
        assert!(err.to_string().contains("'db'"));
    }

    #[test]
    fn test_cfg_error_from_build_error_is_transparent() {
        let err: CfgError = BuildError::new(
            BuildStep::Write,
            BuildState::SchemaCompiled,
            OutputError::WriteError {
                path: PathBuf::from("out.rs"),
                message: "denied".to_string(),
            },
        )
        .into();
        assert!(err.to_string().starts_with("write stage failed"));
    }

    #[test]
    fn test_context_wraps_message() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "boom",
        ));
        let err = io.context("scaffold").unwrap_err();
        assert_eq!(err.to_string(), "scaffold: boom");
    }
}
