//! Error types for the triptych diff pipeline.
//!
//! Errors carry the path they relate to so a failed job can be reported
//! with enough context to reproduce it by hand.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for triptych operations.
#[derive(Error, Debug)]
pub enum TriptychError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline errors, organized by stage.
///
/// `SourceDir` is fatal for the whole run; every other variant is scoped
/// to a single job and never stops the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The first input directory could not be listed
    #[error("Cannot list source directory {path}: {source}")]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image encoding failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// The external comparison tool could not be run
    #[error("Compare tool failed for {path}: {message}")]
    Compare { path: PathBuf, message: String },
}

/// Convenience type alias for triptych results.
pub type Result<T> = std::result::Result<T, TriptychError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
