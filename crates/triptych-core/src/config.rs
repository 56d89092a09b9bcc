//! Configuration management for triptych.
//!
//! Configuration is loaded from the platform config directory with
//! sensible defaults; CLI flags override individual fields. The pipeline
//! receives the whole structure by value — there is no process-wide
//! mutable state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Root configuration structure for triptych.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pipeline settings
    pub pipeline: PipelineConfig,

    /// External comparison tool settings
    pub compare: CompareConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Pipeline settings for parallelism and backpressure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of parallel diff workers; 0 means one per host CPU
    pub workers: usize,

    /// Max jobs buffered between pipeline stages
    pub buffer_size: usize,

    /// Treat external-tool failures as job failures instead of
    /// compositing a blank diff panel
    pub strict: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            buffer_size: 32,
            strict: false,
        }
    }
}

impl PipelineConfig {
    /// Resolve the effective worker count, treating 0 as "host CPUs".
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

/// External comparison tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Executable to invoke; resolved via PATH when not absolute
    pub program: PathBuf,

    /// Color the tool uses to highlight differing pixels
    pub highlight_color: String,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("compare"),
            highlight_color: "blue".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", or "trace"
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories, falling back to
    /// `~/.triptych/config.toml` if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("io", "triptych", "triptych")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".triptych").join("config.toml")
            })
    }

    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.buffer_size == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.buffer_size must be > 0".into(),
            ));
        }
        if self.compare.program.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "compare.program must not be empty".into(),
            ));
        }
        if self.compare.highlight_color.is_empty() {
            return Err(ConfigError::ValidationError(
                "compare.highlight_color must not be empty".into(),
            ));
        }
        Ok(())
    }
}
