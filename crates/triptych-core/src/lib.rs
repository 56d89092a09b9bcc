//! Triptych Core - side-by-side visual diff pipeline.
//!
//! Compares two directories of PNG screenshots pairwise by filename and
//! writes, for every pair, a three-panel composite: original A, the
//! external tool's highlighted diff, original B.
//!
//! # Architecture
//!
//! ```text
//! Job Source → Filter → N × Diff Worker → completion-ordered outcomes
//! ```
//!
//! Stages communicate over bounded channels; channel closure is the only
//! completion signal. The pixel-level diff itself is delegated to an
//! external tool (ImageMagick `compare` by default).
//!
//! # Usage
//!
//! ```rust,ignore
//! use triptych_core::{Config, DiffPipeline};
//!
//! #[tokio::main]
//! async fn main() -> triptych_core::Result<()> {
//!     let pipeline = DiffPipeline::new(Config::load()?);
//!     let mut outcomes = pipeline.spawn(dir_a, dir_b, out_dir)?;
//!     while let Some(outcome) = outcomes.recv().await {
//!         println!("{}", outcome.job().output.display());
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod codec;
pub mod compose;
pub mod config;
pub mod error;
pub mod invoke;
pub mod pipeline;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult, Result, TriptychError};
pub use invoke::CompareTool;
pub use pipeline::{DiffJob, DiffPipeline, DiffWorker, JobOutcome, JobSource, PipelineRun};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
