//! The concurrent diff pipeline.
//!
//! Stages, in stream order:
//! - **job**: enumerate matching `.png` filenames across the two inputs
//! - **filter**: drop pairs whose files are not both present
//! - **worker**: normalize, invoke the compare tool, composite, clean up
//! - **pool**: fan the filtered stream out to N workers and merge their
//!   outcomes back into one completion-ordered stream
//! - **channel**: the bounded-channel stage plumbing shared by the above

pub mod channel;
pub mod filter;
pub mod job;
pub mod pool;
pub mod worker;

// Re-exports for convenient access
pub use job::{DiffJob, JobOutcome, JobSource};
pub use pool::{DiffPipeline, PipelineRun};
pub use worker::DiffWorker;
