//! Job descriptors and the job source.

use std::ffi::OsStr;
use std::fs::ReadDir;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// One directory-pair comparison to perform.
///
/// Jobs are immutable: stages forward or drop them, never mutate them.
/// `input_a` and `input_b` carry the same filename under their respective
/// directories, and `output` is unique per job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffJob {
    /// Image from the first directory
    pub input_a: PathBuf,
    /// Same-named image from the second directory
    pub input_b: PathBuf,
    /// Destination for the composite result
    pub output: PathBuf,
}

impl DiffJob {
    /// Build the job for one shared filename.
    pub fn for_name(dir_a: &Path, dir_b: &Path, out_dir: &Path, name: &OsStr) -> Self {
        Self {
            input_a: dir_a.join(name),
            input_b: dir_b.join(name),
            output: out_dir.join(name),
        }
    }
}

/// Result of running one job through a diff worker, emitted in
/// completion order.
#[derive(Debug)]
pub enum JobOutcome {
    /// The composite was written to the job's output path
    Completed(DiffJob),
    /// The job failed; no usable output was produced
    Failed(DiffJob, PipelineError),
}

impl JobOutcome {
    /// The job this outcome refers to.
    pub fn job(&self) -> &DiffJob {
        match self {
            JobOutcome::Completed(job) | JobOutcome::Failed(job, _) => job,
        }
    }

    /// Whether the job produced its composite.
    pub fn is_completed(&self) -> bool {
        matches!(self, JobOutcome::Completed(_))
    }
}

/// Enumerates `.png` files in the first directory and pairs each with its
/// counterpart paths.
///
/// Only the first directory is listed; whether the counterpart exists is
/// the filter stage's concern. Emission order follows the OS directory
/// listing and is unspecified.
#[derive(Debug)]
pub struct JobSource {
    dir_a: PathBuf,
    dir_b: PathBuf,
    out_dir: PathBuf,
}

impl JobSource {
    /// Create a source over the two input directories and the output
    /// directory.
    pub fn new(dir_a: &Path, dir_b: &Path, out_dir: &Path) -> Self {
        Self {
            dir_a: dir_a.to_path_buf(),
            dir_b: dir_b.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
        }
    }

    /// Open the source directory and return a lazy job iterator.
    ///
    /// Failing to list the source directory is fatal for the whole run,
    /// so the listing is opened eagerly here while entries stream lazily.
    pub fn open(self) -> Result<JobIter, PipelineError> {
        let entries = std::fs::read_dir(&self.dir_a).map_err(|e| PipelineError::SourceDir {
            path: self.dir_a.clone(),
            source: e,
        })?;
        Ok(JobIter {
            source: self,
            entries,
        })
    }
}

/// Lazy, single-pass iterator over the discovered jobs.
#[derive(Debug)]
pub struct JobIter {
    source: JobSource,
    entries: ReadDir,
}

impl Iterator for JobIter {
    type Item = DiffJob;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let name = entry.file_name();
            if !has_png_extension(Path::new(&name)) {
                continue;
            }
            return Some(DiffJob::for_name(
                &self.source.dir_a,
                &self.source.dir_b,
                &self.source.out_dir,
                &name,
            ));
        }
    }
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}
