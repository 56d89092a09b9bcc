//! Drops jobs whose input pair is incomplete.

use std::path::Path;

use super::job::DiffJob;

/// Pass the job through iff both inputs exist as regular files.
///
/// A missing counterpart is a benign, expected condition (an image
/// present in one run but not the other), so dropped jobs produce no
/// error and no output — a debug trace only.
pub fn existing_pair(job: DiffJob) -> Option<DiffJob> {
    if !is_regular_file(&job.input_a) || !is_regular_file(&job.input_b) {
        tracing::debug!(
            input_a = %job.input_a.display(),
            input_b = %job.input_b.display(),
            "Skipping pair with missing input"
        );
        return None;
    }
    Some(job)
}

fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
