//! Subprocess boundary to the external image-comparison tool.
//!
//! The tool's contract: given two same-size images and an output path,
//! write a highlighted-difference image to that path. ImageMagick's
//! `compare` exits 1 when the inputs differ, so a non-zero exit is a
//! normal outcome, not an invocation failure.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use crate::config::CompareConfig;
use crate::error::PipelineError;

/// Invokes the configured comparison executable.
#[derive(Debug, Clone)]
pub struct CompareTool {
    program: PathBuf,
    highlight_color: String,
}

impl CompareTool {
    /// Create an invoker from the compare configuration.
    pub fn new(config: &CompareConfig) -> Self {
        Self {
            program: config.program.clone(),
            highlight_color: config.highlight_color.clone(),
        }
    }

    /// Run the tool on two same-size images, writing the diff to `output`.
    ///
    /// Returns the child's exit status. `Err` means the process could not
    /// be spawned or waited on at all; an unsuccessful exit status is
    /// returned as `Ok` and left to the caller's failure policy.
    pub async fn run(
        &self,
        input_a: &Path,
        input_b: &Path,
        output: &Path,
    ) -> Result<ExitStatus, PipelineError> {
        tracing::debug!(
            program = %self.program.display(),
            input_a = %input_a.display(),
            input_b = %input_b.display(),
            output = %output.display(),
            "Invoking compare tool"
        );

        let result = Command::new(&self.program)
            .arg(input_a)
            .arg(input_b)
            .arg("-highlight-color")
            .arg(&self.highlight_color)
            .arg(output)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PipelineError::Compare {
                path: output.to_path_buf(),
                message: format!("{}: {}", self.program.display(), e),
            })?;

        if !result.status.success() {
            tracing::debug!(
                code = ?result.status.code(),
                stderr = %String::from_utf8_lossy(&result.stderr).trim(),
                "Compare tool exited non-zero"
            );
        }

        Ok(result.status)
    }
}
