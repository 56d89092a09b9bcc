//! Per-job diff worker: size normalization, external diff invocation,
//! composite assembly, and temp cleanup.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};

use crate::codec;
use crate::compose;
use crate::config::Config;
use crate::error::PipelineResult;
use crate::invoke::CompareTool;

use super::job::{DiffJob, JobOutcome};

/// Executes one job at a time, each to full completion before the next.
pub struct DiffWorker {
    tool: CompareTool,
    strict: bool,
}

/// The two inputs after height normalization.
///
/// `path_a`/`path_b` point at same-size on-disk images ready for the
/// compare tool; the decoded (possibly padded) images are kept in memory
/// for the composite so they are not decoded twice.
struct NormalizedPair {
    path_a: PathBuf,
    path_b: PathBuf,
    image_a: DynamicImage,
    image_b: DynamicImage,
    temp: Option<PathBuf>,
}

impl DiffWorker {
    /// Create a worker from the pipeline configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            tool: CompareTool::new(&config.compare),
            strict: config.pipeline.strict,
        }
    }

    /// Run one job and report its outcome.
    ///
    /// Failures are scoped to the job: they are returned in the outcome,
    /// logged, and never propagate to other jobs.
    pub async fn process(&self, job: DiffJob) -> JobOutcome {
        match self.run(&job).await {
            Ok(()) => {
                tracing::debug!(output = %job.output.display(), "Composite written");
                JobOutcome::Completed(job)
            }
            Err(e) => {
                tracing::warn!(output = %job.output.display(), error = %e, "Job failed");
                JobOutcome::Failed(job, e)
            }
        }
    }

    async fn run(&self, job: &DiffJob) -> PipelineResult<()> {
        let pair = self.normalize(job).await?;
        let result = self.diff_and_combine(job, &pair).await;

        // Cleanup happens even when the job failed; removal errors are
        // not worth failing an otherwise-finished job over.
        if let Some(temp) = &pair.temp {
            if let Err(e) = tokio::fs::remove_file(temp).await {
                tracing::trace!(path = %temp.display(), "Temp file removal failed: {}", e);
            }
        }

        result
    }

    /// Bring both inputs to identical pixel dimensions.
    ///
    /// Equal heights pass through untouched. Otherwise the shorter image
    /// is padded (never scaled) to the taller image's bounds and encoded
    /// to a per-job temp path; the taller side's file is left alone.
    async fn normalize(&self, job: &DiffJob) -> PipelineResult<NormalizedPair> {
        let image_a = codec::decode(&job.input_a).await?;
        let image_b = codec::decode(&job.input_b).await?;

        let (_, height_a) = image_a.dimensions();
        let (_, height_b) = image_b.dimensions();

        if height_a == height_b {
            return Ok(NormalizedPair {
                path_a: job.input_a.clone(),
                path_b: job.input_b.clone(),
                image_a,
                image_b,
                temp: None,
            });
        }

        let temp = temp_path(&job.output);
        if height_a > height_b {
            let padded = compose::pad_to(&image_b, image_a.width(), image_a.height());
            codec::encode(padded.clone(), &temp).await?;
            Ok(NormalizedPair {
                path_a: job.input_a.clone(),
                path_b: temp.clone(),
                image_a,
                image_b: padded,
                temp: Some(temp),
            })
        } else {
            let padded = compose::pad_to(&image_a, image_b.width(), image_b.height());
            codec::encode(padded.clone(), &temp).await?;
            Ok(NormalizedPair {
                path_a: temp.clone(),
                path_b: job.input_b.clone(),
                image_a: padded,
                image_b,
                temp: Some(temp),
            })
        }
    }

    async fn diff_and_combine(&self, job: &DiffJob, pair: &NormalizedPair) -> PipelineResult<()> {
        match self.tool.run(&pair.path_a, &pair.path_b, &job.output).await {
            // Non-zero exit is normal: compare exits 1 when the images
            // differ and the diff file is still written.
            Ok(_) => {}
            Err(e) if self.strict => return Err(e),
            Err(e) => {
                tracing::warn!(
                    output = %job.output.display(),
                    "Compare tool unavailable, continuing with a blank diff panel: {}",
                    e
                );
            }
        }

        let diff = match codec::decode(&job.output).await {
            Ok(image) => image,
            Err(e) if self.strict => return Err(e),
            Err(e) => {
                tracing::warn!(
                    output = %job.output.display(),
                    "No usable diff image, substituting a blank panel: {}",
                    e
                );
                compose::blank_like(&pair.image_a)
            }
        };

        let composite = compose::combine_row(&[&pair.image_a, &diff, &pair.image_b]);
        codec::encode(composite, &job.output).await
    }
}

/// Per-job temporary path for the padded image, next to the output file.
///
/// The suffix goes after the full filename, so the temp name ends in
/// `.tmp` and can never collide with a job output — the job source only
/// ever emits `.png` names.
fn temp_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompareConfig, PipelineConfig};
    use crate::error::PipelineError;
    use image::{Rgba, RgbaImage};

    fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
        let mut img = RgbaImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgba(color);
        }
        img.save(path).unwrap();
    }

    fn config_with_tool(program: &str, strict: bool) -> Config {
        Config {
            compare: CompareConfig {
                program: PathBuf::from(program),
                highlight_color: "blue".to_string(),
            },
            pipeline: PipelineConfig {
                strict,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn job_in(dir: &Path) -> DiffJob {
        DiffJob {
            input_a: dir.join("a.png"),
            input_b: dir.join("b.png"),
            output: dir.join("out.png"),
        }
    }

    #[test]
    fn test_temp_path_is_per_job() {
        assert_eq!(
            temp_path(Path::new("/out/a.png")),
            PathBuf::from("/out/a.png.tmp")
        );
        assert_ne!(
            temp_path(Path::new("/out/a.png")),
            temp_path(Path::new("/out/b.png"))
        );
    }

    #[test]
    fn test_temp_path_is_never_a_job_output_name() {
        // `a.tmp.png` is a legitimate job output; `a.png`'s temp must
        // not land on it
        assert_ne!(
            temp_path(Path::new("/out/a.png")),
            PathBuf::from("/out/a.tmp.png")
        );
    }

    #[tokio::test]
    async fn test_equal_heights_skip_normalization() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path());
        write_png(&job.input_a, 10, 10, [255, 0, 0, 255]);
        write_png(&job.input_b, 10, 10, [0, 255, 0, 255]);

        let worker = DiffWorker::new(&config_with_tool("true", false));
        let pair = worker.normalize(&job).await.unwrap();

        assert_eq!(pair.path_a, job.input_a);
        assert_eq!(pair.path_b, job.input_b);
        assert!(pair.temp.is_none());
    }

    #[tokio::test]
    async fn test_shorter_input_is_padded_to_taller_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path());
        write_png(&job.input_a, 10, 20, [255, 0, 0, 255]);
        write_png(&job.input_b, 10, 10, [0, 255, 0, 255]);

        let worker = DiffWorker::new(&config_with_tool("true", false));
        let pair = worker.normalize(&job).await.unwrap();

        assert_eq!(pair.path_a, job.input_a);
        let temp = pair.temp.clone().unwrap();
        assert_eq!(pair.path_b, temp);
        assert_eq!(pair.image_b.dimensions(), (10, 20));

        let on_disk = codec::decode(&temp).await.unwrap();
        assert_eq!(on_disk.dimensions(), (10, 20));
        // Original pixels unchanged at the origin
        assert_eq!(on_disk.get_pixel(0, 0), Rgba([0, 255, 0, 255]));
    }

    #[tokio::test]
    async fn test_unreachable_tool_still_produces_composite() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path());
        write_png(&job.input_a, 10, 10, [255, 0, 0, 255]);
        write_png(&job.input_b, 10, 10, [0, 255, 0, 255]);

        let worker = DiffWorker::new(&config_with_tool("/nonexistent/compare", false));
        let outcome = worker.process(job.clone()).await;

        assert!(outcome.is_completed());
        let composite = codec::decode(&job.output).await.unwrap();
        assert_eq!(composite.dimensions(), (30, 10));
    }

    #[tokio::test]
    async fn test_strict_mode_fails_on_unreachable_tool() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path());
        write_png(&job.input_a, 10, 10, [255, 0, 0, 255]);
        write_png(&job.input_b, 10, 10, [0, 255, 0, 255]);

        let worker = DiffWorker::new(&config_with_tool("/nonexistent/compare", true));
        let outcome = worker.process(job.clone()).await;

        assert!(!outcome.is_completed());
        assert!(!job.output.exists());
    }

    #[tokio::test]
    async fn test_strict_mode_fails_when_tool_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path());
        write_png(&job.input_a, 10, 10, [255, 0, 0, 255]);
        write_png(&job.input_b, 10, 10, [0, 255, 0, 255]);

        // `true` spawns fine but leaves no diff image behind
        let worker = DiffWorker::new(&config_with_tool("true", true));
        let outcome = worker.process(job).await;

        match outcome {
            JobOutcome::Failed(_, PipelineError::Decode { .. }) => {}
            other => panic!("expected decode failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_undecodable_input_fails_job() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path());
        std::fs::write(&job.input_a, b"not a png").unwrap();
        write_png(&job.input_b, 10, 10, [0, 255, 0, 255]);

        let worker = DiffWorker::new(&config_with_tool("true", false));
        let outcome = worker.process(job).await;

        match outcome {
            JobOutcome::Failed(_, PipelineError::Decode { .. }) => {}
            other => panic!("expected decode failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_temp_file_never_clobbers_sibling_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let worker = DiffWorker::new(&config_with_tool("true", false));

        // A finished composite whose filename is itself tmp-flavored
        let sibling = DiffJob {
            input_a: dir.path().join("a.tmp.png"),
            input_b: dir.path().join("b.tmp.png"),
            output: out.join("a.tmp.png"),
        };
        write_png(&sibling.input_a, 10, 10, [255, 0, 0, 255]);
        write_png(&sibling.input_b, 10, 10, [0, 255, 0, 255]);
        assert!(worker.process(sibling.clone()).await.is_completed());

        // Mixed heights force the neighbouring job to write a temp file
        let job = DiffJob {
            input_a: dir.path().join("a.png"),
            input_b: dir.path().join("b.png"),
            output: out.join("a.png"),
        };
        write_png(&job.input_a, 10, 20, [255, 0, 0, 255]);
        write_png(&job.input_b, 10, 10, [0, 255, 0, 255]);
        assert!(worker.process(job).await.is_completed());

        // The sibling's composite survives untouched
        let kept = codec::decode(&sibling.output).await.unwrap();
        assert_eq!(kept.dimensions(), (30, 10));
    }

    #[tokio::test]
    async fn test_mixed_heights_composite_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path());
        write_png(&job.input_a, 10, 20, [255, 0, 0, 255]);
        write_png(&job.input_b, 10, 10, [0, 255, 0, 255]);

        let worker = DiffWorker::new(&config_with_tool("true", false));
        let outcome = worker.process(job.clone()).await;

        assert!(outcome.is_completed());
        let composite = codec::decode(&job.output).await.unwrap();
        assert_eq!(composite.dimensions(), (30, 20));
        assert!(!temp_path(&job.output).exists());
    }
}
