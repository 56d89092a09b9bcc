//! Pipeline assembly: source, filter, fan-out to workers, fan-in.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::config::Config;
use crate::error::PipelineError;

use super::channel::{bounded_channel, PipelineStage};
use super::filter;
use super::job::{JobOutcome, JobSource};
use super::worker::DiffWorker;

/// The assembled diff pipeline.
///
/// Topology: one producer task listing the source directory, one filter
/// stage, N diff workers pulling from a shared stream (whichever idle
/// worker is ready takes the next job), and a merged outcome stream.
/// Closing channels is the only completion signal — the outcome stream
/// ends exactly when every worker has drained and exited.
pub struct DiffPipeline {
    config: Config,
}

/// A running pipeline: the outcome stream plus run-level counters.
#[derive(Debug)]
pub struct PipelineRun {
    outcomes: mpsc::Receiver<JobOutcome>,
    skipped: Arc<AtomicU64>,
}

impl PipelineRun {
    /// Receive the next job outcome, in completion order.
    ///
    /// Returns `None` once every worker has drained and exited.
    pub async fn recv(&mut self) -> Option<JobOutcome> {
        self.outcomes.recv().await
    }

    /// Number of pairs the filter dropped for a missing input.
    ///
    /// Final once `recv` has returned `None`.
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}

impl DiffPipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The number of diff workers this pipeline will run.
    pub fn workers(&self) -> usize {
        self.config.pipeline.effective_workers()
    }

    /// Start the pipeline and return the stream of job outcomes.
    ///
    /// Fails fast if the first directory cannot be listed; from then on
    /// every error is scoped to a single job and reported through its
    /// outcome. Outcomes arrive in completion order, which in general
    /// differs from discovery order. Must be called within a tokio
    /// runtime.
    pub fn spawn(
        &self,
        dir_a: &Path,
        dir_b: &Path,
        out_dir: &Path,
    ) -> Result<PipelineRun, PipelineError> {
        let jobs = JobSource::new(dir_a, dir_b, out_dir).open()?;
        let workers = self.workers();
        tracing::info!(
            dir_a = %dir_a.display(),
            dir_b = %dir_b.display(),
            out_dir = %out_dir.display(),
            workers,
            "Starting diff pipeline"
        );

        // Source: lazily walk the directory listing into the job stream.
        let (job_tx, job_rx) = bounded_channel(&self.config.pipeline);
        tokio::spawn(async move {
            for job in jobs {
                if job_tx.send(job).await.is_err() {
                    break;
                }
            }
        });

        // Filter: drop pairs with a missing side, counting the drops
        // for the end-of-run summary.
        let skipped = Arc::new(AtomicU64::new(0));
        let (filtered_tx, filtered_rx) = bounded_channel(&self.config.pipeline);
        let stage = PipelineStage::new(job_rx, filtered_tx);
        let skip_counter = Arc::clone(&skipped);
        tokio::spawn(async move {
            stage
                .run(move |job| {
                    let skip_counter = Arc::clone(&skip_counter);
                    async move {
                        let result = filter::existing_pair(job);
                        if result.is_none() {
                            skip_counter.fetch_add(1, Ordering::Relaxed);
                        }
                        result
                    }
                })
                .await;
        });

        // Fan-out: N workers share one receiver. Each clones the outcome
        // sender; when the last worker exits, the last sender drops and
        // the outcome stream closes.
        let shared_rx = Arc::new(Mutex::new(filtered_rx));
        let (outcome_tx, outcome_rx) = bounded_channel(&self.config.pipeline);
        for _ in 0..workers {
            let shared_rx = Arc::clone(&shared_rx);
            let outcome_tx = outcome_tx.clone();
            let worker = DiffWorker::new(&self.config);
            tokio::spawn(async move {
                loop {
                    // Hold the lock only while receiving, so other
                    // workers can steal jobs while this one processes.
                    let job = shared_rx.lock().await.recv().await;
                    let Some(job) = job else { break };
                    let outcome = worker.process(job).await;
                    if outcome_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
            });
        }

        Ok(PipelineRun {
            outcomes: outcome_rx,
            skipped,
        })
    }
}
