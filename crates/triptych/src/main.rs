//! Triptych CLI - side-by-side visual diffs for screenshot directories.
//!
//! Compares two directories of PNG screenshots pairwise by filename and
//! writes one composite per pair into the output directory: the first
//! original, the highlighted diff, and the second original, left to
//! right.
//!
//! # Usage
//!
//! ```bash
//! # Compare two rendered screenshot sets
//! triptych ./baseline ./candidate ./diffs
//!
//! # Pin the worker count and the comparison tool
//! triptych ./baseline ./candidate ./diffs -t 4 --compare magick-compare
//! ```

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use triptych_core::{Config, DiffPipeline, JobOutcome};

mod logging;

/// Compare two directories of screenshots and render side-by-side visual diffs.
#[derive(Parser, Debug)]
#[command(name = "triptych")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// First input directory (drives job discovery)
    dir_a: PathBuf,

    /// Second input directory (matched by filename)
    dir_b: PathBuf,

    /// Output directory for composite images (created if absent)
    out_dir: PathBuf,

    /// Number of parallel diff workers (default: host CPU count)
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Path or name of the external comparison executable
    #[arg(long)]
    compare: Option<PathBuf>,

    /// Highlight color passed to the comparison tool
    #[arg(long)]
    highlight_color: Option<String>,

    /// Fail jobs when the comparison tool fails instead of compositing
    /// a blank diff panel
    #[arg(long)]
    strict: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    /// Fold the CLI flags over the file-based configuration.
    fn apply_to(&self, config: &mut Config) {
        if let Some(threads) = self.threads {
            config.pipeline.workers = threads;
        }
        if let Some(compare) = &self.compare {
            config.compare.program = compare.clone();
        }
        if let Some(color) = &self.highlight_color {
            config.compare.highlight_color = color.clone();
        }
        if self.strict {
            config.pipeline.strict = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {e}\n  Using default configuration.");
            Config::default()
        }
    };
    cli.apply_to(&mut config);
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("triptych v{}", triptych_core::VERSION);

    std::fs::create_dir_all(&cli.out_dir)?;

    let pipeline = DiffPipeline::new(config);
    let mut run = pipeline.spawn(&cli.dir_a, &cli.dir_b, &cli.out_dir)?;

    println!("Comparing images:");
    let start = Instant::now();
    let mut succeeded: u64 = 0;
    let mut failed: u64 = 0;

    while let Some(outcome) = run.recv().await {
        match outcome {
            JobOutcome::Completed(job) => {
                succeeded += 1;
                println!("\t{}", job.output.display());
            }
            JobOutcome::Failed(job, e) => {
                failed += 1;
                tracing::error!("Failed: {:?} - {}", job.output, e);
            }
        }
    }

    print_summary(succeeded, failed, run.skipped(), start.elapsed());
    Ok(())
}

/// Print a formatted summary block after the run.
fn print_summary(succeeded: u64, failed: u64, skipped: u64, elapsed: std::time::Duration) {
    let total = succeeded + failed;
    let rate = if elapsed.as_secs_f64() > 0.0 {
        total as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Compared:     {:>8}", succeeded);
    eprintln!("    Failed:       {:>8}", failed);
    eprintln!("    Skipped:      {:>8}", skipped);
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} pairs/sec", rate);
    eprintln!("  ====================================");
}
