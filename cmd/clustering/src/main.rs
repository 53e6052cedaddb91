//! assign - Label trajectory frames with their nearest cluster center.

use anyhow::{Context, Result};
use chainsaw_clustering::{AssignConfig, Assigner, Matrix, Metric};
use clap::Parser;
use tracing::debug;

mod output;
mod request;

use output::{Output, OutputFormat};

/// Assigns every frame in a request to the index of its nearest center.
///
/// The request is a JSON or YAML document:
///   {"frames": [[...], ...], "centers": [[...], ...], "metric": "euclidean", "n_threads": 0}
///
/// `metric` and `n_threads` are optional and can be overridden here.
#[derive(Parser, Debug)]
#[command(name = "assign")]
#[command(about = "Assign frames to their nearest cluster centers")]
#[command(version)]
struct Cli {
    /// Input request file (YAML or JSON); "-" reads stdin
    #[arg(short = 'f', long = "file", default_value = "-")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Distance metric: euclidean or minRMSD
    #[arg(short = 'm', long)]
    metric: Option<String>,

    /// Worker threads (0 or less: CHAINSAW_NUM_THREADS or all cores)
    #[arg(short = 'j', long, allow_negative_numbers = true)]
    threads: Option<i32>,

    /// Output labels as a JSON array
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let req = request::load_request(&cli.input)
        .with_context(|| format!("failed to load request from {}", cli.input))?;

    let metric = match &cli.metric {
        Some(name) => name.parse::<Metric>()?,
        None => req.metric.unwrap_or_default(),
    };
    let n_threads = cli.threads.or(req.n_threads).unwrap_or(0);

    let flat = req.flatten().context("invalid request")?;
    let frames = Matrix::from_flat(&flat.frames, flat.dim)?;
    let centers = Matrix::from_flat(&flat.centers, flat.dim)?;

    let assigner = Assigner::new(AssignConfig::new(metric, n_threads));
    debug!(
        metric = %assigner.metric(),
        threads = assigner.n_threads(),
        input = %cli.input,
        "loaded request"
    );

    let labels = assigner
        .assign_to_vec(&frames, &centers)
        .context("assignment failed")?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Lines
    };
    Output::new(format, cli.output.clone()).write(&labels)
}
