// src/main.rs

mod args;

use anyhow::{bail, Context, Result};
use args::Args;
use clap::Parser;
use env_logger::{Env, Target};
use log::{error, info};
use sobel_edges::EdgePipeline;

fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to stdout, including scratch cleanup failures
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let jobs = args.jobs().context("invalid input image path")?;
    let pipeline = EdgePipeline::new(args.config());
    info!(
        "processing {} image(s), boundary: {}, scratch: {}",
        jobs.len(),
        args.boundary,
        args.scratch_dir.display()
    );

    let summary = pipeline.run(&jobs);
    let written = summary.succeeded.len();
    let failed = summary.failed.len();
    for (job, err) in summary.failed {
        error!("{}: {:#}", job.input_path().display(), anyhow::Error::from(err));
    }

    if failed > 0 {
        bail!("{} of {} image(s) failed", failed, jobs.len());
    }
    info!("done, {} image(s) written", written);
    Ok(())
}
