use std::path::PathBuf;

use clap::Parser;
use sobel_edges::workspace::DEFAULT_SCRATCH_DIR;
use sobel_edges::{BoundaryMode, ImageJob, PipelineConfig};

/// Sobel edge detection CLI
#[derive(Parser, Debug)]
#[command(author, version, about = "Writes a Sobel edge map next to each input image as <name>_output.<ext>", long_about = None)]
pub struct Args {
    /// Input images. Defaults to the demo set under ./assets
    #[arg(value_name = "IMAGE", help = "Input image paths (default: ./assets demo images)")]
    pub images: Vec<PathBuf>,

    /// Scratch directory, emptied after every image
    #[arg(short = 't', long, value_name = "DIR", default_value = DEFAULT_SCRATCH_DIR, help = "Scratch directory used while encoding")]
    pub scratch_dir: PathBuf,

    /// Gy boundary handling
    #[arg(short = 'b', long, default_value_t = BoundaryMode::Wrap, help = "Gy boundary handling: wrap or interior")]
    pub boundary: BoundaryMode,
}

impl Args {
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            scratch_dir: self.scratch_dir.clone(),
            boundary: self.boundary,
        }
    }

    pub fn jobs(&self) -> sobel_edges::Result<Vec<ImageJob>> {
        if self.images.is_empty() {
            return Ok(demo_jobs());
        }
        self.images
            .iter()
            .map(|path| ImageJob::from_path(path))
            .collect()
    }
}

fn demo_jobs() -> Vec<ImageJob> {
    vec![
        ImageJob::new("./assets/", "coins", "png"),
        ImageJob::new("./assets/", "dog", "png"),
        ImageJob::new("./assets/", "lena", "jpg"),
        ImageJob::new("./assets/", "ufrn", "png"),
    ]
}
