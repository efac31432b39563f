//! Per-image orchestration: decode, detect edges, encode, clean up.
//!
//! Images run strictly one after another. Within an image the two gradient
//! passes run concurrently (see [`crate::filters::edge::sobel_gradients_u8`]).

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info};
use ndarray::Array3;

use crate::error::{EdgeError, Result};
use crate::filters::edge::{sobel_edges_u8, BoundaryMode};
use crate::io::{load_rgb, save_rgb};
use crate::workspace::{Scratch, ScratchDir, DEFAULT_SCRATCH_DIR};

/// Suffix appended to the input name to form the output name.
pub const OUTPUT_SUFFIX: &str = "_output";

/// One image to process, addressed as folder + name + extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageJob {
    pub folder: PathBuf,
    pub name: String,
    pub extension: String,
}

impl ImageJob {
    pub fn new(folder: impl Into<PathBuf>, name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            name: name.into(),
            extension: extension.into(),
        }
    }

    /// Split a path such as `assets/dog.png` into a job.
    pub fn from_path(path: &Path) -> Result<Self> {
        let invalid = || EdgeError::InvalidPath {
            path: path.to_path_buf(),
        };
        let name = path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;
        let extension = path.extension().and_then(|s| s.to_str()).ok_or_else(invalid)?;
        let folder = path.parent().unwrap_or_else(|| Path::new(""));

        Ok(Self::new(folder, name, extension))
    }

    /// `folder/name.extension`
    pub fn input_path(&self) -> PathBuf {
        self.folder.join(format!("{}.{}", self.name, self.extension))
    }

    /// `folder/name_output.extension`
    pub fn output_path(&self) -> PathBuf {
        self.folder
            .join(format!("{}{}.{}", self.name, OUTPUT_SUFFIX, self.extension))
    }
}

/// Settings shared by every image of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub scratch_dir: PathBuf,
    pub boundary: BoundaryMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            boundary: BoundaryMode::default(),
        }
    }
}

/// What a successful [`EdgePipeline::process`] produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessReport {
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    /// False when the scratch cleanup failed; the output is still valid.
    pub scratch_cleared: bool,
}

/// Outcome of [`EdgePipeline::run`] over several images.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<ProcessReport>,
    pub failed: Vec<(ImageJob, EdgeError)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Detect edges in an RGB image held in memory.
///
/// Runs Gx and Gy concurrently, waits for both, then combines them.
pub fn detect_edges(pixels: &Array3<u8>, boundary: BoundaryMode) -> Array3<u8> {
    sobel_edges_u8(pixels.view(), boundary)
}

pub struct EdgePipeline<S = ScratchDir> {
    scratch: S,
    boundary: BoundaryMode,
}

impl EdgePipeline<ScratchDir> {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_scratch(ScratchDir::new(config.scratch_dir), config.boundary)
    }
}

impl<S: Scratch> EdgePipeline<S> {
    pub fn with_scratch(scratch: S, boundary: BoundaryMode) -> Self {
        Self { scratch, boundary }
    }

    pub fn scratch(&self) -> &S {
        &self.scratch
    }

    /// Process a single image and write `name_output.ext` next to it.
    ///
    /// Decode and encode failures are returned. The scratch area is cleared
    /// afterwards either way; a cleanup failure only shows up as
    /// `scratch_cleared == false`.
    pub fn process(&self, job: &ImageJob) -> Result<ProcessReport> {
        let started = Instant::now();
        let outcome = self.render(job);
        let scratch_cleared = self.scratch.clear_best_effort();

        let (output, width, height) = outcome?;
        info!(
            "{} -> {} ({}x{}, {:?})",
            job.input_path().display(),
            output.display(),
            width,
            height,
            started.elapsed()
        );

        Ok(ProcessReport {
            output,
            width,
            height,
            scratch_cleared,
        })
    }

    fn render(&self, job: &ImageJob) -> Result<(PathBuf, usize, usize)> {
        let input = job.input_path();
        let pixels = load_rgb(&input)?;
        let (height, width, _) = pixels.dim();

        let gradients_started = Instant::now();
        let edges = detect_edges(&pixels, self.boundary);
        debug!(
            "gradients for {} took {:?} (boundary: {})",
            input.display(),
            gradients_started.elapsed(),
            self.boundary
        );

        let output = job.output_path();
        save_rgb(edges.view(), &output, self.scratch.path())?;
        Ok((output, width, height))
    }

    /// Process every job in order. A failed image does not stop the run.
    pub fn run(&self, jobs: &[ImageJob]) -> RunSummary {
        let mut summary = RunSummary::default();
        for job in jobs {
            match self.process(job) {
                Ok(report) => summary.succeeded.push(report),
                Err(e) => {
                    debug!("{} failed, continuing with the next image", job.input_path().display());
                    summary.failed.push((job.clone(), e));
                }
            }
        }
        summary
    }
}
