//! Scratch directory used while encoding.
//!
//! Output files are staged here before they are moved into place, and the
//! directory is emptied after every image. Emptying is best effort: a
//! failure is logged and never fails the image.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Default scratch location, relative to the working directory.
pub const DEFAULT_SCRATCH_DIR: &str = "./tmp";

/// A transient working area that can be emptied.
pub trait Scratch {
    /// Directory staged files are written to.
    fn path(&self) -> &Path;

    /// Remove every file and subdirectory inside the scratch area.
    fn clear(&self) -> io::Result<()>;

    /// Clear, logging instead of returning any failure.
    ///
    /// Returns whether the scratch area was emptied.
    fn clear_best_effort(&self) -> bool {
        match self.clear() {
            Ok(()) => {
                debug!("cleared scratch directory {}", self.path().display());
                true
            }
            Err(e) => {
                warn!(
                    "error cleaning scratch directory {}: {}",
                    self.path().display(),
                    e
                );
                false
            }
        }
    }
}

/// Scratch area backed by a directory on disk.
///
/// The directory itself survives [`Scratch::clear`]; only its contents go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ScratchDir {
    fn default() -> Self {
        Self::new(DEFAULT_SCRATCH_DIR)
    }
}

impl Scratch for ScratchDir {
    fn path(&self) -> &Path {
        &self.path
    }

    fn clear(&self) -> io::Result<()> {
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let path = entry.path();
            // Symlinks are removed, never followed
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}
