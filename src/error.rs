//! Error type for loading, encoding and writing edge images.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EdgeError>;

#[derive(Debug, Error)]
pub enum EdgeError {
    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("decoded buffer of {} does not match its dimensions", path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: ndarray::ShapeError,
    },

    #[error("unsupported output format '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot derive an image name from {}", path.display())]
    InvalidPath { path: PathBuf },
}
