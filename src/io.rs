//! Image decode/encode helpers.
//!
//! - `load_rgb`: read a PNG/JPEG/etc. into an owned (height, width, 3) u8 array.
//! - `output_format`: map a file extension to a writable format.
//! - `save_rgb`: encode an RGB array, stage it, then move it into place.
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use image::{ColorType, ImageError, ImageFormat, ImageReader};
use log::debug;
use ndarray::{Array3, ArrayView3};

use crate::error::{EdgeError, Result};

/// Load an image from disk and convert it to packed RGB8.
///
/// The format is sniffed from the file contents, falling back to the
/// extension. Alpha is dropped.
pub fn load_rgb(path: &Path) -> Result<Array3<u8>> {
    let decode_err = |source: ImageError| EdgeError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_err(ImageError::IoError(e)))?;
    let rgb = reader.decode().map_err(decode_err)?.into_rgb8();

    let (width, height) = rgb.dimensions();
    debug!("decoded {} ({}x{})", path.display(), width, height);
    rgb_from_raw(width as usize, height as usize, rgb.into_raw(), path)
}

/// Shape a packed RGB8 buffer into a (height, width, 3) array.
pub fn rgb_from_raw(width: usize, height: usize, raw: Vec<u8>, path: &Path) -> Result<Array3<u8>> {
    Array3::from_shape_vec((height, width, 3), raw).map_err(|source| EdgeError::Layout {
        path: path.to_path_buf(),
        source,
    })
}

/// Writable format for a file extension such as `png` or `JPG`.
pub fn output_format(extension: &str) -> Result<ImageFormat> {
    ImageFormat::from_extension(extension)
        .filter(|format| format.writing_enabled())
        .ok_or_else(|| EdgeError::UnsupportedFormat {
            extension: extension.to_string(),
        })
}

/// Encode an RGB image in memory with an explicit format.
///
/// The buffer handed to the encoder is row-major, 3 bytes per pixel, no
/// padding.
pub fn encode_rgb(image: ArrayView3<u8>, format: ImageFormat, path: &Path) -> Result<Vec<u8>> {
    let (height, width, channels) = image.dim();
    assert_eq!(channels, 3, "encoder expects 3 channels, got {}", channels);

    let packed: Vec<u8> = image.iter().copied().collect();
    let mut encoded = Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut encoded,
        &packed,
        width as u32,
        height as u32,
        ColorType::Rgb8,
        format,
    )
    .map_err(|source| EdgeError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(encoded.into_inner())
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> EdgeError {
    let path = path.to_path_buf();
    move |source| EdgeError::Io { path, source }
}

/// Encode `image` to `path`, staging the bytes under `staging_dir` first.
///
/// The destination only appears once the encoded file is complete. If the
/// final move has to fall back to a copy and the copy fails, the partial
/// destination is removed.
pub fn save_rgb(image: ArrayView3<u8>, path: &Path, staging_dir: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let format = output_format(extension)?;
    let encoded = encode_rgb(image, format, path)?;

    let file_name = path.file_name().ok_or_else(|| EdgeError::InvalidPath {
        path: path.to_path_buf(),
    })?;
    fs::create_dir_all(staging_dir).map_err(io_err(staging_dir))?;
    let staged = staging_dir.join(file_name);
    fs::write(&staged, &encoded).map_err(io_err(&staged))?;

    if let Err(e) = fs::rename(&staged, path) {
        debug!(
            "rename {} -> {} failed ({}), copying instead",
            staged.display(),
            path.display(),
            e
        );
        if let Err(source) = fs::copy(&staged, path) {
            let _ = fs::remove_file(path);
            return Err(EdgeError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    debug!("wrote {} ({} bytes, {:?})", path.display(), encoded.len(), format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn gradient_image() -> Array3<u8> {
        let mut img = Array3::<u8>::zeros((4, 6, 3));
        for y in 0..4 {
            for x in 0..6 {
                img[[y, x, 0]] = (x * 40) as u8;
                img[[y, x, 1]] = (y * 60) as u8;
                img[[y, x, 2]] = 7;
            }
        }
        img
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(output_format("png").unwrap(), ImageFormat::Png);
        assert_eq!(output_format("JPG").unwrap(), ImageFormat::Jpeg);
        assert!(matches!(
            output_format("txt"),
            Err(EdgeError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_png_save_then_load_is_lossless() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        let img = gradient_image();

        save_rgb(img.view(), &path, &dir.path().join("stage")).unwrap();
        let loaded = load_rgb(&path).unwrap();

        assert_eq!(loaded, img);
    }

    #[test]
    fn test_save_moves_staged_file() {
        let dir = tempdir().unwrap();
        let stage = dir.path().join("stage");
        let path = dir.path().join("out.png");

        save_rgb(gradient_image().view(), &path, &stage).unwrap();

        assert!(path.exists());
        assert!(!stage.join("out.png").exists());
    }

    #[test]
    fn test_unsupported_extension_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let err = save_rgb(gradient_image().view(), &path, &dir.path().join("stage")).unwrap_err();

        assert!(matches!(err, EdgeError::UnsupportedFormat { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_rgb_from_raw_shapes_buffer() {
        let raw: Vec<u8> = (0..12).collect();
        let img = rgb_from_raw(2, 2, raw, Path::new("mem.png")).unwrap();

        assert_eq!(img.dim(), (2, 2, 3));
        assert_eq!(img[[1, 0, 2]], 8);
    }

    #[test]
    fn test_rgb_from_raw_rejects_short_buffer() {
        let err = rgb_from_raw(3, 2, vec![0; 17], Path::new("short.png")).unwrap_err();
        assert!(matches!(err, EdgeError::Layout { .. }));
    }

    #[test_log::test]
    fn test_save_replaces_existing_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");
        fs::write(&path, b"old contents").unwrap();

        save_rgb(gradient_image().view(), &path, &dir.path().join("stage")).unwrap();

        assert_eq!(load_rgb(&path).unwrap(), gradient_image());
    }

    #[test_log::test]
    fn test_failed_move_reports_destination_and_leaves_nothing() {
        let dir = tempdir().unwrap();
        // Destination folder does not exist, so both rename and copy fail
        let path = dir.path().join("missing-folder").join("out.png");

        let err = save_rgb(gradient_image().view(), &path, &dir.path().join("stage")).unwrap_err();

        match err {
            EdgeError::Io { path: at, .. } => assert_eq!(at, path),
            other => panic!("expected an I/O error, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file_is_decode_error() {
        let dir = tempdir().unwrap();
        let err = load_rgb(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, EdgeError::Decode { .. }));
    }

    #[test]
    fn test_load_garbage_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = load_rgb(&path).unwrap_err();
        assert!(matches!(err, EdgeError::Decode { .. }));
    }
}
