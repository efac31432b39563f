use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ndarray::Array3;
use sobel_edges::io::{load_rgb, save_rgb};
use sobel_edges::workspace::{Scratch, ScratchDir};
use sobel_edges::{BoundaryMode, EdgeError, EdgePipeline, ImageJob, PipelineConfig};
use tempfile::{tempdir, TempDir};

/// Scratch area whose cleanup always fails, like a permission error would.
struct LockedScratch {
    path: PathBuf,
}

impl Scratch for LockedScratch {
    fn path(&self) -> &Path {
        &self.path
    }

    fn clear(&self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "scratch is locked"))
    }
}

fn write_png(dir: &Path, name: &str, pixels: &Array3<u8>) -> ImageJob {
    let path = dir.join(format!("{}.png", name));
    save_rgb(pixels.view(), &path, &dir.join("fixture-stage")).unwrap();
    ImageJob::new(dir, name, "png")
}

fn pipeline_in(root: &TempDir, boundary: BoundaryMode) -> EdgePipeline {
    EdgePipeline::new(PipelineConfig {
        scratch_dir: root.path().join("tmp"),
        boundary,
    })
}

/// Black left half, white right half.
fn split_image(height: usize, width: usize) -> Array3<u8> {
    let mut img = Array3::<u8>::zeros((height, width, 3));
    for y in 0..height {
        for x in width / 2..width {
            for c in 0..3 {
                img[[y, x, c]] = 255;
            }
        }
    }
    img
}

#[test_log::test]
fn uniform_gray_round_trips_to_black() {
    let root = tempdir().unwrap();
    let job = write_png(root.path(), "gray", &Array3::from_elem((4, 4, 3), 128));

    let report = pipeline_in(&root, BoundaryMode::Wrap).process(&job).unwrap();

    assert_eq!(report.output, root.path().join("gray_output.png"));
    assert_eq!((report.width, report.height), (4, 4));
    assert!(report.scratch_cleared);

    let output = load_rgb(&report.output).unwrap();
    assert_eq!(output.dim(), (4, 4, 3));
    assert!(output.iter().all(|&v| v == 0));
}

#[test_log::test]
fn vertical_edge_is_written_as_white_columns() {
    let root = tempdir().unwrap();
    let job = write_png(root.path(), "split", &split_image(6, 6));

    let report = pipeline_in(&root, BoundaryMode::Interior).process(&job).unwrap();
    let output = load_rgb(&report.output).unwrap();

    // The black/white boundary sits between columns 2 and 3
    for y in 1..5 {
        assert_eq!(output[[y, 1, 0]], 0, "row {}", y);
        assert_eq!(output[[y, 2, 0]], 255, "row {}", y);
        assert_eq!(output[[y, 3, 0]], 255, "row {}", y);
        assert_eq!(output[[y, 4, 0]], 0, "row {}", y);
        assert_eq!(output[[y, 2, 0]], output[[y, 2, 2]]);
    }
    assert!(output.iter().take(6 * 3).all(|&v| v == 0), "top row stays black");
}

#[test_log::test]
fn scratch_directory_is_emptied_after_each_image() {
    let root = tempdir().unwrap();
    let job = write_png(root.path(), "gray", &Array3::from_elem((3, 3, 3), 10));
    let scratch = root.path().join("tmp");
    fs::create_dir_all(scratch.join("leftover").join("deeper")).unwrap();
    fs::write(scratch.join("leftover").join("deeper").join("junk.bin"), b"junk").unwrap();
    fs::write(scratch.join("stale.png"), b"stale").unwrap();

    pipeline_in(&root, BoundaryMode::Wrap).process(&job).unwrap();

    assert!(scratch.is_dir());
    assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);
}

#[test_log::test]
fn cleanup_failure_does_not_fail_the_image() {
    let root = tempdir().unwrap();
    let job = write_png(root.path(), "split", &split_image(5, 5));
    let pipeline = EdgePipeline::with_scratch(
        LockedScratch {
            path: root.path().join("locked"),
        },
        BoundaryMode::Wrap,
    );

    let report = pipeline.process(&job).unwrap();

    assert!(!report.scratch_cleared);
    assert!(report.output.exists());
}

#[test_log::test]
fn missing_input_is_a_decode_error_and_writes_nothing() {
    let root = tempdir().unwrap();
    let job = ImageJob::new(root.path(), "absent", "png");

    let err = pipeline_in(&root, BoundaryMode::Wrap).process(&job).unwrap_err();

    assert!(matches!(err, EdgeError::Decode { .. }));
    assert!(!job.output_path().exists());
}

#[test_log::test]
fn run_continues_past_failures() {
    let root = tempdir().unwrap();
    let good = write_png(root.path(), "good", &split_image(4, 4));
    let missing = ImageJob::new(root.path(), "missing", "png");
    let also_good = write_png(root.path(), "also_good", &Array3::zeros((3, 5, 3)));

    let summary = pipeline_in(&root, BoundaryMode::Wrap).run(&[good, missing.clone(), also_good]);

    assert!(!summary.is_success());
    assert_eq!(summary.succeeded.len(), 2);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, missing);
    assert!(root.path().join("good_output.png").exists());
    assert!(root.path().join("also_good_output.png").exists());
}

#[test_log::test]
fn jpeg_input_produces_jpeg_output() {
    let root = tempdir().unwrap();
    let path = root.path().join("photo.jpg");
    save_rgb(split_image(8, 8).view(), &path, &root.path().join("fixture-stage")).unwrap();
    let job = ImageJob::from_path(&path).unwrap();

    let report = pipeline_in(&root, BoundaryMode::Wrap).process(&job).unwrap();

    assert_eq!(report.output, root.path().join("photo_output.jpg"));
    assert_eq!(load_rgb(&report.output).unwrap().dim(), (8, 8, 3));
}

#[test]
fn default_scratch_dir_is_tmp() {
    let pipeline = EdgePipeline::new(PipelineConfig::default());
    assert_eq!(pipeline.scratch(), &ScratchDir::new("./tmp"));
}
