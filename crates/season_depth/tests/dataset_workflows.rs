//! End-to-end checks against a synthetic SeasonDepth tree on disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, Luma, Rgb, RgbImage};
use season_depth::{
    audit, read_split_file, SampleRef, SeasonDepthConfig, SeasonDepthDataset, SeasonDepthError,
    Side, ValColorLayout,
};

const TRAIN_KEY: &str = "slice/loc1/sceneA/sub1/images/0005.jpg";
const VAL_KEY: &str = "slice/images/sceneB/sub2/0009.png";

fn write_depth(path: &Path, width: u32, height: u32) -> anyhow::Result<()> {
    fs::create_dir_all(path.parent().expect("depth path has a parent"))?;
    // Values above 255 make sure nothing squeezes the map into 8 bits.
    let img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_fn(width, height, |x, y| Luma([1000 + (y * width + x) as u16 * 7]));
    img.save(path)?;
    Ok(())
}

fn write_color(path: &Path, width: u32, height: u32) -> anyhow::Result<()> {
    fs::create_dir_all(path.parent().expect("color path has a parent"))?;
    let img = RgbImage::from_fn(width, height, |x, _| Rgb([(x * 40) as u8, 100, 200]));
    img.save(path)?;
    Ok(())
}

fn train_fixture(root: &Path) -> anyhow::Result<(PathBuf, PathBuf)> {
    let color = root.join("train/loc1/sceneA/sub1/images/0005.jpg");
    let depth = root.join("train/loc1/sceneA/sub1/depth_map/0005.png");
    write_color(&color, 4, 3)?;
    write_depth(&depth, 5, 3)?;
    Ok((color, depth))
}

#[test]
fn train_sample_loads_at_full_resolution() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    train_fixture(tmp.path())?;
    let cfg = SeasonDepthConfig::with_root(tmp.path());
    let ds = SeasonDepthDataset::new(&cfg, vec![SampleRef::new(TRAIN_KEY)]);

    assert!(ds.check_depth()?);
    assert!(!ds.is_inference_only()?);

    let depth = ds.get_depth(TRAIN_KEY, Some(Side::Left), false)?;
    assert_eq!(depth.shape(), (768, 1024));
    // Corners map back to corners of the 5x3 source.
    assert_eq!(depth.get(0, 0), 1000.0);
    assert_eq!(depth.get(1023, 767), (1000 + 14 * 7) as f32);

    let color = ds.get_color(TRAIN_KEY, Some(Side::Left), false)?;
    assert_eq!((color.width(), color.height()), (4, 3));
    Ok(())
}

#[test]
fn flipped_depth_is_column_reversed() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    train_fixture(tmp.path())?;
    let ds = SeasonDepthDataset::new(&SeasonDepthConfig::with_root(tmp.path()), Vec::new());

    let plain = ds.get_depth(TRAIN_KEY, None, false)?;
    let flipped = ds.get_depth(TRAIN_KEY, None, true)?;
    assert_eq!(flipped.shape(), plain.shape());
    for y in 0..plain.height {
        let mut expected = plain.row(y).to_vec();
        expected.reverse();
        assert_eq!(flipped.row(y), expected.as_slice());
    }
    Ok(())
}

#[test]
fn flipped_color_is_mirrored() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    train_fixture(tmp.path())?;
    let ds = SeasonDepthDataset::new(&SeasonDepthConfig::with_root(tmp.path()), Vec::new());

    let plain = ds.get_color(TRAIN_KEY, None, false)?.to_rgb8();
    let flipped = ds.get_color(TRAIN_KEY, None, true)?.to_rgb8();
    let w = plain.width();
    for y in 0..plain.height() {
        for x in 0..w {
            assert_eq!(plain.get_pixel(x, y), flipped.get_pixel(w - 1 - x, y));
        }
    }
    Ok(())
}

#[test]
fn ground_truth_follows_the_depth_file() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let cfg = SeasonDepthConfig::with_root(tmp.path());
    let ds = SeasonDepthDataset::new(&cfg, vec![SampleRef::new(VAL_KEY)]);
    assert!(!ds.layout().has_ground_truth(VAL_KEY)?);
    assert!(ds.is_inference_only()?);

    write_depth(&tmp.path().join("val/depth/sceneB/sub2/0009.png"), 2, 2)?;
    assert!(ds.layout().has_ground_truth(VAL_KEY)?);
    assert!(ds.check_depth()?);
    Ok(())
}

#[test]
fn missing_depth_is_file_not_found() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let ds = SeasonDepthDataset::new(&SeasonDepthConfig::with_root(tmp.path()), Vec::new());
    let err = ds.get_depth(VAL_KEY, None, false).unwrap_err();
    match err {
        SeasonDepthError::FileNotFound { path } => {
            assert!(path.ends_with("val/depth/sceneB/sub2/0009.png"))
        }
        other => panic!("expected FileNotFound, got {other}"),
    }
    Ok(())
}

#[test]
fn corrupt_depth_is_a_decode_error() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let depth = tmp.path().join("val/depth/sceneB/sub2/0009.png");
    fs::create_dir_all(depth.parent().expect("parent"))?;
    fs::write(&depth, b"not a png")?;
    let ds = SeasonDepthDataset::new(&SeasonDepthConfig::with_root(tmp.path()), Vec::new());
    let err = ds.get_depth(VAL_KEY, None, false).unwrap_err();
    assert!(matches!(err, SeasonDepthError::Decode { .. }), "got {err}");
    Ok(())
}

#[test]
fn rgb_depth_is_rejected() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    write_color(&tmp.path().join("val/depth/sceneB/sub2/0009.png"), 2, 2)?;
    let ds = SeasonDepthDataset::new(&SeasonDepthConfig::with_root(tmp.path()), Vec::new());
    let err = ds.get_depth(VAL_KEY, None, false).unwrap_err();
    assert!(matches!(err, SeasonDepthError::UnsupportedDepthFormat { .. }), "got {err}");
    Ok(())
}

#[test]
fn invalid_first_key_fails_the_ground_truth_check() {
    let cfg = SeasonDepthConfig::with_root("/nonexistent");
    let ds = SeasonDepthDataset::new(&cfg, vec![SampleRef::new("a/b/c")]);
    assert!(matches!(
        ds.check_depth(),
        Err(SeasonDepthError::InvalidSampleKey { .. })
    ));
}

#[test]
fn val_color_layout_controls_filename() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let color = tmp.path().join("val/images/sceneB/sub2/0009.png");
    write_color(&color, 3, 2)?;

    let legacy = SeasonDepthDataset::new(&SeasonDepthConfig::with_root(tmp.path()), Vec::new());
    // The legacy path names the directory, which is not an image.
    assert!(matches!(
        legacy.get_color(VAL_KEY, None, false),
        Err(SeasonDepthError::FileNotFound { .. })
    ));

    let cfg = SeasonDepthConfig {
        val_color_layout: ValColorLayout::WithFilename,
        ..SeasonDepthConfig::with_root(tmp.path())
    };
    let fixed = SeasonDepthDataset::new(&cfg, Vec::new());
    assert_eq!(fixed.get_color(VAL_KEY, None, false)?.width(), 3);
    Ok(())
}

#[test]
fn injected_loader_receives_resolved_path() -> anyhow::Result<()> {
    let cfg = SeasonDepthConfig::with_root("/sd");
    let loader = |path: &Path| -> season_depth::DatasetResult<DynamicImage> {
        assert_eq!(path, Path::new("/sd/train/loc1/sceneA/sub1/images/0005.jpg"));
        Ok(DynamicImage::ImageRgb8(RgbImage::new(2, 1)))
    };
    let ds = SeasonDepthDataset::with_loader(&cfg, Vec::new(), loader);
    let img = ds.get_color(TRAIN_KEY, Some(Side::Two), false)?;
    assert_eq!((img.width(), img.height()), (2, 1));
    Ok(())
}

#[test]
fn split_file_drives_load_sample_and_audit() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    train_fixture(tmp.path())?;
    let split = tmp.path().join("train_files.txt");
    fs::write(
        &split,
        format!("{TRAIN_KEY} 0 l\nslice/loc2/s/ss/images/0001.jpg\nnot/a/key\n"),
    )?;
    let filenames = read_split_file(&split)?;
    assert_eq!(filenames.len(), 3);

    let ds = SeasonDepthDataset::new(&SeasonDepthConfig::with_root(tmp.path()), filenames);
    let (color, depth) = ds.load_sample(0, true)?;
    assert_eq!(color.width(), 4);
    assert_eq!(depth.map(|d| d.shape()), Some((768, 1024)));
    assert!(matches!(
        ds.load_sample(3, false),
        Err(SeasonDepthError::IndexOutOfRange { index: 3, len: 3 })
    ));

    let summary = audit(&ds);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.train, 2);
    assert_eq!(summary.invalid, 1);
    assert_eq!(summary.missing_color, 1);
    assert_eq!(summary.missing_depth, 1);
    Ok(())
}

#[test]
fn dataset_is_shareable_across_threads() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    train_fixture(tmp.path())?;
    let ds = SeasonDepthDataset::new(&SeasonDepthConfig::with_root(tmp.path()), Vec::new());
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let ds = &ds;
                s.spawn(move || ds.get_depth(TRAIN_KEY, None, i % 2 == 0).map(|d| d.shape()))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().expect("worker panicked").expect("depth loads"), (768, 1024));
        }
    });
    Ok(())
}

#[test]
fn ground_truth_split_with_a_hole_reports_missing_depth() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    train_fixture(tmp.path())?;
    let hole = "slice/loc1/sceneA/sub1/images/0006.jpg";
    write_color(&tmp.path().join("train/loc1/sceneA/sub1/images/0006.jpg"), 4, 3)?;

    let ds = SeasonDepthDataset::new(
        &SeasonDepthConfig::with_root(tmp.path()),
        vec![SampleRef::new(TRAIN_KEY), SampleRef::new(hole)],
    );
    assert!(ds.load_depth());
    assert!(ds.load_sample(0, false)?.1.is_some());
    match ds.load_sample(1, false) {
        Err(SeasonDepthError::FileNotFound { path }) => {
            assert!(path.ends_with("train/loc1/sceneA/sub1/depth_map/0006.png"))
        }
        other => panic!("expected FileNotFound, got {:?}", other.map(|(_, d)| d.is_some())),
    }
    Ok(())
}

#[test]
fn inference_split_skips_depth() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    write_color(&tmp.path().join("val/images/sceneB/sub2/0009.png"), 3, 2)?;
    let cfg = SeasonDepthConfig {
        val_color_layout: ValColorLayout::WithFilename,
        ..SeasonDepthConfig::with_root(tmp.path())
    };
    let ds = SeasonDepthDataset::new(&cfg, vec![SampleRef::new(VAL_KEY)]);
    assert!(!ds.load_depth());
    let (color, depth) = ds.load_sample(0, true)?;
    assert_eq!(color.width(), 3);
    assert!(depth.is_none());
    Ok(())
}

#[test]
fn eight_bit_depth_keeps_raw_values() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("val/depth/sceneB/sub2/0009.png");
    fs::create_dir_all(path.parent().expect("parent"))?;
    let img: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_fn(8, 6, |x, y| Luma([(y * 8 + x) as u8 * 5]));
    img.save(&path)?;

    let ds = SeasonDepthDataset::new(&SeasonDepthConfig::with_root(tmp.path()), Vec::new());
    let depth = ds.get_depth(VAL_KEY, None, false)?;
    assert_eq!(depth.shape(), (768, 1024));
    // Each source column covers 128 output columns and each source row 128 output rows.
    assert_eq!(depth.get(0, 0), 0.0);
    assert_eq!(depth.get(127, 0), 0.0);
    assert_eq!(depth.get(128, 0), 5.0);
    assert_eq!(depth.get(1023, 767), 235.0);
    assert!(depth.data.iter().all(|&v| v <= 235.0 && v % 5.0 == 0.0));
    Ok(())
}
