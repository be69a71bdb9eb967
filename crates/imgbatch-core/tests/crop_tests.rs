use std::fs;
use std::path::Path;
use tempfile::tempdir;

use image::{ColorType, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use imgbatch_core::config::CropSettings;
use imgbatch_core::crop::{self, CropOptions};
use imgbatch_core::{Error, SilentReporter};

fn options_for(dir: &Path, size: u32) -> CropOptions {
    let mut options = CropOptions::from_settings(&CropSettings::default());
    options.target_dir = dir.to_path_buf();
    options.size = size;
    options
}

#[test]
fn test_crops_allowed_extensions_in_place() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    RgbImage::from_pixel(40, 20, Rgb([10, 200, 10]))
        .save_with_format(dir.join("wide.JPG"), ImageFormat::Jpeg)
        .unwrap();
    RgbImage::from_pixel(10, 30, Rgb([10, 10, 200]))
        .save(dir.join("tall.png"))
        .unwrap();
    fs::write(dir.join("notes.txt"), "leave me alone").unwrap();

    let summary = crop::run(&options_for(dir, 16), &SilentReporter).unwrap();

    assert_eq!(summary.processed, 2);
    assert!(summary.failures.is_empty());

    let wide = image::open(dir.join("wide.JPG")).unwrap();
    assert_eq!((wide.width(), wide.height()), (16, 16));
    let tall = image::open(dir.join("tall.png")).unwrap();
    assert_eq!((tall.width(), tall.height()), (16, 16));
    assert_eq!(fs::read_to_string(dir.join("notes.txt")).unwrap(), "leave me alone");
}

#[test]
fn test_default_size_is_512() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    RgbImage::from_pixel(600, 520, Rgb([1, 2, 3]))
        .save(dir.join("big.png"))
        .unwrap();

    let mut options = CropOptions::from_settings(&CropSettings::default());
    options.target_dir = dir.to_path_buf();
    crop::run(&options, &SilentReporter).unwrap();

    let big = image::open(dir.join("big.png")).unwrap();
    assert_eq!((big.width(), big.height()), (512, 512));
}

#[test]
fn test_rgba_png_loses_alpha() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    RgbaImage::from_pixel(8, 8, Rgba([50, 60, 70, 128]))
        .save(dir.join("alpha.png"))
        .unwrap();

    crop::run(&options_for(dir, 4), &SilentReporter).unwrap();

    let result = image::open(dir.join("alpha.png")).unwrap();
    assert_eq!(result.color(), ColorType::Rgb8);
}

#[test]
fn test_broken_file_is_reported_and_others_continue() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a_broken.jpg"), b"garbage").unwrap();
    RgbImage::from_pixel(12, 6, Rgb([9, 9, 9]))
        .save(dir.join("b_good.png"))
        .unwrap();

    let summary = crop::run(&options_for(dir, 6), &SilentReporter).unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].path.ends_with("a_broken.jpg"));
    assert_eq!(fs::read(dir.join("a_broken.jpg")).unwrap(), b"garbage");

    let good = image::open(dir.join("b_good.png")).unwrap();
    assert_eq!((good.width(), good.height()), (6, 6));
}

#[test]
fn test_subdirectories_are_not_visited() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("sub")).unwrap();
    RgbImage::from_pixel(20, 10, Rgb([0, 0, 0]))
        .save(dir.join("sub/inner.png"))
        .unwrap();

    let summary = crop::run(&options_for(dir, 4), &SilentReporter).unwrap();

    assert_eq!(summary.processed, 0);
    let inner = image::open(dir.join("sub/inner.png")).unwrap();
    assert_eq!((inner.width(), inner.height()), (20, 10));
}

#[test]
fn test_missing_directory_is_error() {
    let tmp = tempdir().unwrap();
    let result = crop::run(&options_for(&tmp.path().join("missing"), 4), &SilentReporter);
    assert!(matches!(result, Err(Error::DirectoryNotFound(_))));
}
