extern crate image;
extern crate mandelbrot;
extern crate tempfile;

use image::{ColorType, DynamicImage, GenericImageView};
use mandelbrot::{
    render, render_to_file, write_image, ColorMode, Projection, RenderError, RenderParameters,
    Viewport,
};
use std::fs;
use tempfile::tempdir;

fn small() -> RenderParameters {
    RenderParameters::new(4, 4, 10).unwrap()
}

#[test]
fn four_by_four_grayscale() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mandelbrot.png");
    render_to_file(&small(), &Viewport::default(), &path).unwrap();

    let img = image::open(&path).unwrap();
    assert_eq!(img.dimensions(), (4, 4));
    assert_eq!(img.color(), ColorType::Gray(8));
    let pixels = match img {
        DynamicImage::ImageLuma8(buf) => buf.into_raw(),
        other => panic!("expected an 8-bit grayscale image, got {:?}", other.color()),
    };
    assert_eq!(pixels.len(), 16);
    // -2 - 1.5i leaves on the first step.
    assert_eq!(pixels[0], 1);
    // Pixel (2, 2) is -0.5 + 0i, inside the set.
    assert_eq!(pixels[2 * 4 + 2], 10);
}

#[test]
fn rgb_output_has_three_equal_channels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rgb.png");
    let params = RenderParameters::new(16, 12, 50)
        .unwrap()
        .with_color_mode(ColorMode::Rgb);
    render_to_file(&params, &Viewport::default(), &path).unwrap();

    let img = image::open(&path).unwrap();
    assert_eq!(img.dimensions(), (16, 12));
    assert_eq!(img.color(), ColorType::RGB(8));
    let pixels = match img {
        DynamicImage::ImageRgb8(buf) => buf.into_raw(),
        other => panic!("expected an 8-bit RGB image, got {:?}", other.color()),
    };
    assert_eq!(pixels.len(), 16 * 12 * 3);
    for px in pixels.chunks(3) {
        assert!(px[0] == px[1] && px[1] == px[2]);
    }
    assert!(pixels.iter().any(|&b| b == 255));
}

#[test]
fn identical_configurations_give_identical_files() {
    let dir = tempdir().unwrap();
    let (a, b) = (dir.path().join("a.png"), dir.path().join("b.png"));
    let params = RenderParameters::new(40, 30, 300).unwrap();
    render_to_file(&params, &Viewport::default(), &a).unwrap();
    render_to_file(&params.with_threads(4), &Viewport::default(), &b).unwrap();
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn centered_projection_puts_the_origin_in_the_middle() {
    let params = RenderParameters::new(8, 8, 100)
        .unwrap()
        .with_projection(Projection::Centered);
    let grid = render(&params, &Viewport::centered()).unwrap();
    assert_eq!(grid.get(4, 4), 100);
    assert!(grid.get(0, 0) < 100);
}

#[test]
fn stats_count_escaped_pixels() {
    let dir = tempdir().unwrap();
    let stats = render_to_file(&small(), &Viewport::default(), &dir.path().join("s.png")).unwrap();
    assert!(stats.escaped > 0 && stats.escaped < 16);
    assert!(stats.started_ms > 0);
}

#[test]
fn missing_directory_is_an_io_error_and_leaves_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.png");
    match render_to_file(&small(), &Viewport::default(), &path) {
        Err(RenderError::Io { .. }) => {}
        other => panic!("expected an I/O error, got {:?}", other),
    }
    assert!(!path.exists());
}

#[test]
fn bad_configuration_is_rejected_before_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never.png");
    let mut params = small();
    params.width = 0;
    match render_to_file(&params, &Viewport::default(), &path) {
        Err(RenderError::Config(_)) => {}
        other => panic!("expected a configuration error, got {:?}", other),
    }
    assert!(!path.exists());
}

#[test]
fn failed_write_leaves_the_existing_entry_alone() {
    let dir = tempdir().unwrap();
    // A non-empty directory can't be replaced by a file.
    let path = dir.path().join("taken.png");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep"), b"keep").unwrap();

    match write_image(&path, &[0; 4], 2, 2, ColorMode::Grayscale) {
        Err(RenderError::Io { .. }) => {}
        other => panic!("expected an I/O error, got {:?}", other),
    }
    assert!(path.is_dir());
    assert_eq!(fs::read(path.join("keep")).unwrap(), b"keep");
    // No stray temporary file beside it.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn refused_encoding_leaves_the_existing_file_alone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("old.png");
    fs::write(&path, b"old").unwrap();
    assert!(write_image(&path, &[0; 3], 2, 2, ColorMode::Grayscale).is_err());
    assert_eq!(fs::read(&path).unwrap(), b"old");
}

#[test]
fn writing_replaces_an_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("old.png");
    fs::write(&path, b"old").unwrap();
    write_image(&path, &[0, 64, 128, 255], 2, 2, ColorMode::Grayscale).unwrap();
    let img = image::open(&path).unwrap();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[cfg(unix)]
#[test]
fn writing_through_a_symlink_replaces_the_link_not_its_target() {
    use std::os::unix::fs::symlink;
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.bin");
    fs::write(&target, b"target").unwrap();
    let path = dir.path().join("existing.png");
    symlink(&target, &path).unwrap();

    write_image(&path, &[0, 64, 128, 255], 2, 2, ColorMode::Grayscale).unwrap();
    assert!(!fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
    assert_eq!(fs::read(&target).unwrap(), b"target");
    assert_eq!(image::open(&path).unwrap().dimensions(), (2, 2));
}
