// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The raster encoder: turns an iteration grid into a pixel buffer,
//! and a pixel buffer into an 8-bit, non-interlaced PNG on disk.

use errors::RenderError;
use escape::IterationGrid;
use image::png::PNGEncoder;
use image::ColorType;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// How an escape count becomes a pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorMode {
    /// One channel, `count % 256`.  Counts of 256 and up wrap back to
    /// black rather than clamping at white, so deep renders show
    /// bands of brightness.  That's the established look of these
    /// images and is kept as is.
    Grayscale,
    /// Three equal channels, `255 * count / max_iter`, so points inside
    /// the set are white and the fastest escapes are black.
    Rgb,
}

impl Default for ColorMode {
    fn default() -> ColorMode {
        ColorMode::Grayscale
    }
}

impl ColorMode {
    /// Bytes per pixel in the buffer and the file.
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Grayscale => 1,
            ColorMode::Rgb => 3,
        }
    }

    /// The PNG color type for this mode, always 8 bits deep.
    pub fn color_type(self) -> ColorType {
        match self {
            ColorMode::Grayscale => ColorType::Gray(8),
            ColorMode::Rgb => ColorType::RGB(8),
        }
    }

    /// The byte value of one channel for `count`.  Fails if `count`
    /// exceeds `max_iter`, or if `max_iter` is zero for `Rgb`.
    pub fn map(self, count: u32, max_iter: u32) -> Result<u8, RenderError> {
        self.check_budget(max_iter)?;
        check_count(count, max_iter)?;
        Ok(self.map_checked(count, max_iter))
    }

    fn check_budget(self, max_iter: u32) -> Result<(), RenderError> {
        if self == ColorMode::Rgb && max_iter == 0 {
            return Err(RenderError::config(
                "rgb coloring needs a positive iteration limit",
            ));
        }
        Ok(())
    }

    #[inline]
    fn map_checked(self, count: u32, max_iter: u32) -> u8 {
        match self {
            ColorMode::Grayscale => (count % 256) as u8,
            ColorMode::Rgb => (255 * u64::from(count) / u64::from(max_iter)) as u8,
        }
    }
}

fn check_count(count: u32, max_iter: u32) -> Result<(), RenderError> {
    if count > max_iter {
        return Err(RenderError::config(format!(
            "escape count {} exceeds the iteration limit {}",
            count, max_iter
        )));
    }
    Ok(())
}

/// Build the row-major pixel buffer for `grid`: width × height ×
/// channels bytes, channels of a pixel adjacent.  Every count in the
/// grid must be within `max_iter`.
pub fn pixelate(
    grid: &IterationGrid,
    max_iter: u32,
    mode: ColorMode,
) -> Result<Vec<u8>, RenderError> {
    mode.check_budget(max_iter)?;
    let channels = mode.channels();
    let mut pixels = Vec::with_capacity(grid.counts().len() * channels);
    for &count in grid.counts() {
        check_count(count, max_iter)?;
        let v = mode.map_checked(count, max_iter);
        for _ in 0..channels {
            pixels.push(v);
        }
    }
    Ok(pixels)
}

fn check_buffer(
    pixels: &[u8],
    width: usize,
    height: usize,
    mode: ColorMode,
) -> Result<(u32, u32), RenderError> {
    if width > u32::max_value() as usize || height > u32::max_value() as usize {
        return Err(RenderError::config(format!(
            "image size {}x{} is too large to encode",
            width, height
        )));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(mode.channels()));
    if expected != Some(pixels.len()) {
        return Err(RenderError::config(format!(
            "pixel buffer holds {} bytes, a {}x{} {:?} image needs {}",
            pixels.len(),
            width,
            height,
            mode,
            expected.map_or_else(|| "more".to_string(), |n| n.to_string())
        )));
    }
    Ok((width as u32, height as u32))
}

/// Encode a pixel buffer as a PNG, in memory.
pub fn encode_png(
    pixels: &[u8],
    width: usize,
    height: usize,
    mode: ColorMode,
) -> Result<Vec<u8>, RenderError> {
    let (w, h) = check_buffer(pixels, width, height, mode)?;
    let mut png = Vec::new();
    PNGEncoder::new(&mut png)
        .encode(pixels, w, h, mode.color_type())
        .map_err(RenderError::Encode)?;
    debug!("encoded {}x{} {:?} image into {} bytes", w, h, mode, png.len());
    Ok(png)
}

/// Write a pixel buffer to `path` as a PNG.
///
/// The image is encoded in full, then written to a temporary file
/// beside `path` and renamed over it.  Until that rename succeeds the
/// destination is never touched; on any failure the temporary file is
/// dropped and whatever was at `path` before is still there.
pub fn write_image(
    path: &Path,
    pixels: &[u8],
    width: usize,
    height: usize,
    mode: ColorMode,
) -> Result<(), RenderError> {
    let png = encode_png(pixels, width, height, mode)?;
    let io_error = |cause: io::Error| RenderError::Io {
        path: path.display().to_string(),
        cause,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut output = NamedTempFile::new_in(dir).map_err(&io_error)?;
    output.write_all(&png).map_err(&io_error)?;
    output.flush().map_err(&io_error)?;
    make_readable(&output).map_err(&io_error)?;
    output.persist(path).map_err(|e| io_error(e.error))?;
    debug!("wrote {}", path.display());
    Ok(())
}

// Temporary files are created owner-only; a finished image gets the
// usual permissions.
#[cfg(unix)]
fn make_readable(file: &NamedTempFile) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.as_file()
        .set_permissions(::std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn make_readable(_file: &NamedTempFile) -> io::Result<()> {
    Ok(())
}
