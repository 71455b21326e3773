// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.
//!
//! For every pixel we take the matching point `c` on the complex
//! plane and iterate `z = z * z + c` from zero, counting how many
//! steps pass before `|z|` exceeds 2.  Points that never escape within
//! the iteration budget are presumed to be inside the set and get the
//! budget itself as their count.
//!
//! Each pixel depends only on its own point and the limit, so the grid
//! can be split into horizontal bands and handed to as many threads as
//! we like.  Each thread owns its band outright; nothing is locked.

use crossbeam;
use errors::RenderError;
use num::Complex;
use planes::{Pixel, PlaneMapper};

/// Count the iterations of `z = z * z + c`, from `z = 0`, until the
/// orbit leaves the circle of radius 2.  Returns `max_iter` if it
/// never does.  A `max_iter` of zero returns zero without iterating.
#[inline]
pub fn escape_time(c: Complex<f64>, max_iter: u32) -> u32 {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for n in 0..max_iter {
        if z.norm_sqr() > 4.0 {
            return n;
        }
        z = z * z + c;
    }
    max_iter
}

/// The per-pixel escape counts of a single render, stored row-major:
/// the count for pixel (x, y) lives at `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationGrid {
    width: usize,
    height: usize,
    counts: Vec<u32>,
}

impl IterationGrid {
    /// A zero-filled grid.  Fails if either side is zero or the cell
    /// count doesn't fit in memory.
    pub fn new(width: usize, height: usize) -> Result<IterationGrid, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::config(format!(
                "image size {}x{} has no pixels",
                width, height
            )));
        }
        let len = width.checked_mul(height).ok_or_else(|| {
            RenderError::config(format!("image size {}x{} is too large", width, height))
        })?;
        Ok(IterationGrid {
            width,
            height,
            counts: vec![0; len],
        })
    }

    /// Evaluate every pixel of `plane`, splitting the rows across
    /// `threads` workers.  One thread (or zero) renders in place.
    pub fn render(
        plane: &PlaneMapper,
        max_iter: u32,
        threads: usize,
    ) -> Result<IterationGrid, RenderError> {
        let mut grid = IterationGrid::new(plane.width(), plane.height())?;
        if threads <= 1 {
            render_band(plane, max_iter, 0, &mut grid.counts);
            return Ok(grid);
        }

        let width = grid.width;
        let threads = threads.min(grid.height);
        let rows_per_band = (grid.height + threads - 1) / threads;
        debug!(
            "rendering {} rows in bands of {} across {} threads",
            grid.height, rows_per_band, threads
        );
        crossbeam::scope(|spawner| {
            for (band, region) in grid.counts.chunks_mut(rows_per_band * width).enumerate() {
                spawner.spawn(move |_| {
                    render_band(plane, max_iter, band * rows_per_band, region);
                });
            }
        })
        .map_err(|_| RenderError::WorkerPanic)?;
        Ok(grid)
    }

    /// Width of the grid in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The escape count for pixel (x, y).
    ///
    /// # Panics
    ///
    /// Panics if the pixel is outside the grid.
    pub fn get(&self, x: usize, y: usize) -> u32 {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        self.counts[y * self.width + x]
    }

    /// All counts, row-major.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Number of pixels whose orbit escaped before `max_iter`.
    pub fn escaped(&self, max_iter: u32) -> usize {
        self.counts.iter().filter(|&&n| n < max_iter).count()
    }
}

/// Fill `region`, which holds whole rows starting at `first_row`.
fn render_band(plane: &PlaneMapper, max_iter: u32, first_row: usize, region: &mut [u32]) {
    let width = plane.width();
    let rows = region.len() / width;
    for (row, column) in iproduct!(0..rows, 0..width) {
        let c = plane.pixel_to_point(&Pixel(column, first_row + row));
        region[row * width + column] = escape_time(c, max_iter);
    }
}
