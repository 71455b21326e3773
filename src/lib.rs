#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the orbit of `z = z * z + c`, starting from zero, stays
//! bounded.  Any orbit that leaves the circle of radius 2 is gone for
//! good, so counting the steps until that happens (the "escape time")
//! gives every point outside the set a number, and every point that
//! never leaves within the budget is presumed inside.
//!
//! Rendering is a straight line: map every pixel to a point through a
//! `PlaneMapper`, count its escape time into an `IterationGrid`, turn
//! the counts into bytes with a `ColorMode`, and write a PNG.
//!
//! ```no_run
//! use mandelbrot::{render_to_file, RenderParameters, Viewport};
//! use std::path::Path;
//!
//! let params = RenderParameters::new(1024, 1024, 500).unwrap();
//! render_to_file(&params, &Viewport::default(), Path::new("mandelbrot.png")).unwrap();
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate tempfile;

pub mod encoder;
pub mod errors;
pub mod escape;
pub mod planes;

pub use encoder::{pixelate, write_image, ColorMode};
pub use errors::RenderError;
pub use escape::{escape_time, IterationGrid};
pub use planes::{Pixel, PlaneMapper, Projection, Viewport};

use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Everything about a render except where it looks: image size,
/// iteration budget, coloring, and how much parallelism to use.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParameters {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Upper bound on the escape-time loop.
    pub max_iter: u32,
    /// How escape counts become pixels.
    pub color_mode: ColorMode,
    /// How pixels become points.
    pub projection: Projection,
    /// Worker threads for the evaluator.  One renders on the calling
    /// thread.
    pub threads: usize,
}

impl RenderParameters {
    /// Grayscale, corner projection, single-threaded.  Fails on a zero
    /// width, height, or iteration budget.
    pub fn new(width: usize, height: usize, max_iter: u32) -> Result<Self, RenderError> {
        let params = RenderParameters {
            width,
            height,
            max_iter,
            color_mode: ColorMode::default(),
            projection: Projection::default(),
            threads: 1,
        };
        params.validate()?;
        Ok(params)
    }

    /// Use `mode` for coloring.
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Use `projection` for mapping pixels to points.
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Spread evaluation over `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Reject anything that can't produce a whole, encodable image.
    /// The fields are public, so this runs again before every render.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::config(format!(
                "image size {}x{} has no pixels",
                self.width, self.height
            )));
        }
        if self.width > u32::max_value() as usize || self.height > u32::max_value() as usize {
            return Err(RenderError::config(format!(
                "image size {}x{} is too large",
                self.width, self.height
            )));
        }
        if self.max_iter == 0 {
            return Err(RenderError::config("iteration limit must be positive"));
        }
        if self.threads == 0 {
            return Err(RenderError::config("thread count must be positive"));
        }
        Ok(())
    }
}

/// What a finished render reports back.
#[derive(Copy, Clone, Debug)]
pub struct RenderStats {
    /// When the render began, in milliseconds since the Unix epoch.
    pub started_ms: u128,
    /// Wall-clock time from start to finished file.
    pub elapsed: Duration,
    /// Pixels whose orbit escaped within the budget.
    pub escaped: usize,
}

/// Compute the iteration grid for `viewport` without writing anything.
pub fn render(params: &RenderParameters, viewport: &Viewport) -> Result<IterationGrid, RenderError> {
    params.validate()?;
    let plane = PlaneMapper::new(params.width, params.height, *viewport, params.projection)?;
    IterationGrid::render(&plane, params.max_iter, params.threads)
}

/// Render `viewport` and save it to `path` as a PNG.  The directory
/// must already exist.
pub fn render_to_file(
    params: &RenderParameters,
    viewport: &Viewport,
    path: &Path,
) -> Result<RenderStats, RenderError> {
    let start = Instant::now();
    let started_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    info!("render started at {} ms", started_ms);
    info!(
        "rendering {}x{} at {} iterations over {:?}",
        params.width, params.height, params.max_iter, viewport
    );

    let grid = render(params, viewport)?;
    let pixels = pixelate(&grid, params.max_iter, params.color_mode)?;
    write_image(path, &pixels, grid.width(), grid.height(), params.color_mode)?;

    let stats = RenderStats {
        started_ms,
        elapsed: start.elapsed(),
        escaped: grid.escaped(params.max_iter),
    };
    info!("saved {} in {:?}", path.display(), stats.elapsed);
    Ok(stats)
}
