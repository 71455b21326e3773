// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane described by a Viewport.
//!
//! Two projections are offered.  They are not interchangeable: the
//! same viewport renders a slightly different image under each, so a
//! caller has to pick one by name.
use errors::RenderError;
use num::Complex;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in the integral plane.  x increases
/// to the right, y increases down the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane being rendered.  The real part
/// runs along x, the imaginary part along y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real value of the leftmost column.
    pub xmin: f64,
    /// Real value one column past the rightmost.
    pub xmax: f64,
    /// Imaginary value of the top row.
    pub ymin: f64,
    /// Imaginary value one row past the bottom.
    pub ymax: f64,
}

impl Viewport {
    /// Checks that the bounds are finite and that each minimum is
    /// strictly below its maximum.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Viewport, RenderError> {
        if !(xmin.is_finite() && xmax.is_finite() && ymin.is_finite() && ymax.is_finite()) {
            return Err(RenderError::config("viewport bounds must be finite"));
        }
        if xmax <= xmin {
            return Err(RenderError::config(
                "The left edge of the viewport is not to the left of the right edge.",
            ));
        }
        if ymax <= ymin {
            return Err(RenderError::config(
                "The top edge of the viewport is not above the bottom edge.",
            ));
        }
        Ok(Viewport {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// The square of side 4 around the origin, for use with
    /// `Projection::Centered`.
    pub fn centered() -> Viewport {
        Viewport {
            xmin: -2.0,
            xmax: 2.0,
            ymin: -2.0,
            ymax: 2.0,
        }
    }

    /// Width of the viewport along the real axis.
    pub fn re_span(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Height of the viewport along the imaginary axis.
    pub fn im_span(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// The midpoint of the viewport.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(
            self.xmin + self.re_span() / 2.0,
            self.ymin + self.im_span() / 2.0,
        )
    }
}

impl Default for Viewport {
    /// The classic full view of the set, -2..1 by -1.5..1.5.
    fn default() -> Viewport {
        Viewport {
            xmin: -2.0,
            xmax: 1.0,
            ymin: -1.5,
            ymax: 1.5,
        }
    }
}

/// How a pixel coordinate is turned into a point on the complex plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Projection {
    /// Pixel 0,0 lands exactly on (xmin, ymin); each step adds
    /// span / size.  `re = xmin + (xmax - xmin) * x / width`.
    Corner,
    /// Pixel width/2, height/2 lands on the viewport center.
    /// `re = cx + (x - width / 2) * (xmax - xmin) / width`.
    Centered,
}

impl Default for Projection {
    fn default() -> Projection {
        Projection::Corner
    }
}

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a viewport on the complex plane.  Maps pixels from one to the
/// other.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The right-lower hand corner of the integral cartesian plane.
    /// The left-upper is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The region of the complex plane the integral plane covers.
    pub viewport: Viewport,
    /// Which of the two mapping conventions to apply.
    pub projection: Projection,
}

impl PlaneMapper {
    /// Constructor.  Refuses an empty integral plane.
    pub fn new(
        width: usize,
        height: usize,
        viewport: Viewport,
        projection: Projection,
    ) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::config(format!(
                "image size {}x{} has no pixels",
                width, height
            )));
        }
        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            viewport,
            projection,
        })
    }

    /// Width of the integral plane in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Height of the integral plane in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral cartesian plane, map it to its
    /// point on the complex plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let (x, y) = (pixel.0 as f64, pixel.1 as f64);
        let (w, h) = (self.integral_plane.0 as f64, self.integral_plane.1 as f64);
        let vp = &self.viewport;
        match self.projection {
            Projection::Corner => Complex::new(
                vp.xmin + vp.re_span() * x / w,
                vp.ymin + vp.im_span() * y / h,
            ),
            Projection::Centered => {
                let center = vp.center();
                Complex::new(
                    (x - w / 2.0) * vp.re_span() / w + center.re,
                    (y - h / 2.0) * vp.im_span() / h + center.im,
                )
            }
        }
    }
}
