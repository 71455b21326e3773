// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type returned by every fallible operation in the
//! renderer.  Nothing here is retried; the caller decides.

use std::io;

/// Everything that can go wrong between parsing a configuration and
/// having a finished image on disk.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The width, height, iteration limit, or viewport can't describe
    /// a real image.  Raised before any computation begins.
    #[fail(display = "invalid configuration: {}", _0)]
    Config(String),

    /// The destination could not be created or written.
    #[fail(display = "could not write {}: {}", path, cause)]
    Io {
        /// The destination we were trying to write.
        path: String,
        /// What the operating system told us.
        #[cause]
        cause: io::Error,
    },

    /// The image library refused to encode the pixel buffer.
    #[fail(display = "could not encode image: {}", _0)]
    Encode(#[cause] io::Error),

    /// One of the render workers panicked before finishing its band.
    #[fail(display = "a render worker panicked")]
    WorkerPanic,
}

impl RenderError {
    /// Shorthand for a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> RenderError {
        RenderError::Config(msg.into())
    }
}
