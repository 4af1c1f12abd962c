#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal field generator
//!
//! The Mandelbrot set takes a point on the complex plane and
//! repeatedly multiplies it by itself, measuring how quickly that
//! number goes to infinity.  This crate evaluates that recurrence
//! over a rectangular sampling grid and turns the results into data
//! other programs can use: either a raw field of per-cell iteration
//! counts and final orbit values, or a field of smoothly shaded
//! colors suitable for writing straight into an image buffer.
//!
//! Cells whose samples never go to infinity within the iteration cap
//! belong to the "black heart" of the set.  A separate stage measures
//! how far every other cell is from that heart, producing a distance
//! field.  Two distance algorithms are provided and they are *not*
//! interchangeable: one counts expanding rings of 8-connected
//! neighbors (a grid-step metric), the other measures true Euclidean
//! distance by exhaustive search.  Callers pick one and live with its
//! numeric range.

extern crate crossbeam;
extern crate itertools;
extern crate num;
extern crate rand;

pub mod color;
pub mod distance;
pub mod escape;
pub mod field;
pub mod grid;
pub mod progress;
pub mod window;

pub use color::{hsv_to_rgb, to_rgb8, Rgb};
pub use distance::{distance, Algorithm, DistanceField};
pub use escape::mandelbrot;
pub use field::{ColorCell, Compositor, EscapeCell, Field, Mode};
pub use grid::Grid;
pub use progress::{Progress, Silent, StderrProgress};
pub use window::SampleWindow;
