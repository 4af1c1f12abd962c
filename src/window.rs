//! Contains the SampleWindow struct, which describes the relationship
//! between the integral sampling grid and a rectangle on the complex
//! plane: an origin, a per-axis step, and optionally one x-origin per
//! row so that alternate rows can be staggered into a hex-style grid.

use num::Complex;

/// The rectangle of the complex plane mapped onto the sampling grid.
/// Cell `(px, py)` covers the plane-space rectangle starting at
/// `(xs[py mod n] + px * step_re, y_origin + py * step_im)` and
/// extending one step along each axis.  Steps are strictly positive;
/// that is enforced at construction, not deep inside the sampling
/// loops.
#[derive(Clone, Debug)]
pub struct SampleWindow {
    x_origins: Vec<f64>,
    y_origin: f64,
    step: (f64, f64),
}

impl SampleWindow {
    /// A window with a single origin, the common case: every row
    /// starts at the same real coordinate.
    pub fn new(origin: Complex<f64>, step: (f64, f64)) -> Result<SampleWindow, String> {
        SampleWindow::staggered(vec![origin.re], origin.im, step)
    }

    /// A window whose x-origin cycles through `x_origins` by row
    /// index.  Passing two origins half a step apart yields the
    /// staggered rows of a hexagonal sampling grid.
    pub fn staggered(
        x_origins: Vec<f64>,
        y_origin: f64,
        step: (f64, f64),
    ) -> Result<SampleWindow, String> {
        if x_origins.is_empty() {
            return Err("At least one row origin is required.".to_string());
        }
        if !(step.0 > 0.0) || !(step.1 > 0.0) {
            return Err("The window steps must be strictly positive.".to_string());
        }
        Ok(SampleWindow {
            x_origins,
            y_origin,
            step,
        })
    }

    /// A window described the way interactive viewers do: a center
    /// point and a real-axis width, with the height derived from the
    /// grid's aspect ratio.
    pub fn centered(
        center: Complex<f64>,
        width: f64,
        iw: usize,
        ih: usize,
    ) -> Result<SampleWindow, String> {
        if iw == 0 || ih == 0 {
            return Err("The grid must have a positive width and height.".to_string());
        }
        if !(width > 0.0) {
            return Err("The window width must be strictly positive.".to_string());
        }
        let height = width * (ih as f64) / (iw as f64);
        SampleWindow::new(
            Complex::new(center.re - width / 2.0, center.im - height / 2.0),
            (width / (iw as f64), height / (ih as f64)),
        )
    }

    /// The per-axis step `(step_re, step_im)`.
    pub fn step(&self) -> (f64, f64) {
        self.step
    }

    /// The plane-space origin of cell `(px, py)`.
    pub fn cell_origin(&self, px: usize, py: usize) -> Complex<f64> {
        let xs = self.x_origins[py % self.x_origins.len()];
        Complex::new(
            xs + (px as f64) * self.step.0,
            self.y_origin + (py as f64) * self.step.1,
        )
    }
}
