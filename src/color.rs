//! Smooth coloring for diverging samples.  The discrete iteration
//! count produces visible banding across the set boundary; the
//! logarithmic correction below turns it into a continuous escape
//! estimate, which is then pushed through a fixed hue ramp.

use field::ColorCell;
use grid::Grid;
use num::{clamp, Complex};
use std::f64::consts::LN_2;

/// An RGB triple with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    /// Red component.
    pub r: f64,
    /// Green component.
    pub g: f64,
    /// Blue component.
    pub b: f64,
}

/// The continuous escape estimate for a diverging sample, normalized
/// into `[0, 1]` by `maxiter`.
///
/// `log(log(|z|))` is undefined for `|z| <= 1`, which can happen when
/// a sample diverges right at the threshold; those samples fall back
/// to the plain `iter / maxiter` fraction instead of propagating a
/// domain error.
pub fn smooth_fraction(iter: u32, z: Complex<f64>, maxiter: u32) -> f64 {
    let mag = z.norm();
    let smooth = if mag > 1.0 {
        ((iter as f64) + 1.0 - mag.ln().ln() / LN_2) / (maxiter as f64)
    } else {
        (iter as f64) / (maxiter as f64)
    };
    clamp(smooth, 0.0, 1.0)
}

/// Maps a smooth escape fraction onto the fixed hue ramp: hue
/// `0.95 + 10 * smooth` wrapped into `[0, 1)`, saturation 0.6, full
/// value.
pub fn shade(smooth: f64) -> Rgb {
    hsv_to_rgb((0.95 + 10.0 * smooth).fract(), 0.6, 1.0)
}

/// HSV to RGB, with hue in `[0, 1)` turns and saturation and value in
/// `[0, 1]`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let sector = h * 6.0;
    let i = sector.floor();
    let f = sector - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match (i as u32) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb { r, g, b }
}

/// Flattens a color grid into a row-major `R, G, B` byte stream with
/// each component scaled to `[0, 255]`, ready for an image encoder.
pub fn to_rgb8(grid: &Grid<ColorCell>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(grid.len() * 3);
    for cell in grid.cells() {
        bytes.push(clamp(cell.color.r * 255.0, 0.0, 255.0) as u8);
        bytes.push(clamp(cell.color.g * 255.0, 0.0, 255.0) as u8);
        bytes.push(clamp(cell.color.b * 255.0, 0.0, 255.0) as u8);
    }
    bytes
}
