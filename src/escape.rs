// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.  Everything else in this crate is
//! bookkeeping around this one loop.

use num::Complex;

/// Iterates `z = z * z + c` from `z = 0`, counting iterations until
/// the orbit leaves the circle of radius 2 (`|z|² >= 4`) or the count
/// reaches `maxiter`.  Returns the count and the final orbit value.
///
/// A count equal to `maxiter` classifies `c` as in-set: the orbit was
/// never observed to diverge.  That is necessary but not sufficient,
/// which is the standard imprecision of finite escape-time rendering.
///
/// The iterate is advanced before the count, so a point like `c = 3`
/// whose very first iterate already lies outside the circle reports a
/// count of 1, not 0.
pub fn mandelbrot(c: Complex<f64>, maxiter: u32) -> (u32, Complex<f64>) {
    let mut z = Complex::new(0.0, 0.0);
    let mut iter = 0;
    while iter < maxiter && z.norm_sqr() < 4.0 {
        z = z * z + c;
        iter += 1;
    }
    (iter, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        let (iter, z) = mandelbrot(Complex::new(0.0, 0.0), 64);
        assert_eq!(iter, 64);
        assert_eq!(z, Complex::new(0.0, 0.0));
    }

    #[test]
    fn boundary_point_matches_recurrence_trace() {
        // z0 = 0 passes the |z|² < 4 check, z1 = 3 does not.
        let (iter, z) = mandelbrot(Complex::new(3.0, 0.0), 10);
        assert_eq!(iter, 1);
        assert_eq!(z, Complex::new(3.0, 0.0));
    }

    #[test]
    fn threshold_point_stops_after_one_step() {
        // z1 = 2 sits exactly on the threshold, |z|² = 4.
        let (iter, z) = mandelbrot(Complex::new(2.0, 0.0), 10);
        assert_eq!(iter, 1);
        assert_eq!(z, Complex::new(2.0, 0.0));
    }

    #[test]
    fn count_is_bounded_by_maxiter() {
        for &(re, im) in &[(0.0, 0.0), (-1.0, 0.0), (0.3, 0.5), (-2.0, 1.0), (10.0, 10.0)] {
            let (iter, _) = mandelbrot(Complex::new(re, im), 50);
            assert!(iter <= 50);
        }
    }

    #[test]
    fn period_two_orbit_is_in_set() {
        // c = -1 cycles 0 -> -1 -> 0 and never diverges.
        let (iter, _) = mandelbrot(Complex::new(-1.0, 0.0), 1000);
        assert_eq!(iter, 1000);
    }
}
