// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Distance transforms over a raw escape-time field.  Both take the
//! same input, a grid of averaged escape results, and both answer the
//! same question: how far is this cell from the black heart?  They
//! use different metrics with different costs, and their outputs are
//! not comparable.
//!
//! The flood fill counts expanding rings of 8-connected neighbors, so
//! its distances are whole grid steps under a Chebyshev-style
//! geodesic.  The brute-force search measures true Euclidean distance
//! to the nearest in-set cell by scanning all of them for every cell.
//! They are kept as two named, separately selectable algorithms on
//! purpose; collapsing them into one "distance" would change the
//! numeric range one set of callers depends on.

use field::EscapeCell;
use grid::Grid;
use itertools::iproduct;

/// Selects a distance algorithm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Algorithm {
    /// Expanding-ring search; grid-step metric, `O(cells * rings)`.
    FloodFill,
    /// Exhaustive pairwise search; Euclidean metric, `O(cells²)`.
    /// Acceptable only for small grids.
    BruteForce,
}

/// A computed distance field, tagged by the algorithm that produced
/// it, with the statistic callers use to normalize the values.
#[derive(Clone, Debug)]
pub enum DistanceField {
    /// Flood-fill output: whole-ring distances and the largest ring
    /// assigned (0 when every cell is in-set).
    FloodFill {
        /// Ring distance per cell; in-set cells hold 0.
        cells: Grid<u32>,
        /// The largest ring assigned anywhere in the grid.
        rings: u32,
    },
    /// Brute-force output: Euclidean distances in grid units and the
    /// maximum observed.
    BruteForce {
        /// Euclidean distance per cell; in-set cells hold 0.
        cells: Grid<f64>,
        /// The maximum distance observed anywhere in the grid.
        max: f64,
    },
}

/// Runs the selected algorithm over a raw field.  Fails when the
/// field contains no in-set cell, since neither metric is defined
/// then (the flood fill would never terminate).
pub fn distance(
    img: &Grid<EscapeCell>,
    maxiter: u32,
    algorithm: Algorithm,
) -> Result<DistanceField, String> {
    match algorithm {
        Algorithm::FloodFill => {
            let (cells, rings) = flood_fill(img, maxiter)?;
            Ok(DistanceField::FloodFill { cells, rings })
        }
        Algorithm::BruteForce => {
            let (cells, max) = brute_force(img, maxiter)?;
            Ok(DistanceField::BruteForce { cells, max })
        }
    }
}

const UNRESOLVED: u32 = ::std::u32::MAX;

const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Expanding-ring distance in grid steps.  In-set cells seed the fill
/// at 0; ring `d` then claims every unresolved cell with a neighbor
/// at `d - 1`, rescanning the whole grid per ring, until no cell is
/// left.  Returns the field and the largest ring assigned.
pub fn flood_fill(img: &Grid<EscapeCell>, maxiter: u32) -> Result<(Grid<u32>, u32), String> {
    let (w, h) = (img.width(), img.height());
    let mut dist = vec![UNRESOLVED; w * h];
    let mut done = 0;
    for (y, x) in iproduct!(0..h, 0..w) {
        if img.get(x, y).in_set(maxiter) {
            dist[y * w + x] = 0;
            done += 1;
        }
    }
    if done == 0 {
        return Err("The field contains no in-set cell to measure from.".to_string());
    }

    let mut rings = 0;
    let mut d = 1;
    while done < w * h {
        for (y, x) in iproduct!(0..h, 0..w) {
            if dist[y * w + x] != UNRESOLVED {
                continue;
            }
            let adjacent = NEIGHBORS.iter().any(|&(dx, dy)| {
                let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                nx >= 0
                    && ny >= 0
                    && (nx as usize) < w
                    && (ny as usize) < h
                    && dist[(ny as usize) * w + (nx as usize)] == d - 1
            });
            if adjacent {
                dist[y * w + x] = d;
                done += 1;
                rings = d;
            }
        }
        d += 1;
    }
    Ok((Grid::from_cells(w, h, dist), rings))
}

/// True Euclidean distance, in grid units, from every cell to the
/// nearest in-set cell, found by scanning all in-set cells per target
/// cell.  In-set cells measure the distance to themselves, which is
/// 0.  Returns the field and the maximum distance observed.
pub fn brute_force(img: &Grid<EscapeCell>, maxiter: u32) -> Result<(Grid<f64>, f64), String> {
    let (w, h) = (img.width(), img.height());
    let seeds: Vec<(usize, usize)> = iproduct!(0..h, 0..w)
        .filter(|&(y, x)| img.get(x, y).in_set(maxiter))
        .collect();
    if seeds.is_empty() {
        return Err("The field contains no in-set cell to measure from.".to_string());
    }

    let mut max = 0.0;
    let mut dist = Vec::with_capacity(w * h);
    for (y, x) in iproduct!(0..h, 0..w) {
        let mut best = ::std::f64::INFINITY;
        for &(sy, sx) in &seeds {
            let dx = (x as f64) - (sx as f64);
            let dy = (y as f64) - (sy as f64);
            let d = (dx * dx + dy * dy).sqrt();
            if d < best {
                best = d;
            }
        }
        if best > max {
            max = best;
        }
        dist.push(best);
    }
    Ok((Grid::from_cells(w, h, dist), max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    /// A raw field with `iter = maxiter` at the given cells and a
    /// diverged result everywhere else.
    fn raw_grid(w: usize, h: usize, in_set: &[(usize, usize)], maxiter: u32) -> Grid<EscapeCell> {
        let cells = iproduct!(0..h, 0..w)
            .map(|(y, x)| EscapeCell {
                iter: if in_set.contains(&(x, y)) {
                    maxiter as f64
                } else {
                    1.0
                },
                z: Complex::new(2.0, 0.0),
            })
            .collect();
        Grid::from_cells(w, h, cells)
    }

    #[test]
    fn in_set_cells_measure_zero() {
        let img = raw_grid(4, 4, &[(1, 2)], 10);
        let (flood, _) = flood_fill(&img, 10).unwrap();
        let (brute, _) = brute_force(&img, 10).unwrap();
        assert_eq!(*flood.get(1, 2), 0);
        assert_eq!(*brute.get(1, 2), 0.0);
    }

    #[test]
    fn corner_seed_disagrees_across_metrics() {
        // One in-set cell at a corner of a 5x5 grid: the opposite
        // corner is 4 rings away but sqrt(32) grid units away.
        let img = raw_grid(5, 5, &[(0, 0)], 10);
        let (flood, rings) = flood_fill(&img, 10).unwrap();
        let (brute, max) = brute_force(&img, 10).unwrap();
        assert_eq!(*flood.get(4, 4), 4);
        assert_eq!(rings, 4);
        assert_eq!(*brute.get(4, 4), 32.0_f64.sqrt());
        assert_eq!(max, 32.0_f64.sqrt());
        assert!((*flood.get(4, 4) as f64) != *brute.get(4, 4));
    }

    #[test]
    fn flood_fill_rings_grow_chebyshev_style() {
        let img = raw_grid(5, 5, &[(2, 2)], 10);
        let (flood, rings) = flood_fill(&img, 10).unwrap();
        // Diagonal and orthogonal neighbors land in the same ring.
        assert_eq!(*flood.get(1, 1), 1);
        assert_eq!(*flood.get(2, 1), 1);
        assert_eq!(*flood.get(0, 0), 2);
        assert_eq!(rings, 2);
    }

    #[test]
    fn flood_distances_fit_inside_the_grid() {
        let img = raw_grid(6, 4, &[(3, 1)], 10);
        let (flood, rings) = flood_fill(&img, 10).unwrap();
        let diagonal = 6 + 4;
        assert!(rings < diagonal);
        assert!(flood.cells().iter().all(|&d| d < diagonal));
    }

    #[test]
    fn growing_the_grid_never_shrinks_a_distance() {
        let small = raw_grid(3, 3, &[(0, 0)], 10);
        let large = raw_grid(5, 5, &[(0, 0)], 10);
        let (ds, _) = brute_force(&small, 10).unwrap();
        let (dl, _) = brute_force(&large, 10).unwrap();
        for (y, x) in iproduct!(0..3usize, 0..3usize) {
            assert!(dl.get(x, y) >= ds.get(x, y));
        }
    }

    #[test]
    fn fully_in_set_grid_is_all_zeros() {
        let img = raw_grid(3, 3, &[
            (0, 0), (1, 0), (2, 0),
            (0, 1), (1, 1), (2, 1),
            (0, 2), (1, 2), (2, 2),
        ], 10);
        let (flood, rings) = flood_fill(&img, 10).unwrap();
        let (brute, max) = brute_force(&img, 10).unwrap();
        assert_eq!(rings, 0);
        assert_eq!(max, 0.0);
        assert!(flood.cells().iter().all(|&d| d == 0));
        assert!(brute.cells().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn empty_set_is_rejected_up_front() {
        let img = raw_grid(3, 3, &[], 10);
        assert!(flood_fill(&img, 10).is_err());
        assert!(brute_force(&img, 10).is_err());
        assert!(distance(&img, 10, Algorithm::FloodFill).is_err());
    }

    #[test]
    fn dispatcher_tags_its_output() {
        let img = raw_grid(4, 4, &[(1, 1)], 10);
        match distance(&img, 10, Algorithm::FloodFill).unwrap() {
            DistanceField::FloodFill { cells, rings } => {
                assert_eq!(cells.len(), 16);
                assert!(rings > 0);
            }
            DistanceField::BruteForce { .. } => panic!("flood fill came back brute force"),
        }
        match distance(&img, 10, Algorithm::BruteForce).unwrap() {
            DistanceField::BruteForce { cells, max } => {
                assert_eq!(cells.len(), 16);
                assert!(max > 0.0);
            }
            DistanceField::FloodFill { .. } => panic!("brute force came back flood fill"),
        }
    }

    #[test]
    fn distance_composes_with_a_raw_render() {
        use field::Compositor;
        use progress::Silent;
        use window::SampleWindow;

        // A window straddling the set boundary so both in-set and
        // diverging cells exist.
        let window = SampleWindow::centered(Complex::new(-0.5, 0.0), 3.0, 10, 10).unwrap();
        let raw = Compositor::new(10, 10, window, 60, 1, 0)
            .unwrap()
            .raw(&Silent);
        let (flood, rings) = flood_fill(&raw, 60).unwrap();
        assert!(rings > 0);
        for (y, x) in iproduct!(0..10usize, 0..10usize) {
            if raw.get(x, y).in_set(60) {
                assert_eq!(*flood.get(x, y), 0);
            } else {
                assert!(*flood.get(x, y) > 0);
            }
        }
    }
}
