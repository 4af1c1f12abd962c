// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The sampling compositor.  For every grid cell it draws one or more
//! sample points inside the cell's plane-space rectangle, runs each
//! through the escape-time evaluator, and folds the results into a
//! single cell value: either the raw averaged `(iterations, z)` pair
//! that the distance transforms consume, or a smoothly shaded color.
//!
//! Every cell is independent of every other cell, so the compositor
//! also offers a threaded path: scoped workers pull row indices from
//! a shared queue, compute whole rows into private buffers, and the
//! rows are stitched back together once the workers join.  Because
//! the jitter generator is reseeded per row, the threaded and
//! single-threaded paths produce identical grids.

extern crate crossbeam;

use color::{shade, smooth_fraction, Rgb};
use crossbeam::thread::ScopedJoinHandle;
use escape::mandelbrot;
use grid::Grid;
use num::Complex;
use progress::Progress;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use window::SampleWindow;

type RowQueue = Arc<Mutex<Range<usize>>>;

/// One cell of a raw escape-time field: the iteration count and the
/// final orbit value, each averaged elementwise over the cell's
/// samples.  The count reaches `maxiter` exactly only when every
/// sample stayed inside the set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EscapeCell {
    /// Averaged iteration count, in `[0, maxiter]`.
    pub iter: f64,
    /// Averaged final orbit value.
    pub z: Complex<f64>,
}

impl EscapeCell {
    /// True when the cell never diverged within the iteration cap.
    pub fn in_set(&self, maxiter: u32) -> bool {
        self.iter == (maxiter as f64)
    }
}

/// One cell of a shaded field: an RGB color and the normalized smooth
/// escape fraction, both averaged over the cell's samples.  Samples
/// that never diverge contribute zero to both, which darkens cells
/// straddling the set boundary; that bias is part of the output
/// contract, not an accident to fix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorCell {
    /// Shaded color with components in `[0, 1]`.
    pub color: Rgb,
    /// Smoothed escape fraction in `[0, 1]`, used downstream for
    /// height or shading maps.
    pub smooth: f64,
}

/// Selects which field the compositor produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    /// Averaged `(iterations, z)` cells for distance post-processing.
    Raw,
    /// Smoothly shaded color cells.
    Color,
}

/// A computed field, tagged by the mode that produced it.
#[derive(Clone, Debug)]
pub enum Field {
    /// Output of a raw-mode render.
    Raw(Grid<EscapeCell>),
    /// Output of a color-mode render.
    Color(Grid<ColorCell>),
}

/// Uniform jitter within one grid cell, held as an offset
/// distribution per axis beside its own seeded generator.
struct CellJitter {
    re: Uniform<f64>,
    im: Uniform<f64>,
    rng: StdRng,
}

impl CellJitter {
    fn new(step: (f64, f64), seed: u64) -> CellJitter {
        CellJitter {
            re: Uniform::new(0.0, step.0),
            im: Uniform::new(0.0, step.1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn get(&mut self) -> (f64, f64) {
        (self.re.sample(&mut self.rng), self.im.sample(&mut self.rng))
    }
}

/// Drives the evaluator over a whole grid.  Construction validates
/// the geometry; after that every render method is infallible and the
/// object can be reused for as many renders as the caller likes.
pub struct Compositor {
    width: usize,
    height: usize,
    window: SampleWindow,
    maxiter: u32,
    aa: u32,
    seed: u64,
}

impl Compositor {
    /// Requires the grid dimensions, the sample window, the iteration
    /// cap, the per-cell sample count, and the jitter seed.  With
    /// `aa == 1` the cell origin is sampled exactly and the seed is
    /// irrelevant; with `aa >= 2` each cell gets `aa` uniformly
    /// jittered points from a generator reseeded per row, so equal
    /// seeds give equal grids no matter how many threads render them.
    pub fn new(
        width: usize,
        height: usize,
        window: SampleWindow,
        maxiter: u32,
        aa: u32,
        seed: u64,
    ) -> Result<Compositor, String> {
        if width == 0 || height == 0 {
            return Err("The grid must have a positive width and height.".to_string());
        }
        if aa < 1 {
            return Err("At least one sample per cell is required.".to_string());
        }
        Ok(Compositor {
            width,
            height,
            window,
            maxiter,
            aa,
            seed,
        })
    }

    /// Renders in the requested mode.  `threads` of 1 (or 0) stays on
    /// the calling thread; anything larger fans rows out over that
    /// many scoped workers.
    pub fn compute(&self, mode: Mode, threads: usize, progress: &dyn Progress) -> Field {
        match mode {
            Mode::Raw => Field::Raw(if threads > 1 {
                self.raw_threaded(threads, progress)
            } else {
                self.raw(progress)
            }),
            Mode::Color => Field::Color(if threads > 1 {
                self.color_threaded(threads, progress)
            } else {
                self.color(progress)
            }),
        }
    }

    /// Single-threaded raw render.
    pub fn raw(&self, progress: &dyn Progress) -> Grid<EscapeCell> {
        self.map_rows_single(progress, |py| self.raw_row(py))
    }

    /// Raw render over `threads` workers.
    pub fn raw_threaded(&self, threads: usize, progress: &dyn Progress) -> Grid<EscapeCell> {
        self.map_rows(threads, progress, |py| self.raw_row(py))
    }

    /// Single-threaded color render.
    pub fn color(&self, progress: &dyn Progress) -> Grid<ColorCell> {
        self.map_rows_single(progress, |py| self.color_row(py))
    }

    /// Color render over `threads` workers.
    pub fn color_threaded(&self, threads: usize, progress: &dyn Progress) -> Grid<ColorCell> {
        self.map_rows(threads, progress, |py| self.color_row(py))
    }

    /// One sample point inside cell `(px, py)`.
    fn sample_point(&self, px: usize, py: usize, jitter: &mut CellJitter) -> Complex<f64> {
        let origin = self.window.cell_origin(px, py);
        if self.aa == 1 {
            origin
        } else {
            let (dre, dim) = jitter.get();
            Complex::new(origin.re + dre, origin.im + dim)
        }
    }

    fn row_jitter(&self, py: usize) -> CellJitter {
        CellJitter::new(self.window.step(), self.seed.wrapping_add(py as u64))
    }

    fn raw_row(&self, py: usize) -> Vec<EscapeCell> {
        let mut jitter = self.row_jitter(py);
        (0..self.width)
            .map(|px| {
                let mut iter_acc = 0.0;
                let mut z_acc = Complex::new(0.0, 0.0);
                for _ in 0..self.aa {
                    let c = self.sample_point(px, py, &mut jitter);
                    let (iter, z) = mandelbrot(c, self.maxiter);
                    iter_acc += iter as f64;
                    z_acc = z_acc + z;
                }
                EscapeCell {
                    iter: iter_acc / (self.aa as f64),
                    z: z_acc / (self.aa as f64),
                }
            })
            .collect()
    }

    fn color_row(&self, py: usize) -> Vec<ColorCell> {
        let mut jitter = self.row_jitter(py);
        (0..self.width)
            .map(|px| {
                let mut acc = Rgb::default();
                let mut smooth_acc = 0.0;
                for _ in 0..self.aa {
                    let c = self.sample_point(px, py, &mut jitter);
                    let (iter, z) = mandelbrot(c, self.maxiter);
                    // In-set samples contribute nothing; see ColorCell.
                    if iter < self.maxiter {
                        let smooth = smooth_fraction(iter, z, self.maxiter);
                        let rgb = shade(smooth);
                        acc.r += rgb.r;
                        acc.g += rgb.g;
                        acc.b += rgb.b;
                        smooth_acc += smooth;
                    }
                }
                let aa = self.aa as f64;
                ColorCell {
                    color: Rgb {
                        r: acc.r / aa,
                        g: acc.g / aa,
                        b: acc.b / aa,
                    },
                    smooth: smooth_acc / aa,
                }
            })
            .collect()
    }

    fn map_rows_single<T, F>(&self, progress: &dyn Progress, row: F) -> Grid<T>
    where
        F: Fn(usize) -> Vec<T>,
    {
        let mut cells = Vec::with_capacity(self.width * self.height);
        for py in 0..self.height {
            cells.extend(row(py));
            progress.report((((py + 1) * 100) / self.height) as u32);
        }
        Grid::from_cells(self.width, self.height, cells)
    }

    /// The parallel map over rows.  Workers pull the next row index
    /// from a shared queue, so uneven rows (deep in-set regions cost
    /// `maxiter` iterations per sample) balance themselves out.
    fn map_rows<T, F>(&self, threads: usize, progress: &dyn Progress, row: F) -> Grid<T>
    where
        T: Send + 'static,
        F: Fn(usize) -> Vec<T> + Sync,
    {
        let queue: RowQueue = Arc::new(Mutex::new(0..self.height));
        let counter = AtomicUsize::new(0);
        let height = self.height;
        let mut rows: Vec<(usize, Vec<T>)> = vec![];
        crossbeam::scope(|spawner| {
            let row = &row;
            let counter = &counter;
            let handles: Vec<ScopedJoinHandle<Vec<(usize, Vec<T>)>>> = (0..threads)
                .map(|_| {
                    let queue = queue.clone();
                    spawner.spawn(move |_| {
                        let mut done: Vec<(usize, Vec<T>)> = vec![];
                        loop {
                            let py = { queue.lock().unwrap().next() };
                            match py {
                                Some(py) => {
                                    done.push((py, row(py)));
                                    let finished = counter.fetch_add(1, Ordering::SeqCst) + 1;
                                    progress.report(((finished * 100) / height) as u32);
                                }
                                None => {
                                    break;
                                }
                            }
                        }
                        done
                    })
                })
                .collect();
            rows = handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .flatten()
                .collect();
        })
        .unwrap();
        rows.sort_by_key(|r| r.0);
        let cells = rows.into_iter().flat_map(|r| r.1).collect();
        Grid::from_cells(self.width, self.height, cells)
    }
}
