extern crate clap;
extern crate failure;
extern crate fracfield;
extern crate image;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::{err_msg, Error};
use fracfield::{
    distance, to_rgb8, Algorithm, Compositor, DistanceField, SampleWindow, StderrProgress,
};
use image::png::PNGEncoder;
use image::ColorType;
use num::{clamp, Complex};
use std::fs::File;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const WIDTH: &str = "width";
const ITERATIONS: &str = "iterations";
const SAMPLES: &str = "samples";
const THREADS: &str = "threads";
const SEED: &str = "seed";
const KIND: &str = "kind";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("frac")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Escape-time fractal field renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("200x200")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .default_value("-0.0140625,0.7154296875")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse window center"))
                .help("Center of the sampling window on the complex plane"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .required(false)
                .long(WIDTH)
                .short("w")
                .takes_value(true)
                .default_value("0.005859375")
                .validator(|s| match f64::from_str(&s) {
                    Ok(w) if w > 0.0 => Ok(()),
                    Ok(_) => Err("The window width must be strictly positive".to_string()),
                    Err(_) => Err("Could not parse window width".to_string()),
                })
                .help("Real-axis width of the sampling window"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 100000",
                    )
                })
                .help("Iteration cap per sample"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .required(false)
                .long(SAMPLES)
                .short("a")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        4096,
                        "Could not parse sample count",
                        "Sample count must be between 1 and 4096",
                    )
                })
                .help("Anti-aliasing samples per cell"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(SEED)
                .required(false)
                .long(SEED)
                .takes_value(true)
                .default_value("0")
                .validator(|s| match u64::from_str(&s) {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Could not parse jitter seed".to_string()),
                })
                .help("Seed for the anti-aliasing jitter"),
        )
        .arg(
            Arg::with_name(KIND)
                .required(false)
                .long(KIND)
                .short("k")
                .takes_value(true)
                .default_value("color")
                .possible_values(&["color", "flood", "euclid"])
                .help("Output kind: shaded colors, or a distance field by either algorithm"),
        )
        .get_matches()
}

fn write_png(outfile: &str, pixels: &[u8], bounds: (usize, usize), color: ColorType) -> Result<(), Error> {
    let output = File::create(outfile)?;
    PNGEncoder::new(output).encode(pixels, bounds.0 as u32, bounds.1 as u32, color)?;
    Ok(())
}

/// Normalizes distances against the field's own maximum; a field with
/// no spread comes out black.
fn graymap<I>(values: I, max: f64) -> Vec<u8>
where
    I: Iterator<Item = f64>,
{
    values
        .map(|d| {
            if max > 0.0 {
                clamp(d * 255.0 / max, 0.0, 255.0) as u8
            } else {
                0
            }
        })
        .collect()
}

fn run() -> Result<(), Error> {
    let matches = args();
    let (iw, ih) = parse_pair::<usize>(matches.value_of(SIZE).unwrap(), 'x')
        .ok_or_else(|| err_msg("Error parsing image dimensions"))?;
    let center = parse_complex(matches.value_of(CENTER).unwrap())
        .ok_or_else(|| err_msg("Error parsing window center"))?;
    let width = f64::from_str(matches.value_of(WIDTH).unwrap())?;
    let maxiter = u32::from_str(matches.value_of(ITERATIONS).unwrap())?;
    let aa = u32::from_str(matches.value_of(SAMPLES).unwrap())?;
    let threads = usize::from_str(matches.value_of(THREADS).unwrap())?;
    let seed = u64::from_str(matches.value_of(SEED).unwrap())?;

    let window = SampleWindow::centered(center, width, iw, ih).map_err(err_msg)?;
    let compositor = Compositor::new(iw, ih, window, maxiter, aa, seed).map_err(err_msg)?;
    let progress = StderrProgress::new();

    match matches.value_of(KIND).unwrap() {
        "color" => {
            let grid = compositor.color_threaded(threads, &progress);
            eprintln!();
            write_png(
                matches.value_of(OUTPUT).unwrap(),
                &to_rgb8(&grid),
                (iw, ih),
                ColorType::RGB(8),
            )
        }
        kind => {
            let algorithm = if kind == "flood" {
                Algorithm::FloodFill
            } else {
                Algorithm::BruteForce
            };
            let raw = compositor.raw_threaded(threads, &progress);
            eprintln!();
            let pixels = match distance(&raw, maxiter, algorithm).map_err(err_msg)? {
                DistanceField::FloodFill { cells, rings } => {
                    graymap(cells.cells().iter().map(|&d| d as f64), rings as f64)
                }
                DistanceField::BruteForce { cells, max } => {
                    graymap(cells.cells().iter().cloned(), max)
                }
            };
            write_png(
                matches.value_of(OUTPUT).unwrap(),
                &pixels,
                (iw, ih),
                ColorType::Gray(8),
            )
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
