extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate mandelbrot;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use mandelbrot::{render_to_file, ColorMode, Projection, RenderParameters, Viewport};
use num::Complex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Splits "1024x768" or "-2.0,1.5" on the separator and parses both
/// halves; None if either half doesn't parse.
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

/// A viewport corner, written re,im.
fn parse_corner(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

fn validate_corner(s: &str, err: &str) -> Result<(), String> {
    parse_corner(s).map(|_| ()).ok_or_else(|| err.to_string())
}

/// Clap validator for integer options bounded on both sides.
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
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const COLOR: &str = "color";
const PROJECTION: &str = "projection";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandelbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Escape-time Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file; its directory is created if missing"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1024x1024")
                .validator(|s| match parse_pair::<u32>(&s, 'x') {
                    Some((w, h)) if w > 0 && h > 0 => Ok(()),
                    Some(_) => Err("Output image size must be at least 1x1".to_string()),
                    None => Err("Could not parse output image size".to_string()),
                })
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.0,-1.5")
                .validator(|s| validate_corner(&s, "Could not parse xmin,ymin corner"))
                .help("xmin,ymin corner of the viewport"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.0,1.5")
                .validator(|s| validate_corner(&s, "Could not parse xmax,ymax corner"))
                .help("xmax,ymax corner of the viewport"),
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
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("500")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        u32::max_value(),
                        "Could not parse iteration count",
                        "Iteration count must be at least 1",
                    )
                })
                .help("Maximum iterations per point"),
        )
        .arg(
            Arg::with_name(COLOR)
                .required(false)
                .long(COLOR)
                .short("c")
                .takes_value(true)
                .possible_values(&["gray", "rgb"])
                .default_value("gray")
                .help("gray: count mod 256, one channel; rgb: count scaled to 0-255, three channels"),
        )
        .arg(
            Arg::with_name(PROJECTION)
                .required(false)
                .long(PROJECTION)
                .short("p")
                .takes_value(true)
                .possible_values(&["corner", "centered"])
                .default_value("corner")
                .help("Map pixel 0,0 onto the xmin,ymin corner, or the middle pixel onto the center"),
        )
        .get_matches()
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    // Validators have already vetted every value below.
    let (width, height) = parse_pair::<u32>(matches.value_of(SIZE).unwrap_or_default(), 'x')
        .ok_or("Error parsing image dimensions")?;
    let leftlower = parse_corner(matches.value_of(LEFTLOWER).unwrap_or_default())
        .ok_or("Error parsing xmin,ymin corner")?;
    let rightupper = parse_corner(matches.value_of(RIGHTUPPER).unwrap_or_default())
        .ok_or("Error parsing xmax,ymax corner")?;
    let threads = usize::from_str(matches.value_of(THREADS).unwrap_or_default())
        .map_err(|_| "Could not parse thread count.")?;
    let iterations = u32::from_str(matches.value_of(ITERATIONS).unwrap_or_default())
        .map_err(|_| "Could not parse iteration count.")?;
    let color_mode = match matches.value_of(COLOR) {
        Some("rgb") => ColorMode::Rgb,
        _ => ColorMode::Grayscale,
    };
    let projection = match matches.value_of(PROJECTION) {
        Some("centered") => Projection::Centered,
        _ => Projection::Corner,
    };

    let viewport = Viewport::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im)
        .map_err(|e| e.to_string())?;
    let params = RenderParameters::new(width as usize, height as usize, iterations)
        .map_err(|e| e.to_string())?
        .with_color_mode(color_mode)
        .with_projection(projection)
        .with_threads(threads);

    let output = Path::new(matches.value_of(OUTPUT).unwrap_or_default());
    if let Some(dir) = output.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Could not create {}: {}", dir.display(), e))?;
        }
    }

    let stats = render_to_file(&params, &viewport, output).map_err(|e| e.to_string())?;
    debug!("{} of {} pixels escaped", stats.escaped, width as u64 * height as u64);
    println!("Image saved as {}", output.display());
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
