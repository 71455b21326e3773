#[macro_use]
extern crate criterion;
extern crate mandelbrot;

use criterion::Criterion;
use mandelbrot::{pixelate, render, ColorMode, RenderParameters, Viewport};

fn single_threaded(c: &mut Criterion) {
    let params = RenderParameters::new(200, 200, 250).unwrap();
    c.bench_function("render 200x200 single", move |b| {
        b.iter(|| render(&params, &Viewport::default()).unwrap())
    });
}

fn threaded(c: &mut Criterion) {
    let params = RenderParameters::new(200, 200, 250).unwrap().with_threads(4);
    c.bench_function("render 200x200 threaded", move |b| {
        b.iter(|| render(&params, &Viewport::default()).unwrap())
    });
}

fn coloring(c: &mut Criterion) {
    let params = RenderParameters::new(200, 200, 250).unwrap();
    let grid = render(&params, &Viewport::default()).unwrap();
    c.bench_function("pixelate 200x200 rgb", move |b| {
        b.iter(|| pixelate(&grid, 250, ColorMode::Rgb).unwrap())
    });
}

criterion_group!(benches, single_threaded, threaded, coloring);
criterion_main!(benches);
