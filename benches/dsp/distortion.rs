//! Benchmarks for the output clippers.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_waves::dsp::distortion;

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sine-like values)
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin() * 1.5).collect();

        // Cubic soft clip
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("soft_clip", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                distortion::soft_clip_buffer(black_box(&mut buffer), black_box(0.125));
            })
        });

        // Hard clip, per sample
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("hard_clip", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for x in buffer.iter_mut() {
                    *x = distortion::hard_clip(black_box(*x), 1.0);
                }
            })
        });
    }

    group.finish();
}
