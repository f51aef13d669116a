//! Benchmarks for the one-pole lowpass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_waves::dsp::filter::OnePole;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Plain pole, as used ahead of the crusher
        let mut filter = OnePole::with_pole(0.8);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("pole", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // Bilinear lowpass near Nyquist
        let mut filter = OnePole::with_cutoff(0.45);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("bilinear", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
