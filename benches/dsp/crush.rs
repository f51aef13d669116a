//! Benchmarks for the dithered bit-crusher.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_waves::dsp::{BitCrusher, WhiteNoise};

use crate::BLOCK_SIZES;

pub fn bench_crush(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/crush");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut buffer = input.clone();

        for (name, amount) in [("bypass", 0.0), ("half", 0.5), ("full", 1.0)] {
            let mut crusher = BitCrusher::new();
            crusher.set_amount(amount);
            let mut noise = WhiteNoise::default();

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    for x in buffer.iter_mut() {
                        *x = crusher.process(black_box(*x), noise.next_sample());
                    }
                })
            });
        }
    }

    group.finish();
}
