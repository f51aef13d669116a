//! Benchmarks for interpolated wavetable reads.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_waves::wave::bank::{WaveSelector, WaveSlot};
use saavy_waves::WaveBank;

use crate::BLOCK_SIZES;

pub fn bench_wavetable(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/wavetable");
    let bank = WaveBank::new();
    let Some(table) = bank.select(WaveSlot::Primary, 15) else {
        return;
    };
    let w0 = 440.0 / 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut phase = 0.0f32;

        group.bench_with_input(BenchmarkId::new("scan", size), &size, |b, _| {
            b.iter(|| {
                for y in buffer.iter_mut() {
                    *y = table.scan(black_box(phase));
                    phase += w0;
                    phase -= phase.trunc();
                }
            })
        });
    }

    group.finish();
}
