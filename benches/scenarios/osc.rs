//! Benchmarks for full oscillator render blocks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_waves::osc::{Param, ParamId};
use saavy_waves::{EqualTemperament, MorphOsc, OscInput, Pitch, WaveBank};

use crate::BLOCK_SIZES;

pub fn bench_osc(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/osc");
    let bank = WaveBank::new();
    let input = OscInput::new(Pitch::new(45, 0)).with_shape_lfo(0.25); // A2

    for &size in BLOCK_SIZES {
        let mut out = vec![0i32; size];

        // === DEFAULT PATCH ===
        // Baseline: defaults, quantizer bypassed
        let mut plain = MorphOsc::new(&bank, EqualTemperament::new());
        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| {
                plain.render(black_box(&input), black_box(&mut out));
            })
        });

        // === DIRTY PATCH ===
        // Ring mod, heavy crush and a mid morph
        let mut dirty = MorphOsc::new(&bank, EqualTemperament::new());
        let ctl = dirty.controller();
        ctl.set_parameter(ParamId::Id2.index(), 20);
        ctl.set(Param::RingMix, 0.6);
        ctl.set(Param::BitCrush, 0.7);
        ctl.set(Param::Shape, 0.5);
        group.bench_with_input(BenchmarkId::new("dirty", size), &size, |b, _| {
            b.iter(|| {
                dirty.render(black_box(&input), black_box(&mut out));
            })
        });

        // === CONTROL CHURN ===
        // A knob moving every block, so flags are always pending
        let mut churn = MorphOsc::new(&bank, EqualTemperament::new());
        let ctl = churn.controller();
        let mut knob = 0u16;
        group.bench_with_input(BenchmarkId::new("churn", size), &size, |b, _| {
            b.iter(|| {
                knob = (knob + 37) % 1024;
                ctl.set_parameter(ParamId::Shape.index(), knob);
                ctl.set_parameter(ParamId::Id6.index(), knob % 101);
                churn.render(black_box(&input), black_box(&mut out));
            })
        });

        // === FLOAT OUTPUT ===
        let mut float = MorphOsc::new(&bank, EqualTemperament::new());
        let mut out_f32 = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("render_f32", size), &size, |b, _| {
            b.iter(|| {
                float.render_f32(black_box(&input), black_box(&mut out_f32));
            })
        });
    }

    group.finish();
}
