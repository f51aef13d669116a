//! Single-cycle wavetables.
//!
//! A [`WaveTable`] holds one period of a waveform in `WAVE_SIZE` samples plus
//! a guard sample equal to the first, so linear interpolation never has to
//! wrap its upper index.

pub mod bank;

use crate::dsp::math::lerp;

pub const WAVE_SIZE_EXP: usize = 7;
pub const WAVE_SIZE: usize = 1 << WAVE_SIZE_EXP;
pub const WAVE_MASK: usize = WAVE_SIZE - 1;
pub const WAVE_LUT_SIZE: usize = WAVE_SIZE + 1;

#[derive(Debug, Clone, PartialEq)]
pub struct WaveTable {
    samples: [f32; WAVE_LUT_SIZE],
}

/// All-zero table. Used wherever a reference is needed before a bank has
/// resolved anything.
pub static SILENCE: WaveTable = WaveTable::constant(0.0);

impl WaveTable {
    pub const fn constant(value: f32) -> Self {
        Self {
            samples: [value; WAVE_LUT_SIZE],
        }
    }

    /// Build from one period; the guard sample is filled in.
    pub fn from_cycle(cycle: &[f32; WAVE_SIZE]) -> Self {
        let mut samples = [0.0; WAVE_LUT_SIZE];
        samples[..WAVE_SIZE].copy_from_slice(cycle);
        samples[WAVE_SIZE] = cycle[0];
        Self { samples }
    }

    /// Build by sampling `f(phase)` at `WAVE_SIZE` evenly spaced phases in [0, 1).
    pub fn from_fn(mut f: impl FnMut(f32) -> f32) -> Self {
        let mut cycle = [0.0; WAVE_SIZE];
        for (i, sample) in cycle.iter_mut().enumerate() {
            *sample = f(i as f32 / WAVE_SIZE as f32);
        }
        Self::from_cycle(&cycle)
    }

    /// Scale so the largest magnitude is 1. Silent tables are left alone.
    pub fn normalized(mut self) -> Self {
        let peak = self.samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        if peak > 0.0 {
            for sample in self.samples.iter_mut() {
                *sample /= peak;
            }
        }
        self
    }

    /// One period, without the guard sample.
    pub fn cycle(&self) -> &[f32] {
        &self.samples[..WAVE_SIZE]
    }

    /// Linearly interpolated read at normalized `phase`. Any non-negative
    /// phase is accepted; the integer part is discarded.
    #[inline]
    pub fn scan(&self, phase: f32) -> f32 {
        let p = phase - phase.trunc();
        let x0f = p * WAVE_SIZE as f32;
        let x0 = (x0f as usize) & WAVE_MASK;
        let fr = x0f - x0f.trunc();
        lerp(fr, self.samples[x0], self.samples[x0 + 1])
    }
}

impl Default for WaveTable {
    fn default() -> Self {
        Self::constant(0.0)
    }
}
