use crate::dsp::crush::BitCrusher;
use crate::wave::{WaveTable, SILENCE};
use crate::SAMPLE_RATE_RECIP;

/// 440 Hz at the host rate.
pub const DEFAULT_W0: f32 = 440.0 * SAMPLE_RATE_RECIP;
/// 220 Hz at the host rate, one octave down for the sub.
pub const DEFAULT_W0_SUB: f32 = 220.0 * SAMPLE_RATE_RECIP;

/// Per-voice render state. Written only by the render path.
#[derive(Debug, Clone)]
pub struct OscState<'a> {
    pub(crate) wave0: &'a WaveTable,
    pub(crate) wave1: &'a WaveTable,
    pub(crate) subwave: &'a WaveTable,
    pub(crate) phi0: f32,
    pub(crate) phi1: f32,
    pub(crate) phisub: f32,
    pub(crate) w00: f32,
    pub(crate) w01: f32,
    pub(crate) w0sub: f32,
    /// LFO target for the end of the current block
    pub(crate) lfo: f32,
    /// Smoothed LFO, ramps toward `lfo` across each block
    pub(crate) lfoz: f32,
    pub(crate) crusher: BitCrusher,
    /// Fixed pitch offset in cycles/sample, drawn once per instance
    imperfection: f32,
}

impl<'a> OscState<'a> {
    pub fn new(imperfection: f32) -> Self {
        Self {
            wave0: &SILENCE,
            wave1: &SILENCE,
            subwave: &SILENCE,
            phi0: 0.0,
            phi1: 0.0,
            phisub: 0.0,
            w00: DEFAULT_W0,
            w01: DEFAULT_W0,
            w0sub: DEFAULT_W0_SUB,
            lfo: 0.0,
            lfoz: 0.0,
            crusher: BitCrusher::new(),
            imperfection,
        }
    }

    /// Back to defaults, keeping the wave references and the imperfection.
    pub(crate) fn restore_defaults(&mut self) {
        let (wave0, wave1, subwave) = (self.wave0, self.wave1, self.subwave);
        *self = Self {
            wave0,
            wave1,
            subwave,
            ..Self::new(self.imperfection)
        };
    }

    /// Realign phases for a retrigger. The LFO ramp restarts from where the
    /// smoothed value currently sits.
    pub fn reset(&mut self) {
        self.phi0 = 0.0;
        self.phi1 = 0.0;
        self.phisub = 0.0;
        self.lfo = self.lfoz;
    }

    /// `(phi0, phi1, phisub)`
    pub fn phases(&self) -> (f32, f32, f32) {
        (self.phi0, self.phi1, self.phisub)
    }

    /// `(w00, w01, w0sub)` in cycles/sample
    pub fn increments(&self) -> (f32, f32, f32) {
        (self.w00, self.w01, self.w0sub)
    }

    pub fn lfo(&self) -> f32 {
        self.lfo
    }

    pub fn lfoz(&self) -> f32 {
        self.lfoz
    }

    pub fn crusher(&self) -> &BitCrusher {
        &self.crusher
    }

    pub fn imperfection(&self) -> f32 {
        self.imperfection
    }

    pub fn waves(&self) -> (&'a WaveTable, &'a WaveTable, &'a WaveTable) {
        (self.wave0, self.wave1, self.subwave)
    }
}
