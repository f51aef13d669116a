//! Morphing wavetable oscillator.

pub mod control;
pub mod params;
pub mod state;

use std::sync::Arc;

use crate::dsp::distortion::{hard_clip, soft_clip};
use crate::dsp::filter::OnePole;
use crate::dsp::math::{f32_to_q31, q31_to_f32, wrap_phase};
use crate::dsp::noise::WhiteNoise;
use crate::pitch::{EqualTemperament, Pitch, PitchMap};
use crate::wave::bank::{WaveBank, WaveSelector, WaveSlot};
use crate::wave::WaveTable;

pub use control::{ChangeFlags, Controller};
pub use params::{Param, ParamId, Params};
pub use state::OscState;

use control::ControlState;

/*
Signal Chain
============

Three wavetable oscillators feed one mono output:

    wave0 (phi0) ──┐
                   ├─ morph(shape + lfo) ─┐
    wave1 (phi1) ──┘                      ├─ submix ─ ringmix ─ clip ─┐
    subwave (phisub, one octave down) ────┘                           │
                                                                      │
    ┌─────────────────────────────────────────────────────────────────┘
    └─ pre LPF ─ + dither ─ quantize ─ post LPF ─ soft clip ─ out

    morph     (1 - m) * w0 + m * w1, m clamped to [0.005, 0.995]
    submix    (1 - s) * sig + s * sub
    ringmix   (1 - r) * sig + r * (sub * sig)
    pre LPF   one pole at 0.8, tames wavetable aliasing
    quantize  bit-crush, bypassed at amount 0
    post LPF  bilinear one pole at 0.45 fs, smooths the crush staircase
    soft clip x - 0.125 x^3

The second oscillator runs a hair sharp (0.25 Hz * drift) and the sub a
hair off its octave (0.15 Hz * drift), so the three phases slowly walk
against each other; shift-shape sets the drift. On top of that every
instance carries a fixed random detune of up to +/-0.05 Hz, the way no two
analog voices are ever quite in tune.

Block structure:

    render(input, out)
      ├─ drain change flags (once)
      ├─ recompute pitch, reselect flagged waves, retrigger, crush coeffs
      └─ per sample: chain above, advance phases, ramp lfoz toward lfo
*/

/// Lower/upper bound of the morph position. Keeps both tables audible.
const WAVEMIX_MIN: f32 = 0.005;
const WAVEMIX_MAX: f32 = 0.995;

const PRE_LPF_POLE: f32 = 0.8;
const POST_LPF_CUTOFF: f32 = 0.45;
const SOFT_CLIP_CURVE: f32 = 0.125;

const ALT_DRIFT_HZ: f32 = 0.25;
const SUB_DRIFT_HZ: f32 = 0.15;
const IMPERFECTION_HZ: f32 = 0.05;

/// Realtime values the host hands to every callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OscInput {
    /// LFO applied to the shape parameter, Q31
    pub shape_lfo: i32,
    /// Note in the high byte, fine in the low byte
    pub pitch: u16,
    /// Host filter cutoff (0x0000-0x1fff), unused by this unit
    pub cutoff: u16,
    /// Host filter resonance (0x0000-0x1fff), unused by this unit
    pub resonance: u16,
}

impl OscInput {
    pub fn new(pitch: Pitch) -> Self {
        Self {
            pitch: pitch.to_word(),
            ..Self::default()
        }
    }

    /// Set the shape LFO from a float in [-1, 1].
    pub fn with_shape_lfo(mut self, lfo: f32) -> Self {
        self.shape_lfo = f32_to_q31(lfo.clamp(-1.0, 1.0));
        self
    }
}

/// Sample formats the render loop can write.
pub trait OutputSample: Copy {
    fn from_f32(sample: f32) -> Self;
}

impl OutputSample for i32 {
    #[inline]
    fn from_f32(sample: f32) -> Self {
        f32_to_q31(sample)
    }
}

impl OutputSample for f32 {
    #[inline]
    fn from_f32(sample: f32) -> Self {
        sample
    }
}

/// One morphing wavetable voice.
///
/// Borrows its wave bank for `'a`; the bank must outlive the oscillator.
/// Every instance built by `new` seeds its noise source randomly, so voices
/// drift apart; [`MorphOsc::with_seed`] pins the detune for reproducible runs.
/// Control changes go through [`MorphOsc::controller`] (any thread) or the
/// direct `set_parameter`/`note_on`/`note_off` methods (same thread).
pub struct MorphOsc<'a, W: WaveSelector + ?Sized = WaveBank, P: PitchMap = EqualTemperament> {
    state: OscState<'a>,
    /// Parameters committed for the block being rendered
    params: Params,
    prelpf: OnePole,
    postlpf: OnePole,
    noise: WhiteNoise,
    shared: Arc<ControlState>,
    bank: &'a W,
    pitch_map: P,
}

impl<'a, W: WaveSelector + ?Sized, P: PitchMap> MorphOsc<'a, W, P> {
    pub fn new(bank: &'a W, pitch_map: P) -> Self {
        let counts = [
            bank.wave_count(WaveSlot::Primary),
            bank.wave_count(WaveSlot::Secondary),
            bank.wave_count(WaveSlot::Sub),
        ];

        let mut osc = Self {
            state: OscState::new(0.0),
            params: Params::new(),
            prelpf: OnePole::new(),
            postlpf: OnePole::new(),
            noise: WhiteNoise::new(rand::random::<u32>()),
            shared: Arc::new(ControlState::new(counts)),
            bank,
            pitch_map,
        };
        osc.state = OscState::new(osc.draw_imperfection());
        osc.restore_defaults();
        osc
    }

    /// Reseed the noise source and redraw the per-instance detune.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.noise = WhiteNoise::new(seed);
        self.state = OscState::new(self.draw_imperfection());
        self.restore_defaults();
        self
    }

    /// Unit activation. Platform and API ids are negotiated by the host and
    /// only recorded here.
    pub fn init(&mut self, platform: u32, api: u32) {
        log::debug!(
            "morph osc init (platform {:#x}, api {:#x})",
            platform,
            api
        );
        self.restore_defaults();
    }

    /// Cloneable handle for changing parameters from another thread.
    pub fn controller(&self) -> Controller {
        Controller::new(Arc::clone(&self.shared))
    }

    pub fn set_parameter(&self, index: u16, value: u16) {
        self.controller().set_parameter(index, value);
    }

    pub fn note_on(&self, input: &OscInput) {
        self.controller().note_on(input);
    }

    pub fn note_off(&self, input: &OscInput) {
        self.controller().note_off(input);
    }

    pub fn state(&self) -> &OscState<'a> {
        &self.state
    }

    /// Parameters as committed by the last render call.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// `(prelpf, postlpf)`
    pub fn filters_mut(&mut self) -> (&mut OnePole, &mut OnePole) {
        (&mut self.prelpf, &mut self.postlpf)
    }

    /// Render one block of Q31 samples. An empty block does nothing and
    /// leaves staged changes pending.
    pub fn render(&mut self, input: &OscInput, out: &mut [i32]) {
        self.render_into(input, out);
    }

    /// Same chain as [`MorphOsc::render`], writing floats in [-1, 1].
    pub fn render_f32(&mut self, input: &OscInput, out: &mut [f32]) {
        self.render_into(input, out);
    }

    fn render_into<S: OutputSample>(&mut self, input: &OscInput, out: &mut [S]) {
        if out.is_empty() {
            return;
        }

        self.apply_pending(input);

        let s = &self.state;
        let (wave0, wave1, subwave) = (s.wave0, s.wave1, s.subwave);
        let (w00, w01, w0sub) = (s.w00, s.w01, s.w0sub);
        let crusher = s.crusher;
        let mut phi0 = s.phi0;
        let mut phi1 = s.phi1;
        let mut phisub = s.phisub;
        let mut lfoz = s.lfoz;
        let lfo_inc = (s.lfo - lfoz) / out.len() as f32;

        let shape = self.params.shape;
        let submix = self.params.submix;
        let ringmix = self.params.ringmix;

        let prelpf = &mut self.prelpf;
        let postlpf = &mut self.postlpf;
        let noise = &mut self.noise;

        for y in out.iter_mut() {
            let wavemix = (shape + lfoz).clamp(WAVEMIX_MIN, WAVEMIX_MAX);
            let mut sig = (1.0 - wavemix) * wave0.scan(phi0) + wavemix * wave1.scan(phi1);

            let subsig = subwave.scan(phisub);
            sig = (1.0 - submix) * sig + submix * subsig;
            sig = (1.0 - ringmix) * sig + ringmix * (subsig * sig);
            sig = hard_clip(sig, 1.0);

            sig = prelpf.process(sig);
            sig = crusher.process(sig, noise.next_sample());
            sig = postlpf.process(sig);
            sig = soft_clip(sig, SOFT_CLIP_CURVE);

            *y = S::from_f32(sig);

            phi0 = wrap_phase(phi0 + w00);
            phi1 = wrap_phase(phi1 + w01);
            phisub = wrap_phase(phisub + w0sub);
            lfoz += lfo_inc;
        }

        let s = &mut self.state;
        s.phi0 = phi0;
        s.phi1 = phi1;
        s.phisub = phisub;
        s.lfoz = lfoz;
    }

    /// Drain the mailbox and bring derived state up to date for one block.
    fn apply_pending(&mut self, input: &OscInput) {
        let flags = self.shared.drain();
        self.params = self.shared.snapshot();

        let w0 = self.pitch_map.frequency_for_pitch(Pitch::from(input.pitch));
        self.update_pitch(w0);
        self.update_waves(flags);

        if flags.contains(ChangeFlags::RESET) {
            self.state.reset();
        }

        self.state.lfo = q31_to_f32(input.shape_lfo);

        if flags.contains(ChangeFlags::BITCRUSH) {
            self.state.crusher.set_amount(self.params.bitcrush);
        }
    }

    fn update_pitch(&mut self, w0: f32) {
        let w0 = w0 + self.state.imperfection();
        let drift = 1.0 + self.params.shiftshape;
        let sr_recip = 1.0 / self.pitch_map.sample_rate();

        self.state.w00 = w0;
        self.state.w01 = w0 + drift * ALT_DRIFT_HZ * sr_recip;
        self.state.w0sub = 0.5 * w0 + drift * SUB_DRIFT_HZ * sr_recip;
    }

    /// Re-resolve only the flagged slots. An index the bank cannot resolve
    /// keeps the previous table.
    fn update_waves(&mut self, flags: ChangeFlags) {
        let p = self.params;
        let slots = [
            (ChangeFlags::WAVE0, WaveSlot::Primary, p.wave0),
            (ChangeFlags::WAVE1, WaveSlot::Secondary, p.wave1),
            (ChangeFlags::SUBWAVE, WaveSlot::Sub, p.subwave),
        ];
        for (flag, slot, index) in slots {
            if !flags.contains(flag) {
                continue;
            }
            if let Some(table) = self.resolve(slot, index) {
                *self.slot_mut(slot) = table;
            }
        }
    }

    fn resolve(&self, slot: WaveSlot, index: u8) -> Option<&'a WaveTable> {
        let bank: &'a W = self.bank;
        bank.select(slot, index)
    }

    fn slot_mut(&mut self, slot: WaveSlot) -> &mut &'a WaveTable {
        match slot {
            WaveSlot::Primary => &mut self.state.wave0,
            WaveSlot::Secondary => &mut self.state.wave1,
            WaveSlot::Sub => &mut self.state.subwave,
        }
    }

    fn restore_defaults(&mut self) {
        self.shared.restore_defaults();
        self.params = Params::new();
        self.state.restore_defaults();

        for slot in [WaveSlot::Primary, WaveSlot::Secondary, WaveSlot::Sub] {
            match self.resolve(slot, 0) {
                Some(table) => *self.slot_mut(slot) = table,
                None => log::warn!("wave bank has no tables for {:?}, using silence", slot),
            }
        }

        self.prelpf.set_pole_lp(PRE_LPF_POLE);
        self.prelpf.reset();
        self.postlpf.set_cutoff_lp(POST_LPF_CUTOFF);
        self.postlpf.reset();
    }

    fn draw_imperfection(&mut self) -> f32 {
        self.noise.next_sample() * IMPERFECTION_HZ / self.pitch_map.sample_rate()
    }
}
