use std::thread;

use saavy_waves::dsp::math::{f32_to_q31, q31_to_f32};
use saavy_waves::osc::{ChangeFlags, Param, ParamId};
use saavy_waves::wave::bank::{WaveSelector, WaveSlot};
use saavy_waves::wave::WaveTable;
use saavy_waves::{EqualTemperament, MorphOsc, OscInput, Pitch, WaveBank};

/// Serves a single table per slot.
struct FlatBank {
    primary: WaveTable,
    secondary: WaveTable,
    sub: WaveTable,
}

impl FlatBank {
    fn new(primary: f32, secondary: f32, sub: f32) -> Self {
        Self {
            primary: WaveTable::constant(primary),
            secondary: WaveTable::constant(secondary),
            sub: WaveTable::constant(sub),
        }
    }
}

impl WaveSelector for FlatBank {
    fn wave_count(&self, _slot: WaveSlot) -> usize {
        1
    }

    fn select(&self, slot: WaveSlot, index: u8) -> Option<&WaveTable> {
        (index == 0).then_some(match slot {
            WaveSlot::Primary => &self.primary,
            WaveSlot::Secondary => &self.secondary,
            WaveSlot::Sub => &self.sub,
        })
    }
}

fn input(note: u8) -> OscInput {
    OscInput::new(Pitch::new(note, 0))
}

fn dry<W: WaveSelector>(bank: &W) -> MorphOsc<'_, W> {
    let mut osc = MorphOsc::new(bank, EqualTemperament::new()).with_seed(7);
    let (pre, post) = osc.filters_mut();
    pre.set_identity();
    post.set_identity();
    osc
}

#[test]
fn constant_tables_yield_clipped_unity() {
    let bank = FlatBank::new(1.0, 1.0, 1.0);
    let mut osc = dry(&bank);
    osc.controller().set(Param::SubMix, 0.0);

    let mut out = [0i32; 4];
    osc.render(&input(69), &mut out);

    assert_eq!(out, [f32_to_q31(0.875); 4]);
}

#[test]
fn half_shape_averages_the_morph_sources() {
    let bank = FlatBank::new(0.2, 0.6, 0.0);
    let mut osc = dry(&bank);
    let ctl = osc.controller();
    ctl.set(Param::SubMix, 0.0);
    ctl.set(Param::Shape, 0.5);

    let mut out = [0.0f32; 8];
    osc.render_f32(&input(60), &mut out);

    let sig = 0.4f32;
    let expected = sig - 0.125 * sig * sig * sig;
    for y in out {
        assert!((y - expected).abs() < 1e-6, "{} != {}", y, expected);
    }
}

#[test]
fn full_ringmix_multiplies_by_sub() {
    let bank = FlatBank::new(0.5, 0.5, 0.5);
    let mut osc = dry(&bank);
    let ctl = osc.controller();
    ctl.set(Param::SubMix, 0.0);
    ctl.set(Param::RingMix, 1.0);

    let mut out = [0.0f32; 8];
    osc.render_f32(&input(60), &mut out);

    let sig = 0.25f32;
    let expected = sig - 0.125 * sig * sig * sig;
    for y in out {
        assert!((y - expected).abs() < 1e-6);
    }
}

#[test]
fn output_stays_in_range_under_full_drive() {
    let bank = WaveBank::new();
    let mut osc = MorphOsc::new(&bank, EqualTemperament::new());
    let ctl = osc.controller();
    ctl.set_parameter(ParamId::Id4.index(), 100);
    ctl.set_parameter(ParamId::Id5.index(), 100);
    ctl.set_parameter(ParamId::Id6.index(), 100);
    ctl.set_parameter(ParamId::Shape.index(), 700);

    let mut out = [0.0f32; 512];
    for note in [24u8, 60, 96, 127, 151, 255] {
        osc.render_f32(&input(note).with_shape_lfo(1.0), &mut out);
        for y in out {
            assert!(y.is_finite());
            assert!(y.abs() <= 1.0, "note {}: {}", note, y);
        }
    }
}

#[test]
fn phases_stay_normalized_across_blocks() {
    let bank = WaveBank::new();
    let mut osc = MorphOsc::new(&bank, EqualTemperament::new());
    osc.controller().set(Param::ShiftShape, 1.0);

    let mut out = [0i32; 64];
    for _ in 0..200 {
        osc.render(&input(150), &mut out);
        let (phi0, phi1, phisub) = osc.state().phases();
        for phi in [phi0, phi1, phisub] {
            assert!((0.0..1.0).contains(&phi), "phase {}", phi);
        }
    }
}

#[test]
fn note_on_realigns_phases_at_next_block() {
    let bank = WaveBank::new();
    let mut osc = MorphOsc::new(&bank, EqualTemperament::new());
    let mut out = [0i32; 32];
    osc.render(&input(69), &mut out);
    assert!(osc.state().phases().0 > 0.0);

    osc.note_on(&input(69));
    assert!(osc.controller().pending().contains(ChangeFlags::RESET));

    let mut one = [0i32; 1];
    osc.render(&input(69), &mut one);

    // Reset happens before the sample is produced, so exactly one
    // increment has been added since.
    let (w00, w01, w0sub) = osc.state().increments();
    let (phi0, phi1, phisub) = osc.state().phases();
    assert!((phi0 - w00).abs() < 1e-7);
    assert!((phi1 - w01).abs() < 1e-7);
    assert!((phisub - w0sub).abs() < 1e-7);
}

#[test]
fn zero_bitcrush_bypasses_quantizer() {
    let bank = WaveBank::new();
    let mut osc = MorphOsc::new(&bank, EqualTemperament::new());
    let ctl = osc.controller();
    ctl.set(Param::BitCrush, 0.8);
    let mut out = [0i32; 16];
    osc.render(&input(60), &mut out);
    assert!(osc.state().crusher().bitres() > 1.0);

    ctl.set_parameter(ParamId::Id6.index(), 0);
    osc.render(&input(60), &mut out);
    assert_eq!(osc.state().crusher().bitres(), 1.0);
    assert_eq!(osc.state().crusher().dither(), 0.0);
}

#[test]
fn pitch_increment_grows_with_note() {
    let bank = WaveBank::new();
    let mut osc = MorphOsc::new(&bank, EqualTemperament::new());
    let mut out = [0i32; 1];
    let mut prev = 0.0;
    for note in 0..=151u8 {
        osc.render(&input(note), &mut out);
        let (w00, w01, w0sub) = osc.state().increments();
        // The top of the table saturates at the frequency ceiling
        if note < 130 {
            assert!(w00 > prev, "note {}", note);
        } else {
            assert!(w00 >= prev, "note {}", note);
        }
        assert!(w00 > 0.0 && w01 > 0.0 && w0sub > 0.0);
        assert!(w00 < 0.5);
        prev = w00;
    }
}

#[test]
fn shape_lfo_ramp_reaches_target() {
    let bank = WaveBank::new();
    let mut osc = MorphOsc::new(&bank, EqualTemperament::new());
    let lfo = input(60).with_shape_lfo(-0.5);
    let mut out = [0i32; 64];
    osc.render(&lfo, &mut out);

    assert!((osc.state().lfo() - q31_to_f32(lfo.shape_lfo)).abs() < 1e-6);
    assert!((osc.state().lfoz() - osc.state().lfo()).abs() < 1e-5);
}

#[test]
fn controller_drives_osc_from_another_thread() {
    let bank = WaveBank::new();
    let mut osc = MorphOsc::new(&bank, EqualTemperament::new());
    let ctl = osc.controller();

    let handle = thread::spawn(move || {
        for i in 0..100u16 {
            ctl.set_parameter(ParamId::Id1.index(), i);
            ctl.set_parameter(ParamId::Shape.index(), i * 10);
            ctl.set_parameter(ParamId::Id6.index(), i % 101);
        }
        ctl.note_on(&OscInput::default());
    });

    let mut out = [0.0f32; 64];
    for _ in 0..50 {
        osc.render_f32(&input(57), &mut out);
        assert!(out.iter().all(|y| y.abs() <= 1.0));
    }
    handle.join().unwrap();

    osc.render_f32(&input(57), &mut out);
    let params = osc.params();
    assert_eq!(params.wave0, 99 % 46);
    assert!((params.shape - 990.0 / 1023.0).abs() < 1e-6);
    assert!(osc.controller().pending().is_empty());
}
