//! Control-side event handling.
//!
//! Parameter changes and note events may arrive on a different thread than
//! the audio callback. They never touch render state directly: values land in
//! a shared [`Params`] store made of atomics, and anything that needs
//! recomputing raises a bit in a [`ChangeFlags`] mailbox. The render path
//! swaps the mailbox to zero once per block and applies what it finds.
//!
//! ```text
//!   control thread                         audio thread
//!   --------------                         ------------
//!   store value   (relaxed)
//!   flags |= bit  (release)  ──────────▶   bits = flags.swap(0) (acquire)
//!                                          read values (relaxed)
//!                                          recompute for each set bit
//! ```
//!
//! The release/acquire pair on the mailbox guarantees the render path sees
//! every value written before the bit was raised. Each value is a single
//! atomic word, so no read is ever torn. Raising a bit twice before a drain
//! costs nothing: recomputation is idempotent.

use std::ops::{BitOr, BitOrAssign};
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use crate::dsp::math::{param_to_unit, percent_to_unit};
use crate::osc::params::{Param, ParamId, Params};
use crate::osc::OscInput;
use crate::wave::bank::WaveSlot;

/// Submix floor applied by the host's edit-parameter 4 scaling.
const SUBMIX_FLOOR: f32 = 0.05;
const SUBMIX_RANGE: f32 = 0.90;
/// Wave indices are stored as `u8`
const MAX_WAVE_COUNT: usize = u8::MAX as usize + 1;

/// Pending-change bits, drained once per render block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeFlags(u8);

impl ChangeFlags {
    pub const NONE: Self = Self(0);
    pub const WAVE0: Self = Self(1 << 1);
    pub const WAVE1: Self = Self(1 << 2);
    pub const SUBWAVE: Self = Self(1 << 3);
    pub const RINGMIX: Self = Self(1 << 4);
    pub const BITCRUSH: Self = Self(1 << 5);
    pub const RESET: Self = Self(1 << 6);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn wave_slot(slot: WaveSlot) -> Self {
        match slot {
            WaveSlot::Primary => Self::WAVE0,
            WaveSlot::Secondary => Self::WAVE1,
            WaveSlot::Sub => Self::SUBWAVE,
        }
    }
}

impl BitOr for ChangeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChangeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// An `f32` stored as its bit pattern in an `AtomicU32`.
#[derive(Debug)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }

    fn store(&self, value: f32, order: Ordering) {
        self.0.store(value.to_bits(), order);
    }
}

/// Parameter store and change mailbox shared by the oscillator and every
/// [`Controller`] handle.
#[derive(Debug)]
pub(crate) struct ControlState {
    submix: AtomicF32,
    ringmix: AtomicF32,
    bitcrush: AtomicF32,
    shape: AtomicF32,
    shiftshape: AtomicF32,
    wave0: AtomicU8,
    wave1: AtomicU8,
    subwave: AtomicU8,
    flags: AtomicU8,
    /// Table counts per slot, for wrapping host indices
    wave_counts: [usize; 3],
}

impl ControlState {
    pub(crate) fn new(wave_counts: [usize; 3]) -> Self {
        let p = Params::new();
        Self {
            submix: AtomicF32::new(p.submix),
            ringmix: AtomicF32::new(p.ringmix),
            bitcrush: AtomicF32::new(p.bitcrush),
            shape: AtomicF32::new(p.shape),
            shiftshape: AtomicF32::new(p.shiftshape),
            wave0: AtomicU8::new(p.wave0),
            wave1: AtomicU8::new(p.wave1),
            subwave: AtomicU8::new(p.subwave),
            flags: AtomicU8::new(ChangeFlags::NONE.bits()),
            wave_counts,
        }
    }

    /// Put every parameter back to its default and empty the mailbox.
    pub(crate) fn restore_defaults(&self) {
        let p = Params::new();
        self.submix.store(p.submix, Ordering::Relaxed);
        self.ringmix.store(p.ringmix, Ordering::Relaxed);
        self.bitcrush.store(p.bitcrush, Ordering::Relaxed);
        self.shape.store(p.shape, Ordering::Relaxed);
        self.shiftshape.store(p.shiftshape, Ordering::Relaxed);
        self.wave0.store(p.wave0, Ordering::Relaxed);
        self.wave1.store(p.wave1, Ordering::Relaxed);
        self.subwave.store(p.subwave, Ordering::Relaxed);
        self.flags.store(ChangeFlags::NONE.bits(), Ordering::Release);
    }

    pub(crate) fn raise(&self, flags: ChangeFlags) {
        self.flags.fetch_or(flags.bits(), Ordering::Release);
    }

    /// Take every pending bit, leaving the mailbox empty.
    pub(crate) fn drain(&self) -> ChangeFlags {
        ChangeFlags::from_bits(self.flags.swap(0, Ordering::AcqRel))
    }

    pub(crate) fn pending(&self) -> ChangeFlags {
        ChangeFlags::from_bits(self.flags.load(Ordering::Acquire))
    }

    pub(crate) fn snapshot(&self) -> Params {
        Params {
            submix: self.submix.load(Ordering::Relaxed),
            ringmix: self.ringmix.load(Ordering::Relaxed),
            bitcrush: self.bitcrush.load(Ordering::Relaxed),
            shape: self.shape.load(Ordering::Relaxed),
            shiftshape: self.shiftshape.load(Ordering::Relaxed),
            wave0: self.wave0.load(Ordering::Relaxed),
            wave1: self.wave1.load(Ordering::Relaxed),
            subwave: self.subwave.load(Ordering::Relaxed),
        }
    }

    fn wave_count(&self, slot: WaveSlot) -> usize {
        let count = match slot {
            WaveSlot::Primary => self.wave_counts[0],
            WaveSlot::Secondary => self.wave_counts[1],
            WaveSlot::Sub => self.wave_counts[2],
        };
        count.clamp(1, MAX_WAVE_COUNT)
    }

    fn set_wave(&self, slot: WaveSlot, index: usize) {
        let index = (index % self.wave_count(slot)) as u8;
        let target = match slot {
            WaveSlot::Primary => &self.wave0,
            WaveSlot::Secondary => &self.wave1,
            WaveSlot::Sub => &self.subwave,
        };
        target.store(index, Ordering::Relaxed);
        self.raise(ChangeFlags::wave_slot(slot));
    }

    fn set(&self, param: Param, value: f32) {
        let value = value.clamp(0.0, 1.0);
        match param {
            Param::SubMix => self.submix.store(value, Ordering::Relaxed),
            Param::RingMix => {
                self.ringmix.store(value, Ordering::Relaxed);
                self.raise(ChangeFlags::RINGMIX);
            }
            Param::BitCrush => {
                self.bitcrush.store(value, Ordering::Relaxed);
                self.raise(ChangeFlags::BITCRUSH);
            }
            Param::Shape => self.shape.store(value, Ordering::Relaxed),
            Param::ShiftShape => self.shiftshape.store(value, Ordering::Relaxed),
        }
    }
}

/// Cloneable, thread-safe handle for the control side of a
/// [`MorphOsc`](crate::osc::MorphOsc).
///
/// Every method is wait-free and may be called from any thread while the
/// oscillator renders.
#[derive(Debug, Clone)]
pub struct Controller {
    shared: Arc<ControlState>,
}

impl Controller {
    pub(crate) fn new(shared: Arc<ControlState>) -> Self {
        Self { shared }
    }

    /// Apply a raw host parameter change. Unknown indices are ignored.
    ///
    /// | index | parameter  | value range | mapping                        |
    /// | ----- | ---------- | ----------- | ------------------------------ |
    /// | 0     | wave0      | any         | modulo primary wave count      |
    /// | 1     | wave1      | any         | modulo secondary wave count    |
    /// | 2     | subwave    | any         | modulo sub wave count          |
    /// | 3     | submix     | 0..=100 %   | 0.05 + 0.9 * value / 100       |
    /// | 4     | ringmix    | 0..=100 %   | value / 100                    |
    /// | 5     | bitcrush   | 0..=100 %   | value / 100                    |
    /// | 6     | shape      | 0..=1023    | value / 1023                   |
    /// | 7     | shiftshape | 0..=1023    | value / 1023                   |
    pub fn set_parameter(&self, index: u16, value: u16) {
        let Some(id) = ParamId::from_index(index) else {
            log::trace!("ignoring unknown parameter index {}", index);
            return;
        };

        let shared = &self.shared;
        match id {
            ParamId::Id1 => shared.set_wave(WaveSlot::Primary, value as usize),
            ParamId::Id2 => shared.set_wave(WaveSlot::Secondary, value as usize),
            ParamId::Id3 => shared.set_wave(WaveSlot::Sub, value as usize),
            ParamId::Id4 => shared.set(
                Param::SubMix,
                SUBMIX_FLOOR + value as f32 * 0.01 * SUBMIX_RANGE,
            ),
            ParamId::Id5 => shared.set(Param::RingMix, percent_to_unit(value)),
            ParamId::Id6 => shared.set(Param::BitCrush, percent_to_unit(value)),
            ParamId::Shape => shared.set(Param::Shape, param_to_unit(value)),
            ParamId::ShiftShape => shared.set(Param::ShiftShape, param_to_unit(value)),
        }
    }

    /// Set a continuous parameter to `value`, clamped to [0, 1].
    pub fn set(&self, param: Param, value: f32) {
        self.shared.set(param, value);
    }

    /// Select a table for `slot`. The index wraps modulo the slot's count.
    pub fn select_wave(&self, slot: WaveSlot, index: usize) {
        self.shared.set_wave(slot, index);
    }

    /// Note start: realign all phases at the top of the next block.
    pub fn note_on(&self, input: &OscInput) {
        log::trace!("note on, pitch {:#06x}", input.pitch);
        self.shared.raise(ChangeFlags::RESET);
    }

    /// Note end. The oscillator free-runs; amplitude is the host's business.
    pub fn note_off(&self, input: &OscInput) {
        log::trace!("note off, pitch {:#06x}", input.pitch);
    }

    /// Current committed parameter values.
    pub fn params(&self) -> Params {
        self.shared.snapshot()
    }

    /// Changes staged but not yet picked up by a render call.
    pub fn pending(&self) -> ChangeFlags {
        self.shared.pending()
    }

    pub fn wave_count(&self, slot: WaveSlot) -> usize {
        self.shared.wave_count(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> Controller {
        Controller::new(Arc::new(ControlState::new([46, 44, 16])))
    }

    #[test]
    fn test_flags_ops() {
        let mut flags = ChangeFlags::NONE;
        assert!(flags.is_empty());
        flags |= ChangeFlags::WAVE0 | ChangeFlags::RESET;
        assert!(flags.contains(ChangeFlags::WAVE0));
        assert!(flags.contains(ChangeFlags::RESET));
        assert!(!flags.contains(ChangeFlags::BITCRUSH));
        assert_eq!(flags.bits(), 0b0100_0010);
    }

    #[test]
    fn test_drain_clears_mailbox() {
        let ctl = controller();
        ctl.set_parameter(ParamId::Id6.index(), 50);
        ctl.note_on(&OscInput::default());

        let drained = ctl.shared.drain();
        assert!(drained.contains(ChangeFlags::BITCRUSH | ChangeFlags::RESET));
        assert!(ctl.pending().is_empty());
        assert!(ctl.shared.drain().is_empty());
    }

    #[test]
    fn test_wave_params_wrap_and_flag() {
        let ctl = controller();
        ctl.set_parameter(ParamId::Id1.index(), 50);
        ctl.set_parameter(ParamId::Id2.index(), 3);
        ctl.set_parameter(ParamId::Id3.index(), 17);

        let p = ctl.params();
        assert_eq!(p.wave0, 4);
        assert_eq!(p.wave1, 3);
        assert_eq!(p.subwave, 1);

        let pending = ctl.pending();
        assert!(pending.contains(ChangeFlags::WAVE0 | ChangeFlags::WAVE1 | ChangeFlags::SUBWAVE));
    }

    #[test]
    fn test_mix_param_scaling() {
        let ctl = controller();
        ctl.set_parameter(ParamId::Id4.index(), 0);
        assert!((ctl.params().submix - 0.05).abs() < 1e-6);
        ctl.set_parameter(ParamId::Id4.index(), 100);
        assert!((ctl.params().submix - 0.95).abs() < 1e-6);

        ctl.set_parameter(ParamId::Id5.index(), 25);
        assert!((ctl.params().ringmix - 0.25).abs() < 1e-6);
        assert!(ctl.pending().contains(ChangeFlags::RINGMIX));

        ctl.set_parameter(ParamId::Shape.index(), 1023);
        assert!((ctl.params().shape - 1.0).abs() < 1e-6);
        ctl.set_parameter(ParamId::ShiftShape.index(), 0);
        assert_eq!(ctl.params().shiftshape, 0.0);
    }

    #[test]
    fn test_unknown_index_is_noop() {
        let ctl = controller();
        let before = ctl.params();
        ctl.set_parameter(42, 1000);
        assert_eq!(ctl.params(), before);
        assert!(ctl.pending().is_empty());
    }

    #[test]
    fn test_note_off_changes_nothing() {
        let ctl = controller();
        ctl.set_parameter(ParamId::Id2.index(), 5);
        ctl.set(Param::Shape, 0.3);
        let params = ctl.params();
        let pending = ctl.pending();

        ctl.note_off(&OscInput::default());
        assert_eq!(ctl.params(), params);
        assert_eq!(ctl.pending(), pending);

        ctl.shared.drain();
        ctl.note_off(&OscInput::default());
        assert!(ctl.pending().is_empty());
    }

    #[test]
    fn test_wave_count_capped_at_index_range() {
        let ctl = Controller::new(Arc::new(ControlState::new([1000, 0, 16])));
        assert_eq!(ctl.wave_count(WaveSlot::Primary), 256);
        assert_eq!(ctl.wave_count(WaveSlot::Secondary), 1);

        ctl.select_wave(WaveSlot::Primary, 300);
        assert_eq!(ctl.params().wave0, 44);
        ctl.select_wave(WaveSlot::Primary, 255);
        assert_eq!(ctl.params().wave0, 255);
    }

    #[test]
    fn test_submix_and_shape_do_not_raise_flags() {
        let ctl = controller();
        ctl.set(Param::SubMix, 0.5);
        ctl.set(Param::Shape, 0.5);
        ctl.set(Param::ShiftShape, 0.5);
        assert!(ctl.pending().is_empty());
    }

    #[test]
    fn test_typed_set_clamps() {
        let ctl = controller();
        ctl.set(Param::RingMix, 3.0);
        ctl.set(Param::BitCrush, -1.0);
        assert_eq!(ctl.params().ringmix, 1.0);
        assert_eq!(ctl.params().bitcrush, 0.0);
    }

    #[test]
    fn test_restore_defaults() {
        let ctl = controller();
        ctl.set(Param::Shape, 0.7);
        ctl.select_wave(WaveSlot::Secondary, 9);
        ctl.shared.restore_defaults();
        assert_eq!(ctl.params(), Params::new());
        assert!(ctl.pending().is_empty());
    }
}
