/// Last-committed control parameters.
///
/// All mix amounts are unipolar in [0, 1]. Wave indices select a table
/// within their slot of the bank (see [`crate::wave::bank::WaveSlot`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    /// Sub-oscillator blend
    pub submix: f32,
    /// Ring-modulation blend (sub x main)
    pub ringmix: f32,
    /// Bit-crush amount; 0 bypasses the quantizer
    pub bitcrush: f32,
    /// Morph position between wave0 (0) and wave1 (1)
    pub shape: f32,
    /// Detune depth of the second and sub oscillators
    pub shiftshape: f32,
    pub wave0: u8,
    pub wave1: u8,
    pub subwave: u8,
}

impl Params {
    pub const fn new() -> Self {
        Self {
            submix: 0.05,
            ringmix: 0.0,
            bitcrush: 0.0,
            shape: 0.0,
            shiftshape: 0.0,
            wave0: 0,
            wave1: 0,
            subwave: 0,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}

/// Continuous parameters that can be set directly, bypassing the host's
/// raw-value scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    SubMix,
    RingMix,
    BitCrush,
    Shape,
    ShiftShape,
}

/// Host parameter slots, in the order the host numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ParamId {
    /// Edit parameter 1: primary wave
    Id1 = 0,
    /// Edit parameter 2: secondary wave
    Id2,
    /// Edit parameter 3: sub wave
    Id3,
    /// Edit parameter 4: sub mix
    Id4,
    /// Edit parameter 5: ring mix
    Id5,
    /// Edit parameter 6: bit crush
    Id6,
    /// Shape knob (10-bit)
    Shape,
    /// Shift + shape knob (10-bit)
    ShiftShape,
}

impl ParamId {
    pub const ALL: [ParamId; 8] = [
        ParamId::Id1,
        ParamId::Id2,
        ParamId::Id3,
        ParamId::Id4,
        ParamId::Id5,
        ParamId::Id6,
        ParamId::Shape,
        ParamId::ShiftShape,
    ];

    /// `None` for indices the host may send but this unit does not use.
    pub fn from_index(index: u16) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub const fn index(self) -> u16 {
        self as u16
    }
}
