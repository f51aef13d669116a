pub mod dsp;
pub mod osc; // Morphing oscillator: state, control mailbox, render loop
pub mod pitch; // Note -> per-sample frequency
pub mod wave; // Wavetables and wave selection

pub use osc::{Controller, MorphOsc, OscInput};
pub use pitch::{EqualTemperament, Pitch, PitchMap};
pub use wave::{bank::WaveBank, bank::WaveSelector, bank::WaveSlot, WaveTable};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Host sample rate. The firmware runs at a fixed 48 kHz.
pub const SAMPLE_RATE: f32 = 48_000.0;
pub(crate) const SAMPLE_RATE_RECIP: f32 = 1.0 / SAMPLE_RATE;
