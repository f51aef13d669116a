//! Low-level DSP primitives used by the morphing oscillator.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside the oscillator struct. They stay focused on the
//! signal-processing math; the oscillator layers flag handling and parameter
//! smoothing on top.

/// Bit-depth reduction with dithering.
pub mod crush;
/// Hard and soft clipping curves.
pub mod distortion;
/// One-pole low-pass filter stage.
pub mod filter;
/// Numeric conversions shared with the host (Q31, 10-bit params).
pub mod math;
/// White noise source.
pub mod noise;

pub use crush::BitCrusher;
pub use filter::OnePole;
pub use noise::WhiteNoise;
