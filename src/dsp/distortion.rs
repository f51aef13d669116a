//! Clipping
//!
//! Two stages of the oscillator bound the signal: a hard clip right after the
//! mixer (the ring-mod blend can overshoot) and a cubic soft clip at the very
//! end of the chain.
//!
//! # Hard Clip
//!
//!   f(x) = clamp(x, -1, 1)
//!   - Exact below the threshold, flat above it
//!   - Creates odd harmonics when driven
//!
//! # Cubic Soft Clip
//!
//!   f(x) = x - c * x^3,  x clamped to [-1, 1] first
//!   - Nearly linear for small signals
//!   - Bends smoothly toward the ceiling 1 - c
//!   - c = 0.125 gives a gentle tape-like rounding of peaks
//!
//! Because the input is clamped before the polynomial, the output never
//! exceeds 1 - c in magnitude, whatever the input. For c in [0, 1/3] the
//! curve is monotonic on [-1, 1].

/// Hard clipping at +/- `threshold`.
#[inline]
pub fn hard_clip(sample: f32, threshold: f32) -> f32 {
    sample.clamp(-threshold, threshold)
}

/// Cubic soft clipping with curvature `curve`.
#[inline]
pub fn soft_clip(sample: f32, curve: f32) -> f32 {
    let x = sample.clamp(-1.0, 1.0);
    x - curve * (x * x * x)
}

/// Apply cubic soft clipping to an entire buffer in place.
pub fn soft_clip_buffer(buffer: &mut [f32], curve: f32) {
    for sample in buffer.iter_mut() {
        *sample = soft_clip(*sample, curve);
    }
}
