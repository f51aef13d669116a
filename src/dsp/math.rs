use std::f32::consts::PI;

const Q31_SCALE: f32 = 2_147_483_647.0;
const Q31_RECIP: f32 = 1.0 / 2_147_483_648.0;

/// Full scale of the host's 10-bit knob values (shape, shift-shape).
const PARAM_10BIT_RECIP: f32 = 1.0 / 1023.0;

/// Highest normalized frequency accepted by [`tan_pi`]. Just below Nyquist,
/// where the tangent blows up.
pub const TAN_PI_MAX: f32 = 0.49;

/// Linear interpolation between `x0` and `x1` at fraction `fr`.
#[inline]
pub fn lerp(fr: f32, x0: f32, x1: f32) -> f32 {
    x0 + fr * (x1 - x0)
}

/// Signed Q31 fixed point to float in [-1, 1).
#[inline]
pub fn q31_to_f32(x: i32) -> f32 {
    x as f32 * Q31_RECIP
}

/// Float to signed Q31. Out-of-range input saturates at `i32::MIN`/`i32::MAX`.
#[inline]
pub fn f32_to_q31(x: f32) -> i32 {
    // float -> int `as` casts saturate
    (x * Q31_SCALE) as i32
}

/// 10-bit knob value (0..=1023) to [0, 1].
#[inline]
pub fn param_to_unit(value: u16) -> f32 {
    (value as f32 * PARAM_10BIT_RECIP).clamp(0.0, 1.0)
}

/// Percent-style value (0..=100) to [0, 1].
#[inline]
pub fn percent_to_unit(value: u16) -> f32 {
    (value as f32 * 0.01).clamp(0.0, 1.0)
}

/// `tan(pi * x)` for a normalized frequency `x`, clamped to [0, TAN_PI_MAX].
///
/// This is the prewarped bilinear coefficient used by the cutoff-based
/// filter configuration.
#[inline]
pub fn tan_pi(x: f32) -> f32 {
    (PI * x.clamp(0.0, TAN_PI_MAX)).tan()
}

/// Remove the integer part of a non-negative phase, keeping it in [0, 1).
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    phase - phase.trunc()
}
