/*
Bit Crushing
============

Quantize the signal to a coarse grid of `bitres` steps per unit amplitude:

    y = round(x * bitres) / bitres

`bitres = 2^bits`. At 24 bits the grid is finer than the output format
resolves and the stage is inaudible; at 1-2 bits the waveform turns into a
staircase. A tiny amount of white noise (dither) is added before rounding to
decorrelate the quantization error from the signal.

The amount knob (0..1) maps onto bits with a squared curve so most of the
knob travel lands in the audibly interesting low-bit region:

    bits = 1 + 23 * (1 - amount)^2

    amount 0.00 -> bypass (bitres = 1)
    amount 0.25 -> ~14 bits
    amount 0.50 -> ~6.75 bits
    amount 0.75 -> ~2.4 bits
    amount 1.00 -> 1 bit

bitres = 1 is reserved for "no reduction" and skips the rounding entirely.
*/

const MIN_BITS: f32 = 1.0;
const MAX_BITS: f32 = 24.0;
const DITHER_SCALE: f32 = 2e-8;

/// Quantization steps per unit amplitude for a crush amount in [0, 1].
/// Always >= 1; exactly 1 (bypass) at amount 0.
pub fn bitres_for_amount(amount: f32) -> f32 {
    let amount = amount.clamp(0.0, 1.0);
    if amount <= 0.0 {
        return 1.0;
    }
    let inv = 1.0 - amount;
    (MIN_BITS + (MAX_BITS - MIN_BITS) * inv * inv).exp2()
}

/// Round `sample` to the grid `bitres`, skipping the bypass value 1.
#[inline]
pub fn quantize(sample: f32, bitres: f32, bitresrcp: f32) -> f32 {
    if bitres <= 1.0 {
        sample
    } else {
        (sample * bitres).round() * bitresrcp
    }
}

/// Derived bit-crush coefficients. Recomputed only when the crush amount
/// changes; `process` is a pure function of these plus the noise sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitCrusher {
    dither: f32,
    bitres: f32,
    bitresrcp: f32,
}

impl BitCrusher {
    pub const fn new() -> Self {
        Self {
            dither: 0.0,
            bitres: 1.0,
            bitresrcp: 1.0,
        }
    }

    /// Recompute dither depth and grid from a crush amount in [0, 1].
    /// Idempotent: the same amount always yields the same coefficients.
    pub fn set_amount(&mut self, amount: f32) {
        let amount = amount.clamp(0.0, 1.0);
        self.dither = amount * DITHER_SCALE;
        self.bitres = bitres_for_amount(amount);
        self.bitresrcp = 1.0 / self.bitres;
    }

    /// Add dither (`noise` in [-1, 1]) and quantize.
    #[inline]
    pub fn process(&self, sample: f32, noise: f32) -> f32 {
        quantize(sample + self.dither * noise, self.bitres, self.bitresrcp)
    }

    pub fn dither(&self) -> f32 {
        self.dither
    }

    pub fn bitres(&self) -> f32 {
        self.bitres
    }

    pub fn bitresrcp(&self) -> f32 {
        self.bitresrcp
    }
}

impl Default for BitCrusher {
    fn default() -> Self {
        Self::new()
    }
}
