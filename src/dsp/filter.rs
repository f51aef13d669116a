use crate::dsp::math::tan_pi;

/*
One-Pole Low-Pass
=================

A first-order IIR section in transposed direct form II. One float of memory
(z1) carries the previous sample's contribution:

    y[n]  = ff0 * x[n] + z1
    z1    = ff1 * x[n] - fb1 * y[n]

| configured by      | ff0        | ff1       | fb1             | response               |
| ------------------ | ---------- | --------- | --------------- | ---------------------- |
| set_pole_lp(p)     | 1 - p      | 0         | -p              | leaky integrator       |
| set_cutoff_lp(fc)  | k / (k+1)  | k / (k+1) | (k-1) / (k+1)   | bilinear, k=tan(pi fc) |
| set_identity()     | 1          | 0         | 0               | passthrough            |

The pole form is cheap and dull: a pole of 0.8 rolls off gently from a few
kHz, taming aliasing from the wavetable reads. The bilinear form places the
-3 dB point exactly at the normalized cutoff fc (fraction of the sample
rate, below 0.5), which makes it a good anti-imaging stage after the
bit-crusher.
*/

#[derive(Debug, Clone, Copy)]
pub struct OnePole {
    ff0: f32,
    ff1: f32,
    fb1: f32,
    z1: f32, // Previous sample's feedforward/feedback sum
}

impl OnePole {
    /// A passthrough stage. Configure it before use.
    pub const fn new() -> Self {
        Self {
            ff0: 1.0,
            ff1: 0.0,
            fb1: 0.0,
            z1: 0.0,
        }
    }

    pub fn with_pole(pole: f32) -> Self {
        let mut filter = Self::new();
        filter.set_pole_lp(pole);
        filter
    }

    pub fn with_cutoff(cutoff: f32) -> Self {
        let mut filter = Self::new();
        filter.set_cutoff_lp(cutoff);
        filter
    }

    /// Direct pole placement, `pole` in [0, 1). Larger poles filter harder.
    pub fn set_pole_lp(&mut self, pole: f32) {
        let pole = pole.clamp(0.0, 0.9999);
        self.ff0 = 1.0 - pole;
        self.ff1 = 0.0;
        self.fb1 = -pole;
    }

    /// Bilinear low-pass at a normalized cutoff (cycles/sample).
    pub fn set_cutoff_lp(&mut self, cutoff: f32) {
        self.set_bilinear_lp(tan_pi(cutoff));
    }

    /// Bilinear low-pass from a prewarped coefficient `k = tan(pi * fc)`.
    pub fn set_bilinear_lp(&mut self, k: f32) {
        let kp1 = k + 1.0;
        let km1 = k - 1.0;
        self.ff0 = k / kp1;
        self.ff1 = k / kp1;
        self.fb1 = km1 / kp1;
    }

    pub fn set_identity(&mut self) {
        self.ff0 = 1.0;
        self.ff1 = 0.0;
        self.fb1 = 0.0;
        self.z1 = 0.0;
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let acc = self.ff0 * sample + self.z1;
        self.z1 = self.ff1 * sample - self.fb1 * acc;
        acc
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
    }
}

impl Default for OnePole {
    fn default() -> Self {
        Self::new()
    }
}
