/// Uniform white noise in [-1, 1] from a 32-bit xorshift generator.
///
/// Deterministic for a given seed, one multiply and three shifts per sample.
#[derive(Debug, Clone)]
pub struct WhiteNoise {
    state: u32,
}

const DEFAULT_SEED: u32 = 0x1234_5678;

impl WhiteNoise {
    pub fn new(seed: u32) -> Self {
        // xorshift is stuck at zero forever
        let state = if seed == 0 { DEFAULT_SEED } else { seed };
        Self { state }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        // Top 24 bits give an exact f32 in [0, 1)
        let unit = (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0);
        unit * 2.0 - 1.0
    }
}

impl Default for WhiteNoise {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
