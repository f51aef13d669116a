//! Benchmarks for low-level DSP primitives.

mod crush;
mod distortion;
mod filter;
mod wavetable;

pub use crush::bench_crush;
pub use distortion::bench_distortion;
pub use filter::bench_filter;
pub use wavetable::bench_wavetable;
