//! Real-world scenario benchmarks.
//!
//! These benchmarks render whole blocks through the oscillator with the
//! kinds of settings a patch actually uses.

mod osc;

pub use osc::bench_osc;
