//! Whole-engine scenario benchmarks.

mod engine;
mod sinks;

pub use engine::bench_engine;
pub use sinks::bench_sinks;
