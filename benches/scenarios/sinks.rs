//! Benchmarks for writing engine output into device buffers.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::{
    io::{render_interleaved, DoubleBuffer, Half},
    SynthConfig, SynthEngine,
};

use crate::BLOCK_SIZES;

pub fn bench_sinks(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/sinks");
    let config = SynthConfig::default()
        .with_effects(["delay"])
        .with_sample_rate(48_000.0);

    for &size in BLOCK_SIZES {
        let mut engine = SynthEngine::from_config(&config);
        engine.trigger_note(440.0);
        let mut interleaved = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("interleaved_stereo", size), &size, |b, _| {
            b.iter(|| render_interleaved(&mut engine, black_box(&mut interleaved), 2))
        });

        let mut engine = SynthEngine::from_config(&config);
        engine.trigger_note(440.0);
        let mut buffer = DoubleBuffer::new(size);
        group.bench_with_input(BenchmarkId::new("double_buffer_half", size), &size, |b, _| {
            b.iter(|| buffer.fill_half(black_box(Half::First), &mut engine))
        });
    }

    group.finish();
}
