//! Benchmarks for the ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::Envelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sustain - steady state, cheapest path
        let mut env = Envelope::adsr(0.001, 0.001, 0.7, 0.2);
        env.render(&mut buffer[..], true, 48_000.0);
        env.render(&mut buffer[..], true, 48_000.0);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer[..]), true, black_box(48_000.0)))
        });

        // Attack - ramp recomputed every sample
        let mut env = Envelope::adsr(10.0, 0.1, 0.7, 0.2);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.reset();
                env.render(black_box(&mut buffer[..]), true, black_box(48_000.0))
            })
        });
    }

    group.finish();
}
