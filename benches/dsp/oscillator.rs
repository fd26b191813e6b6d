//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::OscillatorKind;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for kind in OscillatorKind::ALL {
            let mut phase = 0.0f32;
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &size, |b, _| {
                b.iter(|| {
                    for out in buffer.iter_mut() {
                        *out = kind.generate(black_box(440.0), black_box(48_000.0), &mut phase);
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
