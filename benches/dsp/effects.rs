//! Benchmarks for each effect in isolation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::effects::{Effect, EffectKind, StereoEffect, StereoSample};

use crate::BLOCK_SIZES;

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/effects");
    let input: Vec<StereoSample> = (0..512)
        .map(|i| StereoSample::mono(if (i / 50) % 2 == 0 { 1.0 } else { -1.0 }))
        .collect();

    for &size in BLOCK_SIZES {
        for kind in [EffectKind::LowPass, EffectKind::Delay, EffectKind::Octave] {
            let mut effect = Effect::new(kind, 48_000.0);
            effect.set_note_context(440.0, 48_000.0);

            group.bench_with_input(BenchmarkId::new(kind.name(), size), &size, |b, &size| {
                b.iter(|| {
                    for &sample in &input[..size] {
                        black_box(effect.process(black_box(sample)));
                    }
                })
            });
        }
    }

    group.finish();
}
