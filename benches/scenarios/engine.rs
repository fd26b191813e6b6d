//! Benchmarks for full engine renders.
//!
//! Covers the configurations the binary ships with, from a bare oscillator
//! up to the full three-effect chain with an envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::{
    effects::StereoSample,
    synth::config::EnvelopeSettings,
    SynthConfig, SynthEngine,
};

use crate::BLOCK_SIZES;

fn engine(waveform: &str, effects: &[&str], envelope: bool) -> SynthEngine {
    let mut config = SynthConfig::default()
        .with_waveform(waveform)
        .with_effects(effects.iter().copied())
        .with_sample_rate(48_000.0);
    if envelope {
        config = config.with_envelope(EnvelopeSettings::default());
    }
    let mut engine = SynthEngine::from_config(&config);
    engine.trigger_note(220.0);
    engine
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    let setups: [(&str, &str, &[&str], bool); 4] = [
        ("bare_square", "square", &[], false),
        ("sine_lowpass", "sine", &["lowpass"], false),
        ("saw_delay", "saw", &["delay"], false),
        ("full_chain", "saw", &["octave", "lowpass", "delay"], true),
    ];

    for &size in BLOCK_SIZES {
        let mut block = vec![StereoSample::SILENCE; size];

        for (label, waveform, effects, envelope) in setups {
            let mut synth = engine(waveform, effects, envelope);
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                b.iter(|| synth.render_block(black_box(&mut block)))
            });
        }
    }

    group.finish();
}
