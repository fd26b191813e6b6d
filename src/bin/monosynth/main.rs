//! monosynth - play the mono synth on the default output device
//!
//! Run with: cargo run -- --waveform saw --effect octave --effect delay

mod app;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use monosynth::{config, synth::config::InputMode, SynthConfig};

#[derive(Parser, Debug)]
#[command(name = "monosynth")]
#[command(about = "Monophonic synthesizer with a configurable effect chain")]
#[command(version)]
struct Args {
    /// TOML config file. Missing or invalid files fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Oscillator: sine, square, sawtooth (saw), triangle (tri)
    #[arg(long)]
    waveform: Option<String>,

    /// Effect to append to the chain, in order. Repeatable.
    /// Replaces the config file's effect list.
    #[arg(long = "effect")]
    effects: Vec<String>,

    /// Note source: sequencer or tone
    #[arg(long)]
    mode: Option<String>,

    /// Built-in sequence: scale, chord, melody, demo
    #[arg(long)]
    sequence: Option<String>,

    /// Frequency of the sustained note in tone mode, Hz
    #[arg(long)]
    frequency: Option<f32>,

    /// Stop after this many seconds. Plays until Ctrl+C otherwise.
    #[arg(long)]
    duration: Option<f32>,
}

impl Args {
    fn into_config(self) -> (SynthConfig, Option<f32>) {
        let mut config = match &self.config {
            Some(path) => config::load_or_default(path),
            None => SynthConfig::default(),
        };

        if let Some(waveform) = self.waveform {
            config.waveform = waveform;
        }
        if !self.effects.is_empty() {
            config.effects = self.effects;
        }
        if let Some(mode) = self.mode {
            match InputMode::from_name(&mode) {
                Some(mode) => config.input_mode = mode,
                None => tracing::warn!(mode = %mode, "unknown input mode, keeping {:?}", config.input_mode),
            }
        }
        if let Some(sequence) = self.sequence {
            config.sequence = sequence;
        }
        if let Some(frequency) = self.frequency {
            config.default_frequency = frequency;
        }

        (config.sanitized(), self.duration)
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let (config, duration) = Args::parse().into_config();
    app::run(config, duration)
}
