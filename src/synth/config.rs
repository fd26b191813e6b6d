#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::Envelope,
    effects::{delay, lowpass, octave},
    DEFAULT_SAMPLE_RATE,
};

pub const DEFAULT_BUFFER_FRAMES: u32 = 512;
pub const DEFAULT_FREQUENCY: f32 = 440.0;

/// Everything needed to (re)build the engine.
///
/// The engine reads this once per [`configure`](crate::SynthEngine::configure)
/// call and keeps nothing of it. Every field has a default, so a partial
/// config file is always valid.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Oscillator name, case-insensitive. Unknown names fall back to square.
    pub waveform: String,
    /// Ordered effect names, case-insensitive. Unknown names are dropped.
    pub effects: Vec<String>,
    pub sample_rate: f32,
    pub buffer_frames: u32,
    pub default_frequency: f32,
    pub input_mode: InputMode,
    /// Sequence played in [`InputMode::Sequencer`].
    pub sequence: String,
    /// Shape notes with an ADSR. `None` keeps the hard on/off gate.
    pub envelope: Option<EnvelopeSettings>,
    pub delay: DelaySettings,
    pub lowpass: LowPassSettings,
    pub octave: OctaveSettings,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            waveform: "square".to_string(),
            effects: Vec::new(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_frames: DEFAULT_BUFFER_FRAMES,
            default_frequency: DEFAULT_FREQUENCY,
            input_mode: InputMode::default(),
            sequence: "demo".to_string(),
            envelope: None,
            delay: DelaySettings::default(),
            lowpass: LowPassSettings::default(),
            octave: OctaveSettings::default(),
        }
    }
}

impl SynthConfig {
    pub fn with_waveform(mut self, waveform: impl Into<String>) -> Self {
        self.waveform = waveform.into();
        self
    }

    pub fn with_effects<I, S>(mut self, effects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.effects = effects.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_envelope(mut self, envelope: EnvelopeSettings) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Replace numeric values the engine cannot use with defaults.
    ///
    /// This is the config-boundary fallback: a zero sample rate read from a
    /// file becomes 44100 Hz here instead of reaching the audio path.
    pub fn sanitized(mut self) -> Self {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            tracing::warn!(
                sample_rate = self.sample_rate,
                "invalid sample rate, using {DEFAULT_SAMPLE_RATE}"
            );
            self.sample_rate = DEFAULT_SAMPLE_RATE;
        }
        if self.buffer_frames == 0 {
            tracing::warn!("buffer_frames is zero, using {DEFAULT_BUFFER_FRAMES}");
            self.buffer_frames = DEFAULT_BUFFER_FRAMES;
        }
        if !(self.default_frequency.is_finite()
            && self.default_frequency > 0.0
            && self.default_frequency <= crate::MAX_NOTE_FREQUENCY)
        {
            tracing::warn!(
                frequency = self.default_frequency,
                "invalid default frequency, using {DEFAULT_FREQUENCY}"
            );
            self.default_frequency = DEFAULT_FREQUENCY;
        }
        self
    }
}

/// Where note events come from in the desktop binary.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Built-in test sequences.
    #[default]
    Sequencer,
    /// A single sustained note at `default_frequency`.
    Tone,
}

impl InputMode {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("sequencer") {
            Some(Self::Sequencer)
        } else if name.eq_ignore_ascii_case("tone") {
            Some(Self::Tone)
        } else {
            None
        }
    }
}

/// ADSR times in seconds, sustain as a level in [0, 1].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSettings {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for EnvelopeSettings {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
        }
    }
}

impl EnvelopeSettings {
    pub fn build(&self) -> Envelope {
        Envelope::adsr(self.attack, self.decay, self.sustain, self.release)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySettings {
    /// Seconds.
    pub time: f32,
    pub feedback: f32,
    pub mix: f32,
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self {
            time: delay::DEFAULT_TIME_SECONDS,
            feedback: delay::DEFAULT_FEEDBACK,
            mix: delay::DEFAULT_MIX,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPassSettings {
    /// Hz.
    pub cutoff: f32,
}

impl Default for LowPassSettings {
    fn default() -> Self {
        Self {
            cutoff: lowpass::DEFAULT_CUTOFF_HZ,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctaveSettings {
    pub higher: bool,
    pub blend: f32,
}

impl Default for OctaveSettings {
    fn default() -> Self {
        Self {
            higher: octave::DEFAULT_HIGHER,
            blend: octave::DEFAULT_BLEND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_system_fallbacks() {
        let config = SynthConfig::default();
        assert_eq!(config.waveform, "square");
        assert!(config.effects.is_empty());
        assert_eq!(config.sample_rate, 44_100.0);
        assert_eq!(config.buffer_frames, 512);
        assert_eq!(config.default_frequency, 440.0);
        assert!(config.envelope.is_none());
    }

    #[test]
    fn sanitized_replaces_unusable_numbers() {
        let mut config = SynthConfig::default().with_sample_rate(0.0);
        config.buffer_frames = 0;
        config.default_frequency = f32::NAN;

        let config = config.sanitized();
        assert_eq!(config.sample_rate, 44_100.0);
        assert_eq!(config.buffer_frames, 512);
        assert_eq!(config.default_frequency, 440.0);
    }

    #[test]
    fn sanitized_keeps_valid_values() {
        let config = SynthConfig::default().with_sample_rate(48_000.0).sanitized();
        assert_eq!(config.sample_rate, 48_000.0);
    }

    #[test]
    fn input_mode_names() {
        assert_eq!(InputMode::from_name("Tone"), Some(InputMode::Tone));
        assert_eq!(InputMode::from_name("SEQUENCER"), Some(InputMode::Sequencer));
        assert_eq!(InputMode::from_name("midi"), None);
    }
}
