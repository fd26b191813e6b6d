//! Loading [`SynthConfig`] from TOML.
//!
//! ```toml
//! waveform = "saw"
//! effects = ["octave", "lowpass", "delay"]
//! sample_rate = 48000
//!
//! [delay]
//! time = 0.25
//! feedback = 0.4
//!
//! [envelope]
//! attack = 0.005
//! release = 0.5
//! ```
//!
//! Missing keys take their defaults and unknown keys are ignored. The result
//! is always passed through [`SynthConfig::sanitized`].

use std::path::Path;

use crate::{error::ConfigError, synth::config::SynthConfig};

/// Read and parse a config file.
pub fn load(path: impl AsRef<Path>) -> Result<SynthConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = from_toml(&content)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parse config text.
pub fn from_toml(text: &str) -> Result<SynthConfig, ConfigError> {
    let config: SynthConfig = toml::from_str(text)?;
    Ok(config.sanitized())
}

/// Like [`load`], but any failure is logged and defaults are used.
pub fn load_or_default(path: impl AsRef<Path>) -> SynthConfig {
    let path = path.as_ref();
    match load(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "using default config");
            SynthConfig::default()
        }
    }
}
