use crate::{
    dsp::{Envelope, OscillatorKind},
    effects::{process_chain, Effect, EffectKind, EffectParam, StereoEffect, StereoSample},
    synth::{
        config::SynthConfig,
        message::{MessageReceiver, SynthMessage},
    },
    DEFAULT_SAMPLE_RATE, MAX_NOTE_FREQUENCY,
};

/*
Monophonic Synth Engine
=======================

The engine is the single source of truth for "what note is playing" and
"what does the output chain look like". It owns:

  - the oscillator variant (or none),
  - the phase accumulator the oscillator advances,
  - the note state: gate flag and frequency,
  - the effect chain, in order,
  - optionally, an ADSR envelope.

Signal path, once per sample:

  [oscillator] ──→ (× envelope) ──→ mono → stereo ──→ fx[0] ──→ fx[1] ──→ …

Threading
---------

The engine is owned by exactly one context: the audio callback (desktop) or
the buffer-fill task (embedded). Other threads never touch it directly; they
send `SynthMessage`s through an SPSC ring which the owner drains at the top
of each block with `process_messages`. Nothing on the per-sample path
allocates, locks, or logs.

`configure` rebuilds the effect chain and allocates. Run it with the stream
stopped (or on a fresh engine that is then moved into the callback).

Gate vs. envelope
-----------------

Without an envelope the note flag is a hard gate: note-off means silence on
the very next sample. With an envelope configured, the engine keeps
rendering after note-off until the release stage finishes, so notes fade
out instead of clicking off.

The envelope scales the oscillator only. Effects run after it, and the
octave effect generates its own square: that square is not enveloped and
sounds at full blend from the first attack sample until the release tail
ends.
*/

pub struct SynthEngine {
    oscillator: Option<OscillatorKind>,
    effects: Vec<Effect>,
    envelope: Option<Envelope>,

    sample_rate: f32,
    frequency: f32,
    phase: f32,
    note_on: bool,
}

impl SynthEngine {
    /// Square wave, no effects, no envelope. A non-positive sample rate
    /// falls back to 44100 Hz.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            oscillator: Some(OscillatorKind::default()),
            effects: Vec::new(),
            envelope: None,

            sample_rate: valid_sample_rate(sample_rate).unwrap_or(DEFAULT_SAMPLE_RATE),
            frequency: 0.0,
            phase: 0.0,
            note_on: false,
        }
    }

    pub fn from_config(config: &SynthConfig) -> Self {
        let mut engine = Self::new(config.sample_rate);
        engine.configure(config);
        engine
    }

    /// Select the oscillator and rebuild the effect chain from `config`.
    ///
    /// Never fails: unknown waveforms become square, unknown effect names are
    /// skipped and an unusable sample rate becomes 44100 Hz. Every effect is
    /// constructed fresh; nothing from the previous chain survives.
    pub fn configure(&mut self, config: &SynthConfig) {
        self.sample_rate = valid_sample_rate(config.sample_rate).unwrap_or_else(|| {
            tracing::warn!(
                sample_rate = config.sample_rate,
                "invalid sample rate, using {DEFAULT_SAMPLE_RATE}"
            );
            DEFAULT_SAMPLE_RATE
        });

        let waveform = OscillatorKind::from_name(&config.waveform).unwrap_or_else(|| {
            if !config.waveform.trim().is_empty() {
                tracing::warn!(waveform = %config.waveform, "unknown waveform, using square");
            }
            OscillatorKind::Square
        });
        self.oscillator = Some(waveform);

        self.effects.clear();
        for name in &config.effects {
            match EffectKind::from_name(name) {
                Some(kind) => {
                    let effect = self.build_effect(kind, config);
                    self.effects.push(effect);
                }
                None => tracing::warn!(effect = %name, "unknown effect, skipping"),
            }
        }

        self.envelope = config.envelope.as_ref().map(|settings| settings.build());

        tracing::info!(
            waveform = waveform.name(),
            effects = ?self.effect_kinds().collect::<Vec<_>>(),
            sample_rate = self.sample_rate,
            envelope = self.envelope.is_some(),
            "synth configured"
        );
    }

    fn build_effect(&self, kind: EffectKind, config: &SynthConfig) -> Effect {
        let mut effect = Effect::new(kind, self.sample_rate);
        match kind {
            EffectKind::Delay => {
                effect.apply_param(EffectParam::DelayTime(config.delay.time));
                effect.apply_param(EffectParam::Feedback(config.delay.feedback));
                effect.apply_param(EffectParam::Mix(config.delay.mix));
            }
            EffectKind::LowPass => {
                effect.apply_param(EffectParam::Cutoff(config.lowpass.cutoff));
            }
            EffectKind::Octave => {
                effect.apply_param(EffectParam::OctaveHigher(config.octave.higher));
                effect.apply_param(EffectParam::OctaveBlend(config.octave.blend));
            }
        }
        effect
    }

    /// Start a note. Frequencies outside (0, 20000] Hz are ignored.
    ///
    /// Resets the phase, pushes the pitch and sample rate into the effects
    /// that need them, clears every effect's state and restarts the envelope.
    pub fn trigger_note(&mut self, frequency: f32) -> bool {
        if !(frequency > 0.0 && frequency <= MAX_NOTE_FREQUENCY) {
            return false;
        }

        self.frequency = frequency;
        self.note_on = true;
        self.phase = 0.0;

        for effect in self.effects.iter_mut() {
            effect.set_note_context(frequency, self.sample_rate);
            effect.reset();
        }

        if let Some(envelope) = self.envelope.as_mut() {
            envelope.reset();
        }

        true
    }

    /// Drop the gate. Sample production stops immediately without an
    /// envelope, or after the release stage with one.
    pub fn trigger_note_off(&mut self) {
        self.note_on = false;
    }

    /// Render one stereo frame.
    #[inline]
    pub fn next_sample(&mut self) -> StereoSample {
        let sounding = self.note_on || self.envelope.as_ref().is_some_and(Envelope::is_active);
        let Some(oscillator) = self.oscillator.filter(|_| sounding) else {
            return StereoSample::SILENCE;
        };

        let mut sample = oscillator.generate(self.frequency, self.sample_rate, &mut self.phase);
        if let Some(envelope) = self.envelope.as_mut() {
            sample *= envelope.process(self.note_on, self.sample_rate);
        }

        process_chain(&mut self.effects, StereoSample::mono(sample))
    }

    /// Fill `out` with consecutive frames.
    pub fn render_block(&mut self, out: &mut [StereoSample]) {
        for frame in out.iter_mut() {
            *frame = self.next_sample();
        }
    }

    /// Apply a parameter to every effect that owns it. Returns how many
    /// effects accepted the value.
    pub fn set_effect_param(&mut self, param: EffectParam) -> usize {
        self.effects
            .iter_mut()
            .filter(|effect| effect.kind() == param.target())
            .map(|effect| effect.apply_param(param))
            .filter(|&applied| applied)
            .count()
    }

    pub fn handle_message(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn { frequency } => {
                self.trigger_note(frequency);
            }
            SynthMessage::NoteOff | SynthMessage::AllNotesOff => self.trigger_note_off(),
            SynthMessage::SetParam(param) => {
                self.set_effect_param(param);
            }
        }
    }

    /// Drain every pending control message. Call at the top of each block.
    pub fn process_messages<R: MessageReceiver + ?Sized>(&mut self, rx: &mut R) {
        while let Some(msg) = rx.pop() {
            self.handle_message(msg);
        }
    }

    /// Swap the oscillator. `None` silences the engine.
    pub fn set_oscillator(&mut self, oscillator: Option<OscillatorKind>) {
        self.oscillator = oscillator;
    }

    pub fn oscillator(&self) -> Option<OscillatorKind> {
        self.oscillator
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn effect_kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.effects.iter().map(Effect::kind)
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    pub fn is_note_on(&self) -> bool {
        self.note_on
    }

    /// True while the engine would produce non-silent output.
    pub fn is_active(&self) -> bool {
        self.oscillator.is_some()
            && (self.note_on || self.envelope.as_ref().is_some_and(Envelope::is_active))
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl Default for SynthEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

fn valid_sample_rate(sample_rate: f32) -> Option<f32> {
    (sample_rate.is_finite() && sample_rate > 0.0).then_some(sample_rate)
}
