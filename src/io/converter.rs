use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// Map a note event on `channel_filter` to an engine message.
///
/// Stateless: every note-off becomes [`SynthMessage::NoteOff`], whichever key
/// it names. Use [`MonoNoteInput`] to ignore releases of keys that are no
/// longer sounding.
pub fn midi_to_message(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn { channel, key, .. } if channel == channel_filter => {
            Some(SynthMessage::NoteOn {
                frequency: midi_note_to_freq(key),
            })
        }
        MidiEvent::NoteOff { channel, .. } if channel == channel_filter => {
            Some(SynthMessage::NoteOff)
        }
        _ => None,
    }
}

/// Last-note priority for a single voice.
///
/// Pressing a new key retriggers; releasing a key only stops the sound if it
/// is the key currently playing.
#[derive(Debug, Default, Clone)]
pub struct MonoNoteInput {
    channel: u8,
    active_key: Option<u8>,
}

impl MonoNoteInput {
    pub fn new(channel: u8) -> Self {
        Self {
            channel,
            active_key: None,
        }
    }

    pub fn handle(&mut self, midi: MidiEvent) -> Option<SynthMessage> {
        match midi {
            MidiEvent::NoteOn { channel, key, .. } if channel == self.channel => {
                self.active_key = Some(key);
                midi_to_message(midi, self.channel)
            }
            MidiEvent::NoteOff { channel, key, .. }
                if channel == self.channel && self.active_key == Some(key) =>
            {
                self.active_key = None;
                Some(SynthMessage::NoteOff)
            }
            _ => None,
        }
    }

    pub fn active_key(&self) -> Option<u8> {
        self.active_key
    }
}

/// Equal-tempered frequency, A4 (note 69) = 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Nearest MIDI note for `frequency`, clamped to 0..=127. Non-positive input
/// maps to 0.
pub fn freq_to_midi_note(frequency: f32) -> u8 {
    if !(frequency > 0.0) {
        return 0;
    }
    let note = (69.0 + 12.0 * (frequency / 440.0).log2()).round();
    note.clamp(0.0, 127.0) as u8
}
