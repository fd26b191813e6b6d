// Purpose - external interfaces: MIDI input, output sinks, format conversions

pub mod converter;
pub mod midi;
pub mod sink;

pub use converter::{freq_to_midi_note, midi_note_to_freq, midi_to_message, MonoNoteInput};
pub use midi::MidiEvent;
pub use sink::{render_interleaved, DoubleBuffer, Half, HalfSignal};
