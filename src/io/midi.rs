/*
MIDI Channel Messages
=====================

Only the channel-voice messages a monophonic synth cares about are decoded.
A message is a status byte followed by one or two data bytes:

  status   high nibble = message type, low nibble = channel (0-15)
  data     7-bit values (0-127)

  0x8n key vel        Note Off
  0x9n key vel        Note On (velocity 0 means Note Off)
  0xBn ctrl val       Control Change
  0xCn prog           Program Change
  0xEn lsb msb        Pitch Bend, 14-bit, centre 0x2000

Running status, SysEx and realtime bytes are not handled here; the caller
hands over complete messages.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Signed offset from centre, -8192..=8191.
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode one complete message. Returns `None` for anything that is not a
    /// supported channel message or is too short.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status & 0x80 == 0 {
            return None;
        }

        let channel = status & 0x0F;
        let data_at = |i: usize| data.get(i).map(|b| b & 0x7F);

        let event = match status & 0xF0 {
            0x80 => MidiEvent::NoteOff {
                channel,
                key: data_at(0)?,
                velocity: data_at(1)?,
            },
            0x90 => {
                let key = data_at(0)?;
                let velocity = data_at(1)?;
                if velocity == 0 {
                    MidiEvent::NoteOff {
                        channel,
                        key,
                        velocity,
                    }
                } else {
                    MidiEvent::NoteOn {
                        channel,
                        key,
                        velocity,
                    }
                }
            }
            0xB0 => MidiEvent::ControlChange {
                channel,
                controller: data_at(0)?,
                value: data_at(1)?,
            },
            0xC0 => MidiEvent::ProgramChange {
                channel,
                program: data_at(0)?,
            },
            0xE0 => {
                let raw = (data_at(1)? as i16) << 7 | data_at(0)? as i16;
                MidiEvent::PitchBend {
                    channel,
                    value: raw - 0x2000,
                }
            }
            _ => return None,
        };

        Some(event)
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}
