#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{effects::EffectParam, MAX_NOTE_FREQUENCY};

/// Control events sent from the GUI/MIDI/sequencer side to the engine.
///
/// Values are moved whole through the queue, so the audio thread never sees
/// a half-written frequency.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { frequency: f32 },
    NoteOff,
    SetParam(EffectParam),
    AllNotesOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Plain queues work too (tests, offline rendering).
impl MessageReceiver for std::collections::VecDeque<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        self.pop_front()
    }
}

#[cfg(feature = "rtrb")]
pub const MESSAGE_QUEUE_SIZE: usize = 64;

/// Producer side of the engine's message queue.
///
/// Lives on a control thread. Every method is wait-free; when the queue is
/// full the message is dropped and `false` returned.
#[cfg(feature = "rtrb")]
pub struct SynthHandle {
    tx: Producer<SynthMessage>,
}

#[cfg(feature = "rtrb")]
impl SynthHandle {
    /// Create a handle and the consumer end the audio thread drains.
    pub fn channel(capacity: usize) -> (Self, Consumer<SynthMessage>) {
        let (tx, rx) = RingBuffer::<SynthMessage>::new(capacity.max(1));
        (Self { tx }, rx)
    }

    pub fn note_on(&mut self, frequency: f32) -> bool {
        if !(frequency > 0.0 && frequency <= MAX_NOTE_FREQUENCY) {
            tracing::debug!(frequency, "ignoring note outside the playable range");
            return false;
        }
        self.send(SynthMessage::NoteOn { frequency })
    }

    pub fn note_off(&mut self) -> bool {
        self.send(SynthMessage::NoteOff)
    }

    pub fn all_notes_off(&mut self) -> bool {
        self.send(SynthMessage::AllNotesOff)
    }

    pub fn set_param(&mut self, param: EffectParam) -> bool {
        self.send(SynthMessage::SetParam(param))
    }

    pub fn send(&mut self, msg: SynthMessage) -> bool {
        match self.tx.push(msg) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(?msg, "synth message queue full, dropping message");
                false
            }
        }
    }
}
