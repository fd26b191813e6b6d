// Purpose: note tables and the built-in test sequences

pub mod notes;
pub mod sequencer;

pub use sequencer::{Sequence, SequenceNote, Sequencer, LOOP_GAP_SECONDS};
