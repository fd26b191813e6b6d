// Purpose: the monophonic engine, its configuration and the control messages
// that reach it from other threads

pub mod config;
pub mod engine;
pub mod message;
