//! Subsystem modules for the SanchAI weather assistant.

pub mod agents;
pub mod comms;
pub mod runtime;
pub mod tools;
