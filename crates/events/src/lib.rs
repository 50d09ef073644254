//! Event and command abstractions shared by event-driven aggregates.

pub mod command;
pub mod envelope;
pub mod event;

pub use command::Command;
pub use envelope::{EventEnvelope, verify_stream};
pub use event::Event;
