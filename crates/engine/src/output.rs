//! The output sequence abstraction (C10): an ordered, append-only sink
//! for the three event shapes a transition can produce, plus a terminal
//! `flush` that replays them to whatever transport the host provides.
//!
//! Grounded in `original_source/dfsm/tests/test-output-sequence.c`'s
//! assert-on-replay test harness: a real bus sink and a recording sink
//! share the same three-appender-plus-flush shape, so the executor never
//! needs to know which one it's writing to.

use std::error;

use crate::value::Value;

/// One event appended to an [`OutputSequence`] by the statement executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A method reply, carrying the reply tuple.
    Reply(Value),
    /// A D-Bus error reply: the error name and a synthesised message.
    Throw { error_name: String, message: String },
    /// A signal emission: the declaring interface, the signal name, and
    /// its argument tuple.
    Emit {
        interface: String,
        signal: String,
        value: Value,
    },
}

/// The first transport failure encountered by `flush`, boxed so sinks
/// backed by arbitrary transports (a real bus connection, a test
/// harness) can report their own error type.
pub type FlushError = Box<dyn error::Error + Send + Sync + 'static>;

/// An ordered sink for reply/throw/emit events. Appenders are infallible
/// — nothing about appending to an in-memory buffer can fail — and
/// `flush` is the single fallible operation, replaying the buffered
/// events to the underlying transport in the order they were appended
/// and aborting on the first error.
pub trait OutputSequence {
    fn add_reply(&mut self, value: Value);
    fn add_throw(&mut self, error_name: String, message: String);
    fn add_emit(&mut self, interface: String, signal: String, value: Value);
    fn flush(&mut self) -> Result<(), FlushError>;
}

/// An in-memory sink that records every event, for use by tests and any
/// host that wants to inspect a batch before forwarding it.
#[derive(Debug, Default)]
pub struct RecordingSequence {
    events: Vec<Event>,
}

impl RecordingSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// The events appended since the last `flush`, in append order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain and return the buffered events without going through
    /// `flush`'s `Result` plumbing; useful in tests that don't care
    /// about transport failure.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl OutputSequence for RecordingSequence {
    fn add_reply(&mut self, value: Value) {
        self.events.push(Event::Reply(value));
    }

    fn add_throw(&mut self, error_name: String, message: String) {
        self.events.push(Event::Throw { error_name, message });
    }

    fn add_emit(&mut self, interface: String, signal: String, value: Value) {
        self.events.push(Event::Emit {
            interface,
            signal,
            value,
        });
    }

    fn flush(&mut self) -> Result<(), FlushError> {
        // Nothing to replay to; a real transport sink overrides this.
        Ok(())
    }
}

/// A sink that discards every event. Useful for fuzz-only exploration of
/// the state space, where only the final machine state matters.
#[derive(Debug, Default)]
pub struct NullSequence;

impl NullSequence {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSequence for NullSequence {
    fn add_reply(&mut self, _value: Value) {}
    fn add_throw(&mut self, _error_name: String, _message: String) {}
    fn add_emit(&mut self, _interface: String, _signal: String, _value: Value) {}
    fn flush(&mut self) -> Result<(), FlushError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sequence_preserves_append_order() {
        let mut seq = RecordingSequence::new();
        seq.add_reply(Value::Boolean(true));
        seq.add_emit("org.example.Thing".into(), "Changed".into(), Value::Uint32(1));
        seq.add_throw("org.example.Error".into(), "boom".into());
        seq.flush().unwrap();

        assert_eq!(
            seq.events(),
            &[
                Event::Reply(Value::Boolean(true)),
                Event::Emit {
                    interface: "org.example.Thing".into(),
                    signal: "Changed".into(),
                    value: Value::Uint32(1),
                },
                Event::Throw {
                    error_name: "org.example.Error".into(),
                    message: "boom".into(),
                },
            ]
        );
    }

    #[test]
    fn null_sequence_discards_everything() {
        let mut seq = NullSequence::new();
        seq.add_reply(Value::Boolean(true));
        seq.add_throw("x".into(), "y".into());
        seq.flush().unwrap();
    }
}
