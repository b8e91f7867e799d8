//! Message id generation.
//!
//! Ids only need to be unique within one conversation. The generator is
//! injected into the controller so tests can use a plain counter instead of
//! depending on wall-clock uniqueness.

use chrono::Utc;

use crate::message::{MessageId, GREETING_ID};

/// Source of fresh message ids.
pub trait IdGenerator: Send {
    /// Return an id never returned before by this generator.
    fn next_id(&mut self) -> MessageId;
}

/// Counter-based ids: `start`, `start + 1`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Start counting at `start`.
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }
}

impl Default for SequentialIds {
    /// Start right after the greeting id.
    fn default() -> Self {
        Self::starting_at(GREETING_ID.0 + 1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> MessageId {
        let id = MessageId(self.next);
        self.next += 1;
        id
    }
}

/// Millisecond timestamp ids.
///
/// Two ids drawn within the same millisecond (or after the clock steps
/// backwards) are bumped past the last issued id, so ids stay strictly
/// increasing.
#[derive(Debug, Clone, Default)]
pub struct ClockIds {
    last: u64,
}

impl ClockIds {
    /// Create a generator that has not issued any ids yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self, now_ms: u64) -> MessageId {
        let floor = self.last.max(GREETING_ID.0);
        let id = if now_ms > floor { now_ms } else { floor + 1 };
        self.last = id;
        MessageId(id)
    }
}

impl IdGenerator for ClockIds {
    fn next_id(&mut self) -> MessageId {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.issue(now_ms)
    }
}
