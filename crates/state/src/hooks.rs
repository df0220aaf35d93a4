use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::message::MessageId;

/// Default label stamped on sent messages and on the preview they produce.
pub const JUST_NOW_LABEL: &str = "Just now";

/// Produces ids for messages created by the store.
pub trait IdSource {
    fn next_id(&mut self) -> MessageId;
}

impl<F> IdSource for F
where
    F: FnMut() -> MessageId,
{
    fn next_id(&mut self) -> MessageId {
        self()
    }
}

/// Wall-clock ids in milliseconds since the unix epoch.
///
/// Two sends inside the same millisecond would collide, so the source never hands
/// out an id lower than or equal to the previous one.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: u64,
}

impl ClockIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for ClockIds {
    fn next_id(&mut self) -> MessageId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64;
        self.last = now.max(self.last.saturating_add(1));
        MessageId::new(self.last)
    }
}

/// Formats the time label for a message sent right now.
pub trait TimeLabeler {
    fn label(&self) -> String;
}

/// Labeler returning the same text on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLabel(pub String);

impl Default for FixedLabel {
    fn default() -> Self {
        Self(JUST_NOW_LABEL.to_string())
    }
}

impl TimeLabeler for FixedLabel {
    fn label(&self) -> String {
        self.0.clone()
    }
}
