//! Append-only transcript of a session

use chrono::{DateTime, Local};

/// Text of the turn appended when a `send-message` call fails
pub const SEND_FAILED_TEXT: &str = "Sorry, there was an error. Please try again.";

/// Who a turn is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOrigin {
    User,
    Bot,
    Error,
}

/// One message unit in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub origin: TurnOrigin,
    pub text: String,
    pub sent_at: DateTime<Local>,
}

impl Turn {
    pub fn new(origin: TurnOrigin, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
            sent_at: Local::now(),
        }
    }
}

/// Ordered turns. There is no way to edit or remove one once pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript seeded with the service's opening message
    pub fn opened_with(message: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.push(Turn::new(TurnOrigin::Bot, message));
        transcript
    }

    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns with the given origin
    #[cfg(test)]
    pub fn count(&self, origin: TurnOrigin) -> usize {
        self.turns.iter().filter(|t| t.origin == origin).count()
    }
}
