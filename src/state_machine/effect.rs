//! Effects produced by state transitions

use crate::session::{Progress, TurnOrigin, SEND_FAILED_TEXT};

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a turn to the transcript
    AppendTurn { origin: TurnOrigin, text: String },

    /// Replace the session's progress with a server-reported value
    ReplaceProgress(Progress),

    /// Issue the one `send-message` request for this exchange
    SendMessage { text: String },

    /// Best-effort `cancel-session` for an abandoned check-in
    CancelRemoteSession,

    /// Drop the session context and transcript, return to the welcome screen
    EndSession,
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendTurn {
            origin: TurnOrigin::User,
            text: text.into(),
        }
    }

    pub fn append_bot(text: impl Into<String>) -> Self {
        Effect::AppendTurn {
            origin: TurnOrigin::Bot,
            text: text.into(),
        }
    }

    pub fn append_send_failure() -> Self {
        Effect::AppendTurn {
            origin: TurnOrigin::Error,
            text: SEND_FAILED_TEXT.to_string(),
        }
    }

    pub fn send_message(text: impl Into<String>) -> Self {
        Effect::SendMessage { text: text.into() }
    }
}
