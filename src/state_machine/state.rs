//! Conversation state

/// State of the active check-in conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvState {
    /// Input enabled, waiting for the user's reply
    #[default]
    Composing,

    /// A `send-message` request is in flight; input disabled
    AwaitingResponse,

    /// The service reported the check-in complete; only reset remains
    Completed,
}

impl ConvState {
    /// Whether a submit would be accepted
    pub fn accepts_input(self) -> bool {
        matches!(self, ConvState::Composing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ConvState::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConvState::Composing => "composing",
            ConvState::AwaitingResponse => "awaiting_response",
            ConvState::Completed => "completed",
        }
    }
}
