//! Pure state transition function

use super::{ConvState, Effect, Event};
use crate::session::SessionContext;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Whether this transition ends the session
    #[cfg(test)]
    pub fn ends_session(&self) -> bool {
        self.effects.iter().any(|e| matches!(e, Effect::EndSession))
    }
}

/// Rejected events. The driver treats all of them as no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Still waiting for the previous reply")]
    AwaitingResponse,
    #[error("Check-in is complete; only reset is available")]
    Completed,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs and performs
/// no I/O. The driver owns the transcript and executes the effects.
pub fn transition(
    state: &ConvState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // User submits
        // ============================================================

        // The user turn is appended in the same step that starts the request,
        // so it is visible whatever happens to the network call.
        (ConvState::Composing, Event::UserSubmit { text }) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyMessage);
            }
            Ok(TransitionResult::new(ConvState::AwaitingResponse)
                .with_effect(Effect::append_user(text))
                .with_effect(Effect::send_message(text)))
        }

        (ConvState::AwaitingResponse, Event::UserSubmit { .. } | Event::UserAbandon) => {
            Err(TransitionError::AwaitingResponse)
        }

        (ConvState::Completed, Event::UserSubmit { .. } | Event::UserAbandon) => {
            Err(TransitionError::Completed)
        }

        // ============================================================
        // Service results
        // ============================================================
        (
            ConvState::AwaitingResponse,
            Event::ServiceReply {
                message,
                progress,
                completed,
            },
        ) => {
            let next = if completed {
                ConvState::Completed
            } else {
                ConvState::Composing
            };
            let progress_update = progress
                .filter(|p| *p != context.progress())
                .map(Effect::ReplaceProgress);

            Ok(TransitionResult::new(next)
                .with_effect(Effect::append_bot(message))
                .with_effects(progress_update))
        }

        // Recoverable: progress and session id are untouched, the user may retry
        (ConvState::AwaitingResponse, Event::ServiceFailed { .. }) => {
            Ok(TransitionResult::new(ConvState::Composing).with_effect(Effect::append_send_failure()))
        }

        // ============================================================
        // Leaving the session
        // ============================================================

        // Reset never touches the network
        (ConvState::Completed, Event::UserReset) => {
            Ok(TransitionResult::new(ConvState::Completed).with_effect(Effect::EndSession))
        }

        (ConvState::Composing, Event::UserAbandon) => {
            Ok(TransitionResult::new(ConvState::Composing)
                .with_effect(Effect::CancelRemoteSession)
                .with_effect(Effect::EndSession))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}
