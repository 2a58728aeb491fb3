//! Check-in session model
//!
//! A session context exists exactly while a check-in is active. It is
//! created by [`start_session`] and handed to the conversation driver.

mod context;
mod initiator;
mod transcript;

pub use context::{CheckType, ParticipantName, Progress, SessionContext};
pub use initiator::{start_session, StartedSession};
pub use transcript::{Transcript, Turn, TurnOrigin, SEND_FAILED_TEXT};

use crate::service::ServiceError;
use thiserror::Error;

/// Shown under the welcome form when the service call fails
pub const START_FAILED_TEXT: &str = "Failed to start session. Please try again.";

/// Input rejected before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your name")]
    EmptyName,
}

/// Why a session could not be started
#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("start-session failed: {0}")]
    Service(#[from] ServiceError),
}

impl StartError {
    /// Text for the inline form error
    pub fn user_message(&self) -> String {
        match self {
            StartError::Validation(e) => e.to_string(),
            StartError::Service(_) => START_FAILED_TEXT.to_string(),
        }
    }
}
