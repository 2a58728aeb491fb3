//! Events that drive the conversation

use crate::session::Progress;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    UserSubmit {
        text: String,
    },
    /// Leave an unfinished check-in
    UserAbandon,
    /// Leave a completed check-in
    UserReset,

    // Service events
    ServiceReply {
        message: String,
        /// Absent when the service did not report progress
        progress: Option<Progress>,
        completed: bool,
    },
    ServiceFailed {
        detail: String,
    },
}
