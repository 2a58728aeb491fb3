//! Session start handoff

use super::{CheckType, ParticipantName, SessionContext, StartError, Transcript};
use crate::service::{ConversationService, StartSessionRequest};

/// What the initiator hands to the conversation driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedSession {
    pub context: SessionContext,
    pub transcript: Transcript,
}

/// Validate the name locally, then open a session with the service.
///
/// A blank name never reaches the network. On failure nothing is created
/// and the caller can retry with the same or different input.
pub async fn start_session<S>(
    service: &S,
    name: &str,
    check_type: CheckType,
) -> Result<StartedSession, StartError>
where
    S: ConversationService + ?Sized,
{
    let participant = ParticipantName::parse(name)?;

    let request = StartSessionRequest {
        name: participant.as_str().to_string(),
        check_type,
    };
    let response = service.start_session(&request).await?;

    let transcript = Transcript::opened_with(response.message);
    let context = SessionContext::new(
        response.session_id,
        participant,
        check_type,
        response.progress,
    );

    Ok(StartedSession {
        context,
        transcript,
    })
}
