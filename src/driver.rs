//! Conversation driver
//!
//! Owns the active session: context, transcript and state. Events go through
//! the pure transition function and the resulting effects are executed here.
//! The single `send-message` request runs as a spawned task whose outcome
//! comes back as an [`Event`] on the driver's channel.

#[cfg(test)]
pub mod testing;

use crate::service::{CancelSessionRequest, ConversationService, SendMessageRequest};
use crate::session::{Progress, SessionContext, StartedSession, Transcript, Turn};
use crate::state_machine::{transition, ConvState, Effect, Event, TransitionError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// How long shutdown waits for a best-effort `cancel-session`
const CANCEL_GRACE: Duration = Duration::from_secs(2);

/// Whether the session survived a dispatched event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    Active,
    /// Context and transcript are done; return to the welcome screen
    Ended,
}

pub struct ConversationDriver<S>
where
    S: ConversationService + 'static,
{
    context: SessionContext,
    transcript: Transcript,
    state: ConvState,
    service: Arc<S>,
    event_tx: mpsc::Sender<Event>,
    event_rx: mpsc::Receiver<Event>,
    /// Pending best-effort cancel call, see [`Self::into_pending_cancel`]
    cancel_task: Option<JoinHandle<()>>,
}

impl<S> ConversationDriver<S>
where
    S: ConversationService + 'static,
{
    pub fn new(started: StartedSession, service: Arc<S>) -> Self {
        // One exchange in flight at a time, so one slot is enough
        let (event_tx, event_rx) = mpsc::channel(1);
        tracing::info!(
            session_id = %started.context.session_id(),
            progress = %started.context.progress(),
            "Conversation started"
        );
        Self {
            context: started.context,
            transcript: started.transcript,
            state: ConvState::Composing,
            service,
            event_tx,
            event_rx,
            cancel_task: None,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> ConvState {
        self.state
    }

    pub fn progress(&self) -> Progress {
        self.context.progress()
    }

    /// Submit a user reply. Rejected submits change nothing.
    pub fn submit(&mut self, text: &str) -> Result<DriverStatus, TransitionError> {
        self.dispatch(Event::UserSubmit {
            text: text.to_string(),
        })
    }

    /// Leave a completed check-in. No network call is made.
    pub fn reset(&mut self) -> Result<DriverStatus, TransitionError> {
        self.dispatch(Event::UserReset)
    }

    /// Leave an unfinished check-in while composing
    pub fn abandon(&mut self) -> Result<DriverStatus, TransitionError> {
        self.dispatch(Event::UserAbandon)
    }

    /// Wait for the outcome of the in-flight request.
    ///
    /// Cancel safe. Pends forever when nothing is in flight.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    /// Wait for the in-flight request and apply its outcome
    #[cfg(test)]
    pub async fn settle(&mut self) -> Result<DriverStatus, TransitionError> {
        match self.next_event().await {
            Some(event) => self.dispatch(event),
            None => Ok(DriverStatus::Active),
        }
    }

    pub fn dispatch(&mut self, event: Event) -> Result<DriverStatus, TransitionError> {
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(
                    session_id = %self.context.session_id(),
                    state = self.state.as_str(),
                    reason = %e,
                    "Ignored event"
                );
                return Err(e);
            }
        };

        let old_state = std::mem::replace(&mut self.state, result.new_state);
        if old_state != self.state {
            tracing::debug!(
                session_id = %self.context.session_id(),
                from = old_state.as_str(),
                to = self.state.as_str(),
                "State transition"
            );
        }

        let mut status = DriverStatus::Active;
        for effect in result.effects {
            if self.execute_effect(effect) == DriverStatus::Ended {
                status = DriverStatus::Ended;
            }
        }
        Ok(status)
    }

    fn execute_effect(&mut self, effect: Effect) -> DriverStatus {
        match effect {
            Effect::AppendTurn { origin, text } => {
                self.transcript.push(Turn::new(origin, text));
            }
            Effect::ReplaceProgress(progress) => {
                self.context.replace_progress(progress);
            }
            Effect::SendMessage { text } => self.spawn_send(text),
            Effect::CancelRemoteSession => self.spawn_cancel(),
            Effect::EndSession => {
                tracing::info!(
                    session_id = %self.context.session_id(),
                    completed = self.state.is_terminal(),
                    turns = self.transcript.len(),
                    "Session ended"
                );
                return DriverStatus::Ended;
            }
        }
        DriverStatus::Active
    }

    fn spawn_send(&self, text: String) {
        let service = Arc::clone(&self.service);
        let event_tx = self.event_tx.clone();
        let request = SendMessageRequest {
            session_id: self.context.session_id().to_string(),
            message: text,
        };

        tokio::spawn(async move {
            let event = match service.send_message(&request).await {
                Ok(response) => Event::ServiceReply {
                    message: response.message,
                    progress: response.progress,
                    completed: response.completed,
                },
                Err(e) => Event::ServiceFailed { detail: e.detail },
            };
            // The driver may already be gone
            let _ = event_tx.send(event).await;
        });
    }

    fn spawn_cancel(&mut self) {
        let service = Arc::clone(&self.service);
        let request = CancelSessionRequest {
            session_id: self.context.session_id().to_string(),
        };

        self.cancel_task = Some(tokio::spawn(async move {
            if let Err(e) = service.cancel_session(&request).await {
                tracing::warn!(
                    session_id = %request.session_id,
                    error = %e,
                    "Failed to cancel session"
                );
            }
        }));
    }

    /// Drop the session, handing over a cancel call that may still be running
    pub fn into_pending_cancel(self) -> Option<JoinHandle<()>> {
        self.cancel_task.filter(|task| !task.is_finished())
    }
}

/// Give pending cancel calls a moment to land before exit
pub async fn wait_for_cancels(tasks: Vec<JoinHandle<()>>) {
    if tasks.is_empty() {
        return;
    }
    let pending = tasks.len();
    if tokio::time::timeout(CANCEL_GRACE, futures::future::join_all(tasks))
        .await
        .is_err()
    {
        tracing::warn!(pending, "Gave up waiting for cancel-session");
    }
}
