//! Conversation service abstraction
//!
//! The service decides what to ask next and when a check-in is complete.
//! This client only sees its request/response contract.

mod error;
mod http;
mod types;

pub use error::ServiceError;
pub use http::HttpConversationService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Remote conversation service
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Open a new check-in session
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<StartSessionResponse, ServiceError>;

    /// Submit one user turn and receive the next bot turn
    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ServiceError>;

    /// Tell the service an unfinished session is being abandoned
    async fn cancel_session(
        &self,
        request: &CancelSessionRequest,
    ) -> Result<CancelSessionResponse, ServiceError>;

    /// Liveness probe
    async fn health(&self) -> Result<HealthResponse, ServiceError>;
}

#[async_trait]
impl<T: ConversationService + ?Sized> ConversationService for Arc<T> {
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<StartSessionResponse, ServiceError> {
        (**self).start_session(request).await
    }

    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ServiceError> {
        (**self).send_message(request).await
    }

    async fn cancel_session(
        &self,
        request: &CancelSessionRequest,
    ) -> Result<CancelSessionResponse, ServiceError> {
        (**self).cancel_session(request).await
    }

    async fn health(&self) -> Result<HealthResponse, ServiceError> {
        (**self).health().await
    }
}

/// Logging wrapper for conversation services
pub struct LoggingService<S> {
    inner: S,
}

impl<S: ConversationService> LoggingService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

fn log_outcome<T>(endpoint: &str, started: Instant, result: &Result<T, ServiceError>) {
    let duration = started.elapsed();
    match result {
        Ok(_) => {
            tracing::info!(
                endpoint,
                duration_ms = %duration.as_millis(),
                "Service request completed"
            );
        }
        Err(e) => {
            tracing::error!(
                endpoint,
                duration_ms = %duration.as_millis(),
                error = %e.detail,
                "Service request failed"
            );
        }
    }
}

#[async_trait]
impl<S: ConversationService> ConversationService for LoggingService<S> {
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<StartSessionResponse, ServiceError> {
        let start = Instant::now();
        let result = self.inner.start_session(request).await;
        log_outcome("start-session", start, &result);
        if let Ok(response) = &result {
            tracing::info!(
                session_id = %response.session_id,
                check_type = %request.check_type,
                total = response.progress.total,
                "Session opened"
            );
        }
        result
    }

    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ServiceError> {
        let start = Instant::now();
        let result = self.inner.send_message(request).await;
        log_outcome("send-message", start, &result);
        tracing::debug!(
            session_id = %request.session_id,
            message_len = request.message.len(),
            "Sent user turn"
        );
        result
    }

    async fn cancel_session(
        &self,
        request: &CancelSessionRequest,
    ) -> Result<CancelSessionResponse, ServiceError> {
        let start = Instant::now();
        let result = self.inner.cancel_session(request).await;
        log_outcome("cancel-session", start, &result);
        if let Ok(response) = &result {
            tracing::debug!(
                session_id = %request.session_id,
                reply = %response.message,
                "Session cancelled"
            );
        }
        result
    }

    async fn health(&self) -> Result<HealthResponse, ServiceError> {
        let start = Instant::now();
        let result = self.inner.health().await;
        log_outcome("health", start, &result);
        result
    }
}
