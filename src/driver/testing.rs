//! Mock implementations for testing
//!
//! These mocks enable driver and app tests without real I/O.

use crate::service::{
    CancelSessionRequest, CancelSessionResponse, ConversationService, HealthResponse,
    SendMessageRequest, SendMessageResponse, ServiceError, StartSessionRequest,
    StartSessionResponse,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::{Notify, Semaphore};

// ============================================================================
// Mock Conversation Service
// ============================================================================

/// Mock service that returns queued responses and records every request
#[derive(Default)]
pub struct MockConversationService {
    start_responses: Mutex<VecDeque<Result<StartSessionResponse, ServiceError>>>,
    send_responses: Mutex<VecDeque<Result<SendMessageResponse, ServiceError>>>,
    start_requests: Mutex<Vec<StartSessionRequest>>,
    send_requests: Mutex<Vec<SendMessageRequest>>,
    cancel_requests: Mutex<Vec<CancelSessionRequest>>,
}

impl MockConversationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_start(&self, response: Result<StartSessionResponse, ServiceError>) {
        self.start_responses.lock().unwrap().push_back(response);
    }

    pub fn queue_send(&self, response: Result<SendMessageResponse, ServiceError>) {
        self.send_responses.lock().unwrap().push_back(response);
    }

    pub fn start_requests(&self) -> Vec<StartSessionRequest> {
        self.start_requests.lock().unwrap().clone()
    }

    pub fn send_requests(&self) -> Vec<SendMessageRequest> {
        self.send_requests.lock().unwrap().clone()
    }

    pub fn cancel_requests(&self) -> Vec<CancelSessionRequest> {
        self.cancel_requests.lock().unwrap().clone()
    }

    fn next_send(&self) -> Result<SendMessageResponse, ServiceError> {
        self.send_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::new("No mock response queued")))
    }
}

#[async_trait]
impl ConversationService for MockConversationService {
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<StartSessionResponse, ServiceError> {
        self.start_requests.lock().unwrap().push(request.clone());
        self.start_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::new("No mock response queued")))
    }

    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ServiceError> {
        self.send_requests.lock().unwrap().push(request.clone());
        self.next_send()
    }

    async fn cancel_session(
        &self,
        request: &CancelSessionRequest,
    ) -> Result<CancelSessionResponse, ServiceError> {
        self.cancel_requests.lock().unwrap().push(request.clone());
        Ok(CancelSessionResponse {
            message: "Session cancelled".to_string(),
        })
    }

    async fn health(&self) -> Result<HealthResponse, ServiceError> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
            timestamp: None,
        })
    }
}

// ============================================================================
// Gated Mock Service (for ordering tests)
// ============================================================================

/// Mock whose `send_message` holds every reply until [`Self::release`]
pub struct GatedMockService {
    inner: MockConversationService,
    gate: Semaphore,
    started: Notify,
}

impl GatedMockService {
    pub fn new() -> Self {
        Self {
            inner: MockConversationService::new(),
            gate: Semaphore::new(0),
            started: Notify::new(),
        }
    }

    pub fn queue_start(&self, response: Result<StartSessionResponse, ServiceError>) {
        self.inner.queue_start(response);
    }

    pub fn queue_send(&self, response: Result<SendMessageResponse, ServiceError>) {
        self.inner.queue_send(response);
    }

    pub fn send_requests(&self) -> Vec<SendMessageRequest> {
        self.inner.send_requests()
    }

    /// Let one held reply through
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    /// Resolves once a `send_message` call has reached the gate
    pub async fn request_started(&self) {
        self.started.notified().await;
    }
}

#[async_trait]
impl ConversationService for GatedMockService {
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<StartSessionResponse, ServiceError> {
        self.inner.start_session(request).await
    }

    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ServiceError> {
        self.inner.send_requests.lock().unwrap().push(request.clone());
        self.started.notify_one();
        self.gate
            .acquire()
            .await
            .map_err(|_| ServiceError::new("gate closed"))?
            .forget();
        self.inner.next_send()
    }

    async fn cancel_session(
        &self,
        request: &CancelSessionRequest,
    ) -> Result<CancelSessionResponse, ServiceError> {
        self.inner.cancel_session(request).await
    }

    async fn health(&self) -> Result<HealthResponse, ServiceError> {
        self.inner.health().await
    }
}
