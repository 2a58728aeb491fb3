//! HTTP implementation of the conversation service

use super::types::{
    CancelSessionRequest, CancelSessionResponse, HealthResponse, SendMessageRequest,
    SendMessageResponse, StartSessionRequest, StartSessionResponse,
};
use super::{ConversationService, ServiceError};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Talks JSON over HTTP to `{api_url}/{endpoint}`
pub struct HttpConversationService {
    client: Client,
    config: ClientConfig,
}

impl HttpConversationService {
    pub fn new(config: ClientConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ServiceError::new(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.config.endpoint(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::transport(&e))?;

        read_json(response).await
    }

    async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ServiceError> {
        let response = self
            .client
            .get(self.config.endpoint(endpoint))
            .send()
            .await
            .map_err(|e| ServiceError::transport(&e))?;

        read_json(response).await
    }
}

async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ServiceError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ServiceError::transport(&e))?;

    if !status.is_success() {
        return Err(ServiceError::status(status, &body));
    }

    serde_json::from_str(&body).map_err(ServiceError::decode)
}

#[async_trait]
impl ConversationService for HttpConversationService {
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<StartSessionResponse, ServiceError> {
        self.post("start-session", request).await
    }

    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ServiceError> {
        self.post("send-message", request).await
    }

    async fn cancel_session(
        &self,
        request: &CancelSessionRequest,
    ) -> Result<CancelSessionResponse, ServiceError> {
        self.post("cancel-session", request).await
    }

    async fn health(&self) -> Result<HealthResponse, ServiceError> {
        self.get("health").await
    }
}
