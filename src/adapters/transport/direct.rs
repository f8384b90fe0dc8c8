//! Direct transport: a JSON POST whose response body is the remote answer

use super::client::classify_request_error;
use super::traits::{Transport, TransportReply};
use crate::domain::{
    AttemptId, FailureReason, RemoteResponse, SubmissionPayload, TransportError, TransportKind,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Longest response body quoted in an HTTP error
const ERROR_BODY_LIMIT: usize = 500;

/// POSTs the payload as JSON and reads a [`RemoteResponse`] back
pub struct DirectTransport {
    client: Client,
    url: String,
    timeout: Duration,
}

impl DirectTransport {
    /// Create a direct transport
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client, usually from [`build_http_client`](super::build_http_client)
    /// * `url` - Submission endpoint
    /// * `timeout` - Request timeout, reported in timeout errors
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Transport for DirectTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Direct
    }

    async fn send(
        &self,
        payload: &SubmissionPayload,
        attempt: &AttemptId,
    ) -> Result<TransportReply, FailureReason> {
        tracing::debug!(url = %self.url, attempt_id = %attempt, "Posting submission");

        let response = self
            .client
            .post(&self.url)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(payload)
            .send()
            .await
            .map_err(|e| FailureReason::Transport(classify_request_error(&e, self.timeout)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FailureReason::Transport(TransportError::Http {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            }));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FailureReason::Transport(classify_request_error(&e, self.timeout)))?;

        let remote: RemoteResponse = serde_json::from_str(&body).map_err(|e| {
            FailureReason::Transport(TransportError::InvalidResponse(format!(
                "expected JSON with a 'success' field: {e}"
            )))
        })?;

        Ok(TransportReply::Acknowledged(remote))
    }
}
