//! Hidden-frame transport
//!
//! Posts the payload as a single `payload` form field and never reads the
//! answer, the way a form targeting an invisible frame would. A send that
//! leaves the client resolves to [`TransportReply::Dispatched`]; confirmation
//! is left to the verification reconciler.

use super::traits::{Transport, TransportReply};
use crate::domain::{AttemptId, FailureReason, SubmissionPayload, TransportError, TransportKind};
use async_trait::async_trait;
use reqwest::Client;
use tracing::Instrument;

/// Form field carrying the JSON payload
pub const PAYLOAD_FIELD: &str = "payload";

/// Fire-and-forget form post
pub struct HiddenFrameTransport {
    client: Client,
    url: String,
}

impl HiddenFrameTransport {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Transport for HiddenFrameTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::HiddenFrame
    }

    async fn send(
        &self,
        payload: &SubmissionPayload,
        attempt: &AttemptId,
    ) -> Result<TransportReply, FailureReason> {
        let body = serde_json::to_string(payload).map_err(|e| {
            FailureReason::Transport(TransportError::InvalidResponse(format!(
                "payload could not be serialized: {e}"
            )))
        })?;

        let request = self
            .client
            .post(&self.url)
            .form(&[(PAYLOAD_FIELD, body)]);

        let span = tracing::debug_span!("hidden_frame_post", attempt_id = %attempt);
        tokio::spawn(
            async move {
                match request.send().await {
                    Ok(response) => {
                        tracing::debug!(status = response.status().as_u16(), "Hidden frame post sent")
                    }
                    Err(e) => tracing::warn!(
                        error = %e,
                        "Hidden frame post failed; delivery will be settled by verification"
                    ),
                }
            }
            .instrument(span),
        );

        Ok(TransportReply::Dispatched)
    }
}
