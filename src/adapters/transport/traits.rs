//! Transport abstraction
//!
//! A transport hands one payload to the remote endpoint. It does not retry
//! and it does not judge the remote answer; the delivery strategy does both.

use crate::domain::{AttemptId, FailureReason, RemoteResponse, SubmissionPayload, TransportKind};
use async_trait::async_trait;

/// What a transport got back from one send
#[derive(Debug, Clone, PartialEq)]
pub enum TransportReply {
    /// The endpoint answered with a structured response
    Acknowledged(RemoteResponse),

    /// The payload left but the transport cannot observe any answer
    Dispatched,
}

/// Transport trait implemented by every delivery channel
#[async_trait]
pub trait Transport: Send + Sync {
    /// Which channel this is
    fn kind(&self) -> TransportKind;

    /// Send a payload once
    ///
    /// # Errors
    ///
    /// Returns [`FailureReason::Invalid`] when the payload cannot be expressed
    /// on this channel and [`FailureReason::Transport`] when sending failed.
    async fn send(
        &self,
        payload: &SubmissionPayload,
        attempt: &AttemptId,
    ) -> Result<TransportReply, FailureReason>;
}
