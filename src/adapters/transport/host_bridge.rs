//! Host-bridge transport
//!
//! Some hosts expose the endpoint as a named procedure rather than a URL:
//! the client calls it with one argument and registers a success slot and a
//! failure slot, exactly one of which fires. [`HostBridge`] models that
//! calling convention; [`HttpProcedureBridge`] implements it over a JSON
//! "run procedure" endpoint.

use super::client::classify_request_error;
use super::traits::{Transport, TransportReply};
use crate::domain::{
    AttemptId, FailureReason, RemoteResponse, SubmissionPayload, TransportError, TransportKind,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// What the bridge reported
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeSignal {
    Success(Value),
    /// The procedure ran and reported an error
    Failure(String),
    /// The procedure could not be reached
    Unreachable(TransportError),
}

/// Success and failure slots handed to a bridge call
///
/// Firing either slot consumes the callbacks, so a call reports once.
/// Dropping them unfired is reported to the caller as a transport failure.
#[derive(Debug)]
pub struct BridgeCallbacks {
    slot: oneshot::Sender<BridgeSignal>,
}

impl BridgeCallbacks {
    pub fn channel() -> (Self, oneshot::Receiver<BridgeSignal>) {
        let (slot, receiver) = oneshot::channel();
        (Self { slot }, receiver)
    }

    /// Fire the success slot with the procedure's return value
    pub fn success(self, value: Value) {
        let _ = self.slot.send(BridgeSignal::Success(value));
    }

    /// Fire the failure slot with the host's error message
    pub fn failure(self, message: impl Into<String>) {
        let _ = self.slot.send(BridgeSignal::Failure(message.into()));
    }

    /// Report that the call never reached the procedure
    pub fn unreachable(self, error: TransportError) {
        let _ = self.slot.send(BridgeSignal::Unreachable(error));
    }
}

/// Host-provided asynchronous procedure call
pub trait HostBridge: Send + Sync {
    /// Start `procedure` with one argument; the outcome arrives on `callbacks`
    fn run(&self, procedure: &str, argument: Value, callbacks: BridgeCallbacks);
}

/// Delivers by calling a host procedure
pub struct HostBridgeTransport {
    bridge: Arc<dyn HostBridge>,
    procedure: String,
    timeout: Duration,
}

impl HostBridgeTransport {
    pub fn new(bridge: Arc<dyn HostBridge>, procedure: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bridge,
            procedure: procedure.into(),
            timeout,
        }
    }
}

/// Interprets a success value from the bridge
///
/// An object carrying a boolean `success` field is the endpoint's answer.
/// Anything else means the call went through without a readable answer.
fn interpret_success(value: Value) -> TransportReply {
    let has_verdict = value
        .get("success")
        .map(Value::is_boolean)
        .unwrap_or(false);
    if !has_verdict {
        return TransportReply::Dispatched;
    }
    match serde_json::from_value::<RemoteResponse>(value) {
        Ok(response) => TransportReply::Acknowledged(response),
        Err(_) => TransportReply::Dispatched,
    }
}

#[async_trait]
impl Transport for HostBridgeTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::HostBridge
    }

    async fn send(
        &self,
        payload: &SubmissionPayload,
        attempt: &AttemptId,
    ) -> Result<TransportReply, FailureReason> {
        let argument = serde_json::to_value(payload).map_err(|e| {
            FailureReason::Transport(TransportError::InvalidResponse(format!(
                "payload could not be serialized: {e}"
            )))
        })?;

        let (callbacks, receiver) = BridgeCallbacks::channel();
        tracing::debug!(
            procedure = %self.procedure,
            attempt_id = %attempt,
            "Invoking host procedure"
        );
        self.bridge.run(&self.procedure, argument, callbacks);

        match tokio::time::timeout(self.timeout, receiver).await {
            Ok(Ok(BridgeSignal::Success(value))) => Ok(interpret_success(value)),
            Ok(Ok(BridgeSignal::Failure(message))) => Err(FailureReason::ServerRejection(message)),
            Ok(Ok(BridgeSignal::Unreachable(error))) => Err(FailureReason::Transport(error)),
            Ok(Err(_)) => Err(FailureReason::Transport(TransportError::Connection(
                "host bridge dropped the call without answering".to_string(),
            ))),
            Err(_) => Err(FailureReason::Transport(TransportError::Timeout(self.timeout))),
        }
    }
}

/// Bridge that runs procedures through an HTTP endpoint
///
/// Posts `{"function": <procedure>, "parameters": [<argument>]}` and reads
/// either `{"response": {"result": ...}}` or `{"error": {...}}` back; any
/// other JSON body is treated as the result itself. Connection failures and
/// non-success statuses are reported as unreachable, never as a rejection.
pub struct HttpProcedureBridge {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpProcedureBridge {
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

impl HostBridge for HttpProcedureBridge {
    fn run(&self, procedure: &str, argument: Value, callbacks: BridgeCallbacks) {
        let request = self.client.post(&self.url).json(&json!({
            "function": procedure,
            "parameters": [argument],
        }));
        let timeout = self.timeout;

        tokio::spawn(async move {
            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => return callbacks.unreachable(classify_request_error(&e, timeout)),
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return callbacks.unreachable(TransportError::Http {
                    status: status.as_u16(),
                    body: body.chars().take(500).collect(),
                });
            }

            match response.json::<Value>().await {
                Ok(body) => settle_procedure_body(body, callbacks),
                // The call ran but its answer is unreadable.
                Err(_) => callbacks.success(Value::Null),
            }
        });
    }
}

fn settle_procedure_body(body: Value, callbacks: BridgeCallbacks) {
    if let Some(error) = body.get("error") {
        let message = error
            .pointer("/details/0/errorMessage")
            .or_else(|| error.get("message"))
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return callbacks.failure(message);
    }

    match body.pointer("/response/result") {
        Some(result) => callbacks.success(result.clone()),
        None => callbacks.success(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::delivery::{DeliveryStrategy, RetryPolicy};
    use crate::core::schedule::RecordingScheduler;
    use crate::domain::{AttemptStatus, DeliveryOutcome, TrackingCode};
    use std::sync::Mutex;

    /// Bridge that answers every call with a fixed reaction
    struct FixedBridge {
        reaction: Mutex<Option<Box<dyn FnOnce(BridgeCallbacks) + Send>>>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl FixedBridge {
        fn new(reaction: impl FnOnce(BridgeCallbacks) + Send + 'static) -> Arc<Self> {
            Arc::new(Self {
                reaction: Mutex::new(Some(Box::new(reaction))),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    impl HostBridge for FixedBridge {
        fn run(&self, procedure: &str, argument: Value, callbacks: BridgeCallbacks) {
            self.calls
                .lock()
                .unwrap()
                .push((procedure.to_string(), argument));
            if let Some(reaction) = self.reaction.lock().unwrap().take() {
                reaction(callbacks);
            }
        }
    }

    fn payload() -> SubmissionPayload {
        SubmissionPayload::builder()
            .tracking_number(TrackingCode::parse("ABC-123").unwrap())
            .phone("0123456789")
            .quantity(1)
            .price(5.0)
            .category("Clothing")
            .build()
            .unwrap()
    }

    async fn send_with(bridge: Arc<FixedBridge>) -> Result<TransportReply, FailureReason> {
        HostBridgeTransport::new(bridge, "processForm", Duration::from_secs(1))
            .send(&payload(), &AttemptId::new())
            .await
    }

    #[tokio::test]
    async fn test_success_with_verdict_is_acknowledged() {
        let bridge = FixedBridge::new(|cb| cb.success(json!({"success": true, "message": "ok"})));
        let reply = send_with(bridge.clone()).await.unwrap();

        assert!(matches!(reply, TransportReply::Acknowledged(r) if r.success));
        let calls = bridge.calls.lock().unwrap();
        assert_eq!(calls[0].0, "processForm");
        assert_eq!(calls[0].1["trackingNumber"], "ABC-123");
    }

    #[tokio::test]
    async fn test_success_without_data_is_unconfirmed() {
        let reply = send_with(FixedBridge::new(|cb| cb.success(Value::Null)))
            .await
            .unwrap();
        assert_eq!(reply, TransportReply::Dispatched);

        let reply = send_with(FixedBridge::new(|cb| cb.success(json!("done"))))
            .await
            .unwrap();
        assert_eq!(reply, TransportReply::Dispatched);
    }

    #[tokio::test]
    async fn test_failure_slot_is_rejection() {
        let err = send_with(FixedBridge::new(|cb| cb.failure("Script error: quota")))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FailureReason::ServerRejection("Script error: quota".to_string())
        );
    }

    #[tokio::test]
    async fn test_dropped_callbacks_are_transport_failure() {
        let err = send_with(FixedBridge::new(drop)).await.unwrap_err();
        assert!(matches!(
            err,
            FailureReason::Transport(TransportError::Connection(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_bridge_times_out() {
        let held = Arc::new(Mutex::new(None));
        let keep = held.clone();
        let bridge = FixedBridge::new(move |cb| *keep.lock().unwrap() = Some(cb));

        let err = send_with(bridge).await.unwrap_err();
        assert_eq!(
            err,
            FailureReason::Transport(TransportError::Timeout(Duration::from_secs(1)))
        );
    }

    #[tokio::test]
    async fn test_http_bridge_round_trip() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/run")
            .match_body(mockito::Matcher::PartialJson(json!({"function": "processForm"})))
            .with_status(200)
            .with_body(r#"{"done":true,"response":{"result":{"success":true,"message":"Saved"}}}"#)
            .create_async()
            .await;

        let bridge = Arc::new(HttpProcedureBridge::new(
            Client::new(),
            format!("{}/run", server.url()),
            Duration::from_secs(5),
        ));
        let reply = HostBridgeTransport::new(bridge, "processForm", Duration::from_secs(5))
            .send(&payload(), &AttemptId::new())
            .await
            .unwrap();

        assert_eq!(
            reply,
            TransportReply::Acknowledged(RemoteResponse {
                success: true,
                message: Some("Saved".to_string()),
                error: None,
            })
        );
    }

    #[test]
    fn test_procedure_error_body_fires_failure() {
        let (callbacks, mut receiver) = BridgeCallbacks::channel();
        settle_procedure_body(
            json!({"error": {"details": [{"errorMessage": "Duplicate entry"}]}}),
            callbacks,
        );
        assert_eq!(
            receiver.try_recv().unwrap(),
            BridgeSignal::Failure("Duplicate entry".to_string())
        );
    }

    #[tokio::test]
    async fn test_unreachable_bridge_is_retried() {
        let bridge = Arc::new(HttpProcedureBridge::new(
            Client::new(),
            "http://127.0.0.1:9/run",
            Duration::from_secs(5),
        ));
        let transport = Arc::new(HostBridgeTransport::new(bridge, "processForm", Duration::from_secs(5)));
        let scheduler = Arc::new(RecordingScheduler::new());
        let strategy =
            DeliveryStrategy::new(transport, RetryPolicy::default()).with_scheduler(scheduler.clone());

        let report = strategy.deliver(&payload()).await;

        assert!(matches!(
            report.outcome,
            DeliveryOutcome::Failed(FailureReason::Transport(TransportError::Connection(_)))
        ));
        assert_eq!(report.attempts.len(), 2);
        assert!(report.attempts.iter().all(|a| a.status == AttemptStatus::Failure));
        assert_eq!(scheduler.delays(), vec![Duration::from_millis(2000)]);
    }

    #[tokio::test]
    async fn test_http_bridge_error_status_is_not_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/run")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let bridge = Arc::new(HttpProcedureBridge::new(
            Client::new(),
            format!("{}/run", server.url()),
            Duration::from_secs(5),
        ));
        let err = HostBridgeTransport::new(bridge, "processForm", Duration::from_secs(5))
            .send(&payload(), &AttemptId::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FailureReason::Transport(TransportError::Http { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_http_bridge_unreadable_body_is_unconfirmed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/run")
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let bridge = Arc::new(HttpProcedureBridge::new(
            Client::new(),
            format!("{}/run", server.url()),
            Duration::from_secs(5),
        ));
        let reply = HostBridgeTransport::new(bridge, "processForm", Duration::from_secs(5))
            .send(&payload(), &AttemptId::new())
            .await
            .unwrap();

        assert_eq!(reply, TransportReply::Dispatched);
    }
}
