//! End-to-end tests for the submission flow
//!
//! These run the coordinator against mock endpoints: validate, encode,
//! deliver, verify and the final notification.

use async_trait::async_trait;
use courier::adapters::store::{HttpRecordStore, RecordStore};
use courier::adapters::transport::{build_http_client, HiddenFrameTransport};
use courier::config::{CourierConfig, LimitsConfig};
use courier::core::delivery::{DeliveryStrategy, RetryPolicy};
use courier::core::schedule::RecordingScheduler;
use courier::core::submit::{SubmissionCoordinator, SubmitStatus, SUBMITTING_MESSAGE};
use courier::core::verification::{PollPolicy, ReconcilerPhase, VerificationReconciler};
use courier::domain::{AttachedFile, DeclarationForm, TrackingCode, TransportError};
use courier::notify::{MemorySink, Notifier, Severity};
use mockito::Matcher;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn valid_form() -> DeclarationForm {
    DeclarationForm {
        tracking_number: "ABC-123".to_string(),
        phone: "0123456789".to_string(),
        quantity: "2".to_string(),
        price: "19.99".to_string(),
        description: "Two phone cases".to_string(),
        collection_point: "Warehouse A".to_string(),
        category: "*Gadgets".to_string(),
        files: vec![AttachedFile::in_memory(
            "receipt.pdf",
            None,
            b"%PDF-1.4 receipt".to_vec(),
        )],
    }
}

fn notifier_with_sink() -> (Arc<Notifier>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let config = CourierConfig::with_endpoint("https://unused.example.com");
    let notifier = Arc::new(Notifier::new(&config.notifications).with_sink(sink.clone()));
    (notifier, sink)
}

fn direct_config(url: String) -> CourierConfig {
    let mut config = CourierConfig::with_endpoint(url);
    config.transport.retry.initial_delay_ms = 1;
    config.verification.enabled = false;
    config
}

#[tokio::test]
async fn test_direct_delivery_resets_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/exec")
        .match_body(Matcher::PartialJson(json!({
            "trackingNumber": "ABC-123",
            "phone": "0123456789",
            "quantity": 2,
            "itemCategory": "*Gadgets"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "message": "Thanks, declaration saved"}"#)
        .create_async()
        .await;

    let (notifier, sink) = notifier_with_sink();
    let config = direct_config(format!("{}/exec", server.url()));
    let coordinator = SubmissionCoordinator::from_config(&config, notifier).unwrap();

    let mut form = valid_form();
    let summary = coordinator.submit(&mut form).await;

    mock.assert_async().await;
    assert!(matches!(summary.status, SubmitStatus::Delivered { .. }));
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.files_encoded, 1);
    assert!(form.is_blank());

    let history = sink.history();
    assert_eq!(history.first(), Some(&(Severity::Pending, SUBMITTING_MESSAGE.to_string())));
    assert_eq!(
        sink.last(),
        Some((Severity::Success, "Thanks, declaration saved".to_string()))
    );
}

#[tokio::test]
async fn test_server_rejection_keeps_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/exec")
        .with_status(200)
        .with_body(r#"{"success": false, "error": "Duplicate <b>tracking</b> number"}"#)
        .expect(1)
        .create_async()
        .await;

    let (notifier, sink) = notifier_with_sink();
    let config = direct_config(format!("{}/exec", server.url()));
    let coordinator = SubmissionCoordinator::from_config(&config, notifier).unwrap();

    let mut form = valid_form();
    let summary = coordinator.submit(&mut form).await;

    mock.assert_async().await;
    assert!(matches!(summary.status, SubmitStatus::Failed(_)));
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(form, valid_form());

    let (severity, text) = sink.last().unwrap();
    assert_eq!(severity, Severity::Error);
    assert!(text.starts_with("Error: "));
    assert!(text.contains("Duplicate"));
    assert!(!text.contains('<'));
}

#[tokio::test]
async fn test_http_error_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/exec")
        .with_status(500)
        .with_body("internal error")
        .expect(1)
        .create_async()
        .await;

    let (notifier, _sink) = notifier_with_sink();
    let config = direct_config(format!("{}/exec", server.url()));
    let coordinator = SubmissionCoordinator::from_config(&config, notifier).unwrap();

    let summary = coordinator.submit(&mut valid_form()).await;

    mock.assert_async().await;
    assert!(matches!(summary.status, SubmitStatus::Failed(_)));
    assert_eq!(summary.attempts.len(), 1);
}

#[tokio::test]
async fn test_validation_failure_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/exec")
        .expect(0)
        .create_async()
        .await;

    let (notifier, sink) = notifier_with_sink();
    let config = direct_config(format!("{}/exec", server.url()));
    let coordinator = SubmissionCoordinator::from_config(&config, notifier).unwrap();

    let mut form = valid_form();
    form.files.clear();
    let summary = coordinator.submit(&mut form).await;

    mock.assert_async().await;
    assert!(matches!(summary.status, SubmitStatus::Invalid(_)));
    assert_eq!(summary.exit_code(), 2);
    assert!(summary.attempts.is_empty());
    assert_eq!(sink.history().len(), 1);
    assert_eq!(sink.last().unwrap().0, Severity::Error);
}

#[tokio::test]
async fn test_hidden_frame_gives_up_after_poll_budget() {
    let mut server = mockito::Server::new_async().await;
    let _post = server
        .mock("POST", "/exec")
        .with_status(200)
        .create_async()
        .await;
    let polls = server
        .mock("GET", "/exec")
        .match_query(Matcher::UrlEncoded("tracking".into(), "ABC-123".into()))
        .with_status(200)
        .with_body(r#"{"exists": false}"#)
        .expect(5)
        .create_async()
        .await;

    let url = format!("{}/exec", server.url());
    let endpoint = CourierConfig::with_endpoint(url.clone()).endpoint;
    let client = build_http_client(&endpoint).unwrap();

    let scheduler = Arc::new(RecordingScheduler::new());
    let strategy = DeliveryStrategy::new(
        Arc::new(HiddenFrameTransport::new(client.clone(), url.clone())),
        RetryPolicy::none(),
    );
    let store = Arc::new(HttpRecordStore::new(client, url, endpoint.timeout()));
    let reconciler =
        VerificationReconciler::new(store, PollPolicy::default()).with_scheduler(scheduler.clone());

    let (notifier, sink) = notifier_with_sink();
    let coordinator =
        SubmissionCoordinator::new(LimitsConfig::default(), 100, strategy, Some(reconciler), notifier);

    let mut form = valid_form();
    let summary = coordinator.submit(&mut form).await;

    polls.assert_async().await;
    assert_eq!(summary.status, SubmitStatus::PendingVerification);
    assert_eq!(summary.exit_code(), 3);
    assert!(form.is_blank());

    let state = summary.verification.expect("verification state");
    assert_eq!(state.phase, ReconcilerPhase::GaveUp);
    assert_eq!(state.attempts_made, 5);

    let delays: Vec<u64> = scheduler
        .delays()
        .iter()
        .map(|d| d.as_millis() as u64)
        .collect();
    assert_eq!(delays, [3000, 2000, 2000, 2000, 2000]);

    let (severity, text) = sink.last().unwrap();
    assert_eq!(severity, Severity::Pending);
    assert!(text.contains("verification pending for tracking number ABC-123"));
}

/// Store that finds the record on the nth read
struct FoundOnRead {
    reads: AtomicUsize,
    found_on: usize,
}

#[async_trait]
impl RecordStore for FoundOnRead {
    async fn exists(&self, _tracking: &TrackingCode) -> Result<bool, TransportError> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        if read == 1 {
            return Err(TransportError::Connection("flaky read".to_string()));
        }
        Ok(read >= self.found_on)
    }
}

#[tokio::test]
async fn test_hidden_frame_confirmed_by_later_poll() {
    let mut server = mockito::Server::new_async().await;
    let _post = server
        .mock("POST", "/exec")
        .with_status(200)
        .create_async()
        .await;

    let url = format!("{}/exec", server.url());
    let client = build_http_client(&CourierConfig::with_endpoint(url.clone()).endpoint).unwrap();
    let strategy = DeliveryStrategy::new(
        Arc::new(HiddenFrameTransport::new(client, url)),
        RetryPolicy::none(),
    );

    let store = Arc::new(FoundOnRead {
        reads: AtomicUsize::new(0),
        found_on: 3,
    });
    let reconciler = VerificationReconciler::new(store.clone(), PollPolicy::default())
        .with_scheduler(Arc::new(RecordingScheduler::new()));

    let (notifier, sink) = notifier_with_sink();
    let coordinator =
        SubmissionCoordinator::new(LimitsConfig::default(), 100, strategy, Some(reconciler), notifier);

    let summary = coordinator.submit(&mut valid_form()).await;

    assert_eq!(summary.status, SubmitStatus::Confirmed);
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(store.reads.load(Ordering::SeqCst), 3);
    assert_eq!(
        sink.last(),
        Some((
            Severity::Success,
            "Submission confirmed for tracking number ABC-123".to_string()
        ))
    );

    let messages: Vec<String> = sink.history().into_iter().map(|(_, text)| text).collect();
    assert!(messages.contains(&"Submission sent. Verifying delivery...".to_string()));
}

#[tokio::test]
async fn test_verification_interval_is_real_time_without_scheduler() {
    // Short real intervals still respect the budget.
    let store = Arc::new(FoundOnRead {
        reads: AtomicUsize::new(0),
        found_on: usize::MAX,
    });
    let policy = PollPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(5),
        interval: Duration::from_millis(5),
        jitter: Duration::ZERO,
    };
    let state = VerificationReconciler::new(store.clone(), policy)
        .reconcile(&TrackingCode::parse("ABC-123").unwrap())
        .await;

    assert_eq!(state.phase, ReconcilerPhase::GaveUp);
    assert_eq!(store.reads.load(Ordering::SeqCst), 3);
}
