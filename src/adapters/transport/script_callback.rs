//! Script-callback transport
//!
//! Encodes the payload into the query string of a GET request that names a
//! callback; the endpoint answers with a script calling that function with
//! the response object, `courier_cb_..({"success":true})`. The whole payload
//! travels in the URL, so every attachment and the final URL must each fit
//! within `max_url_length`.

use super::callback_registry::{CallbackRegistry, CallbackResult};
use super::traits::{Transport, TransportReply};
use crate::config::TransportConfig;
use crate::domain::payload::truncate_chars;
use crate::domain::{
    AttemptId, FailureReason, RemoteResponse, SubmissionPayload, TransportError, TransportKind,
    ValidationError,
};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Query parameter carrying the callback name
pub const CALLBACK_PARAM: &str = "callback";

/// Delivers through a named script callback
pub struct ScriptCallbackTransport {
    client: Client,
    endpoint: Url,
    config: TransportConfig,
    registry: Arc<CallbackRegistry>,
}

impl ScriptCallbackTransport {
    /// Create a script-callback transport
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not an absolute URL.
    pub fn new(
        client: Client,
        endpoint: &str,
        config: TransportConfig,
    ) -> Result<Self, url::ParseError> {
        let registry = Arc::new(CallbackRegistry::new(config.max_pending_callbacks));
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
            config,
            registry,
        })
    }

    /// Registry of callbacks still waiting for an answer
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    fn timeout(&self) -> Duration {
        self.config.callback_timeout()
    }

    /// Builds the request URL for a payload and callback name
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UrlBudgetExceeded`] when an attachment or
    /// the finished URL is longer than `max_url_length`.
    pub fn build_request_url(
        &self,
        payload: &SubmissionPayload,
        callback: &str,
    ) -> Result<Url, ValidationError> {
        let limit = self.config.max_url_length;
        let cfg = &self.config;

        for file in &payload.files {
            if file.data.len() > limit {
                return Err(ValidationError::UrlBudgetExceeded {
                    what: format!("File '{}'", file.name),
                    length: file.data.len(),
                    limit,
                });
            }
        }

        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair(CALLBACK_PARAM, callback)
                .append_pair(cfg.alias("trackingNumber"), payload.tracking_number.as_str())
                .append_pair(cfg.alias("phone"), &payload.phone)
                .append_pair(cfg.alias("quantity"), &payload.quantity.to_string())
                .append_pair(cfg.alias("price"), &payload.price.to_string())
                .append_pair(
                    cfg.alias("description"),
                    &truncate_chars(&payload.description, cfg.description_max_length),
                )
                .append_pair(cfg.alias("collectionPoint"), &payload.collection_point)
                .append_pair(cfg.alias("itemCategory"), &payload.category);

            for (index, file) in payload.files.iter().enumerate() {
                query
                    .append_pair(&format!("{}{}", cfg.alias("fileName"), index), &file.name)
                    .append_pair(&format!("{}{}", cfg.alias("fileType"), index), &file.mime_type)
                    .append_pair(&format!("{}{}", cfg.alias("fileData"), index), &file.data);
            }
        }

        let length = url.as_str().len();
        if length > limit {
            return Err(ValidationError::UrlBudgetExceeded {
                what: "Request URL".to_string(),
                length,
                limit,
            });
        }
        Ok(url)
    }
}

/// Removes a callback however the send ends, including when the send future
/// itself is dropped mid-flight
struct PendingGuard<'a> {
    registry: &'a CallbackRegistry,
    name: &'a str,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.registry.cancel(self.name) {
            tracing::debug!(callback = %self.name, "Released unanswered callback");
        }
    }
}

#[async_trait]
impl Transport for ScriptCallbackTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::ScriptCallback
    }

    async fn send(
        &self,
        payload: &SubmissionPayload,
        attempt: &AttemptId,
    ) -> Result<TransportReply, FailureReason> {
        let callback = CallbackRegistry::callback_name(attempt);
        let url = self
            .build_request_url(payload, &callback)
            .map_err(FailureReason::Invalid)?;

        let receiver = self
            .registry
            .register(&callback)
            .map_err(FailureReason::Transport)?;
        let _guard = PendingGuard {
            registry: &self.registry,
            name: &callback,
        };

        tracing::debug!(
            callback = %callback,
            url_length = url.as_str().len(),
            "Loading callback script"
        );

        let loader = tokio::spawn(load_script(
            self.client.clone(),
            url,
            Arc::clone(&self.registry),
            callback.clone(),
        ));
        self.registry.attach_loader(&callback, loader.abort_handle());

        match tokio::time::timeout(self.timeout(), receiver).await {
            Ok(Ok(Ok(response))) => Ok(TransportReply::Acknowledged(response)),
            Ok(Ok(Err(error))) => Err(FailureReason::Transport(error)),
            Ok(Err(_)) => Err(FailureReason::Transport(TransportError::ScriptLoad(
                "callback was released without an answer".to_string(),
            ))),
            Err(_) => {
                tracing::warn!(callback = %callback, "Callback timed out");
                Err(FailureReason::Transport(TransportError::Timeout(self.timeout())))
            }
        }
    }
}

/// Fetches the callback script and dispatches the answer it carries
async fn load_script(client: Client, url: Url, registry: Arc<CallbackRegistry>, callback: String) {
    let result = fetch_and_dispatch(&client, url, &registry, &callback).await;
    // A no-op when the answer already resolved this callback.
    if let Err(error) = result {
        registry.complete(&callback, Err(error));
    }
}

async fn fetch_and_dispatch(
    client: &Client,
    url: Url,
    registry: &CallbackRegistry,
    callback: &str,
) -> Result<(), TransportError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| TransportError::ScriptLoad(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::ScriptLoad(format!(
            "script request returned status {}",
            status.as_u16()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| TransportError::ScriptLoad(e.to_string()))?;

    let (invoked, answer) = parse_callback_body(&body)?;
    // Only this attempt's callback may be resolved by this response.
    if invoked != callback {
        tracing::warn!(callback = %callback, invoked = %invoked, "Script invoked a foreign callback");
        return Err(TransportError::InvalidResponse(format!(
            "script invoked '{invoked}' instead of '{callback}'"
        )));
    }

    let answer: CallbackResult = Ok(answer);
    if !registry.complete(callback, answer) {
        tracing::debug!(callback = %callback, "Callback already finished");
    }
    Ok(())
}

/// Parses a callback script body into the invoked name and its argument
///
/// Accepts `name({...})`, optionally followed by `;` and preceded by a
/// `/**/` guard comment.
///
/// # Errors
///
/// Returns [`TransportError::InvalidResponse`] if the body is not a single
/// call with a JSON object argument.
pub fn parse_callback_body(body: &str) -> Result<(String, RemoteResponse), TransportError> {
    let invalid = |detail: &str| TransportError::InvalidResponse(detail.to_string());

    let trimmed = body.trim();
    let trimmed = trimmed.strip_prefix("/**/").unwrap_or(trimmed).trim_start();
    let trimmed = trimmed.trim_end_matches(';').trim_end();

    let open = trimmed.find('(').ok_or_else(|| invalid("callback script has no call"))?;
    if !trimmed.ends_with(')') {
        return Err(invalid("callback script is not a single call"));
    }

    let name = trimmed[..open].trim();
    let is_identifier = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.');
    if !is_identifier {
        return Err(invalid("callback script names no function"));
    }

    let argument = &trimmed[open + 1..trimmed.len() - 1];
    let response: RemoteResponse = serde_json::from_str(argument)
        .map_err(|e| TransportError::InvalidResponse(format!("callback argument: {e}")))?;

    Ok((name.to_string(), response))
}
