//! Remote record store
//!
//! The verification reconciler only needs one capability from the remote
//! side: "does a record with this tracking code exist?". [`RecordStore`]
//! names that capability and [`HttpRecordStore`] implements it against the
//! verification endpoint.

use crate::adapters::transport::client::classify_request_error;
use crate::domain::{TrackingCode, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Query parameter carrying the tracking code
pub const TRACKING_PARAM: &str = "tracking";

/// Read-by-key access to submitted records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether a record for `tracking` exists
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the store could not be read.
    async fn exists(&self, tracking: &TrackingCode) -> Result<bool, TransportError>;
}

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    exists: bool,
}

/// Record store behind `GET <verify_url>?tracking=<code>` returning `{"exists": bool}`
pub struct HttpRecordStore {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpRecordStore {
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn exists(&self, tracking: &TrackingCode) -> Result<bool, TransportError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[(TRACKING_PARAM, tracking.as_str())])
            .send()
            .await
            .map_err(|e| classify_request_error(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let body: ExistsResponse = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(format!("expected {{\"exists\": bool}}: {e}")))?;

        Ok(body.exists)
    }
}
