//! Shared HTTP client construction

use crate::config::EndpointConfig;
use crate::domain::{CourierError, Result, TransportError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Builds the HTTP client used by every transport and the record store
///
/// The endpoint token, when configured, is attached as a bearer
/// `Authorization` header on every request.
///
/// # Errors
///
/// Returns [`CourierError::Configuration`] if the token is not a valid header
/// value or the client cannot be built.
pub fn build_http_client(endpoint: &EndpointConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();

    if let Some(token) = endpoint
        .auth_token
        .as_ref()
        .filter(|t| !t.expose_secret().is_empty())
    {
        let mut value = HeaderValue::from_str(&token.expose_secret().bearer()).map_err(|_| {
            CourierError::Configuration("endpoint.auth_token contains invalid characters".to_string())
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    ClientBuilder::new()
        .timeout(endpoint.timeout())
        .connect_timeout(Duration::from_secs(10))
        .default_headers(headers)
        .user_agent(concat!("courier/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CourierError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Maps a reqwest failure onto the transport error taxonomy
pub(crate) fn classify_request_error(error: &reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Connection(error.to_string())
    }
}
