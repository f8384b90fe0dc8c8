//! Transport factory
//!
//! This module builds the configured transport from a [`CourierConfig`].

use super::client::build_http_client;
use super::direct::DirectTransport;
use super::hidden_frame::HiddenFrameTransport;
use super::host_bridge::{HostBridgeTransport, HttpProcedureBridge};
use super::script_callback::ScriptCallbackTransport;
use super::traits::Transport;
use crate::config::CourierConfig;
use crate::domain::{CourierError, Result, TransportKind};
use std::sync::Arc;

/// Create the transport selected by `transport.kind`
///
/// # Arguments
///
/// * `config` - The Courier configuration
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the endpoint URL
/// cannot be parsed.
pub fn create_transport(config: &CourierConfig) -> Result<Arc<dyn Transport>> {
    let client = build_http_client(&config.endpoint)?;
    let url = config.endpoint.url.as_str();

    tracing::info!(transport = %config.transport.kind, endpoint = %url, "Creating transport");

    match config.transport.kind {
        TransportKind::Direct => Ok(Arc::new(DirectTransport::new(
            client,
            url,
            config.endpoint.timeout(),
        ))),
        TransportKind::ScriptCallback => {
            let transport = ScriptCallbackTransport::new(client, url, config.transport.clone())
                .map_err(|e| CourierError::Configuration(format!("Invalid endpoint.url: {e}")))?;
            Ok(Arc::new(transport))
        }
        TransportKind::HiddenFrame => Ok(Arc::new(HiddenFrameTransport::new(client, url))),
        TransportKind::HostBridge => {
            let bridge = HttpProcedureBridge::new(client, url, config.endpoint.timeout());
            Ok(Arc::new(HostBridgeTransport::new(
                Arc::new(bridge),
                config.transport.bridge_procedure.clone(),
                config.transport.callback_timeout(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(TransportKind::Direct ; "direct")]
    #[test_case(TransportKind::ScriptCallback ; "script callback")]
    #[test_case(TransportKind::HiddenFrame ; "hidden frame")]
    #[test_case(TransportKind::HostBridge ; "host bridge")]
    fn test_factory_builds_selected_kind(kind: TransportKind) {
        let mut config = CourierConfig::with_endpoint("https://script.example.com/exec");
        config.transport.kind = kind;
        let transport = create_transport(&config).unwrap();
        assert_eq!(transport.kind(), kind);
    }
}
