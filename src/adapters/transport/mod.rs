//! Delivery transports
//!
//! Four channels carry a [`SubmissionPayload`](crate::domain::SubmissionPayload)
//! to the remote endpoint:
//!
//! - [`DirectTransport`] - JSON POST, the response body is the answer
//! - [`ScriptCallbackTransport`] - payload in the query string, answer via a named callback script
//! - [`HiddenFrameTransport`] - form post whose answer is never observed
//! - [`HostBridgeTransport`] - named host procedure with success/failure slots
//!
//! All of them implement [`Transport`]; [`create_transport`] picks one from
//! configuration.

pub mod callback_registry;
pub mod client;
pub mod direct;
pub mod factory;
pub mod hidden_frame;
pub mod host_bridge;
pub mod script_callback;
pub mod traits;

pub use callback_registry::CallbackRegistry;
pub use client::build_http_client;
pub use direct::DirectTransport;
pub use factory::create_transport;
pub use hidden_frame::HiddenFrameTransport;
pub use host_bridge::{BridgeCallbacks, BridgeSignal, HostBridge, HostBridgeTransport, HttpProcedureBridge};
pub use script_callback::ScriptCallbackTransport;
pub use traits::{Transport, TransportReply};
