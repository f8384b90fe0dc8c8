//! External system integrations for Courier.
//!
//! - [`transport`] - The four delivery channels behind the `Transport` trait
//! - [`store`] - Read access to submitted records for verification
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the HTTP client and
//! host conventions from the delivery state machine, so the core can be
//! tested with in-memory transports and stores.
//!
//! ```rust,no_run
//! use courier::adapters::transport::create_transport;
//! use courier::config::CourierConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CourierConfig::with_endpoint("https://script.example.com/exec");
//! let transport = create_transport(&config)?;
//! println!("Using {}", transport.kind());
//! # Ok(())
//! # }
//! ```

pub mod store;
pub mod transport;
