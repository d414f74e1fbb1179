//! HTTP transport abstraction layer for the Meridian API SDK
//!
//! Provides a trait-based transport seam between the generated API surface
//! and the network: one `Transport` trait, one reqwest-backed implementation.
//! Request construction, authentication injection, timeout policy, and
//! response interpretation are centralized here so the HTTP engine can be
//! swapped without touching call sites.
//!
//! # Architecture
//!
//! - **Transport trait**: generic interface for issuing one HTTP call
//! - **ReqwestTransport**: persistent-session implementation via reqwest
//! - **Response**: normalized outcome; connectivity failures are encoded in
//!   the returned value, never raised
//!
//! # Usage
//!
//! ```ignore
//! use meridian_transport::{HttpMethod, ReqwestTransport, Transport, TransportSettings};
//!
//! let settings = TransportSettings::new("sdk/1.0");
//! let transport = ReqwestTransport::configure(settings)?;
//! let response = transport
//!     .request(HttpMethod::Get, "https://api.example.com/v1/ping", None, None, None, None, None)
//!     .await?;
//! assert!(response.ok);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod settings;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use http::{AGENT_TAG_HEADER, ReqwestTransport};
pub use settings::TransportSettings;
pub use traits::{
    Authenticator, HttpMethod, Response, ResponseMode, StringModeMatcher, Transport,
    TransportOptions,
};
