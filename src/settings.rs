//! Transport configuration
//!
//! [`TransportSettings`] is the immutable configuration value handed to a
//! transport at construction time. It carries no behavior and performs no
//! validation; out-of-range timeouts or malformed header strings are a
//! caller bug and surface when the transport is configured.

use std::collections::HashMap;
use std::time::Duration;

/// Default per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a transport instance.
///
/// `headers` and `verify_ssl` are baked into the persistent session when the
/// transport is constructed and never re-read; `timeout` is consulted on
/// every call (and can be overridden per call via
/// [`TransportOptions`](crate::traits::TransportOptions)).
#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Identity string sent on every request under the agent-tag header
    pub agent_tag: String,

    /// Default per-request timeout
    pub timeout: Duration,

    /// Static headers merged into the session at construction time
    pub headers: Option<HashMap<String, String>>,

    /// Whether TLS certificate verification is enforced
    pub verify_ssl: bool,
}

impl TransportSettings {
    /// Create settings with the given agent tag and defaults for the rest:
    /// 30 second timeout, no static headers, TLS verification on.
    pub fn new(agent_tag: impl Into<String>) -> Self {
        Self {
            agent_tag: agent_tag.into(),
            timeout: DEFAULT_TIMEOUT,
            headers: None,
            verify_ssl: true,
        }
    }

    /// Set the default per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set static headers applied to the session at construction.
    ///
    /// On key collision these win over the transport's own identity header.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }
}
