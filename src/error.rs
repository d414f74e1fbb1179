//! Transport error types

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations.
///
/// These cover only the programming/config class: bad arguments or a client
/// that could not be constructed. Connectivity failures (DNS, refused
/// connection, timeout, TLS negotiation) never surface here; they are
/// normalized into the returned [`Response`](crate::traits::Response) with
/// `http_status == 0`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A caller-supplied header name is not a valid HTTP token
    #[error("invalid header name `{0}`")]
    InvalidHeaderName(String),

    /// A caller-supplied header value contains bytes that cannot be sent
    #[error("invalid value for header `{0}`")]
    InvalidHeaderValue(String),

    /// The underlying HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    /// The string-mode classification pattern failed to compile
    #[error("invalid content-type pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
