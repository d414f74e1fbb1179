//! Transport trait and the request/response data model
//!
//! Defines the generic [`Transport`] trait implemented by concrete transport
//! mechanisms, together with the normalized [`Response`] value every call
//! produces and the supporting enums.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use crate::error::Result;

/// HTTP verbs supported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Trace,
}

impl HttpMethod {
    /// The verb as it appears on the wire and in log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the payload of a [`Response`] should be interpreted.
///
/// Derived from the response Content-Type; never set by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Payload is an opaque byte stream
    Binary,
    /// Payload is character data in some encoding
    String,
}

// Content-types treated as string-like: JSON/XML/SQL/GraphQL/CSV application
// types, all of text/*, structured-syntax +xml suffixes, and anything that
// declares an explicit charset.
const STRING_MODE_PATTERN: &str =
    r"(?i)(^application/.*\b(json|xml|sql|graphql|csv)\b|^text/|\+xml\b|;.*charset)";

static DEFAULT_STRING_MODES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STRING_MODE_PATTERN).expect("default string-mode pattern is valid"));

impl ResponseMode {
    /// Classify a Content-Type value using the default string-like table.
    ///
    /// An absent content-type maps to [`ResponseMode::Binary`].
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        StringModeMatcher::default().classify(content_type)
    }
}

/// Pattern table deciding which content-types are string-like.
///
/// The classification rule is policy rather than fixed behavior, so it is a
/// configurable table seeded with the common text/json/xml families rather
/// than a hard-coded list.
#[derive(Debug, Clone)]
pub struct StringModeMatcher {
    pattern: Regex,
}

impl StringModeMatcher {
    /// Build a matcher from a custom regular expression.
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Classify a Content-Type value against this table.
    pub fn classify(&self, content_type: Option<&str>) -> ResponseMode {
        match content_type {
            Some(ct) if self.pattern.is_match(ct) => ResponseMode::String,
            _ => ResponseMode::Binary,
        }
    }
}

impl Default for StringModeMatcher {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_STRING_MODES.clone(),
        }
    }
}

/// Normalized outcome of one transport call.
///
/// Constructed exactly once per [`Transport::request`] call and immutable
/// after return. Connectivity failures are encoded here rather than raised:
/// `http_status == 0` means no HTTP exchange occurred and `value` holds the
/// UTF-8 failure message. Zero is never a legitimate server status, so it is
/// a safe sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// True iff the call completed and the server returned a non-error status
    pub ok: bool,

    /// Raw response payload, or the failure message when no exchange occurred
    pub value: Vec<u8>,

    /// Actual HTTP status, or `0` when the server was never reached
    pub http_status: u16,

    /// How to interpret `value`
    pub response_mode: ResponseMode,

    /// Character encoding inferred from response headers, when they supply one
    pub encoding: Option<String>,
}

impl Response {
    /// Build the normalized value for a connectivity-class failure.
    ///
    /// DNS failure, refused connection, timeout, TLS negotiation failure:
    /// anything where no HTTP response was received.
    pub fn no_exchange(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: message.into().into_bytes(),
            http_status: 0,
            response_mode: ResponseMode::String,
            encoding: None,
        }
    }

    /// Whether an HTTP exchange actually took place.
    ///
    /// False means the failure happened before any status line was read;
    /// callers branching on retry policy care about this distinction, not
    /// about `ok` alone.
    pub fn reached_server(&self) -> bool {
        self.http_status != 0
    }

    /// Payload decoded as UTF-8.
    pub fn text(&self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.value.clone())
    }

    /// Payload decoded as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_slice(&self.value)
    }
}

/// Per-call overrides for a single [`Transport::request`] invocation.
///
/// Only the timeout participates at this layer. An override applies to that
/// one call; the next call without options reverts to the settings default.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// Timeout for this call, replacing the settings-level default
    pub timeout: Option<Duration>,
}

impl TransportOptions {
    /// Options carrying a one-call timeout override.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Source of per-call authentication headers.
///
/// Invoked once per request with no arguments; the returned headers
/// (typically `authorization`) win over identically-named headers passed via
/// the `headers` argument. Closures returning a header map satisfy this
/// trait directly.
pub trait Authenticator: Send + Sync {
    /// Produce the headers to attach to one outgoing call.
    fn auth_headers(&self) -> HashMap<String, String>;
}

impl<F> Authenticator for F
where
    F: Fn() -> HashMap<String, String> + Send + Sync,
{
    fn auth_headers(&self) -> HashMap<String, String> {
        self()
    }
}

/// Generic transport capability: one operation, one normalized outcome.
///
/// All outbound requests of the SDK flow through this seam. Exactly one
/// production implementation exists ([`ReqwestTransport`](crate::http::ReqwestTransport));
/// test doubles implement the trait directly.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a single HTTP call and classify the outcome.
    ///
    /// `path` is the absolute, already-resolved URL. Network-level failures
    /// never produce an `Err`; they come back as a [`Response`] with
    /// `http_status == 0`. `Err` is reserved for caller bugs (malformed
    /// header names or values). One attempt, one classification, one return:
    /// no retries are performed at this layer.
    #[allow(clippy::too_many_arguments)]
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query_params: Option<&HashMap<String, String>>,
        body: Option<&[u8]>,
        authenticator: Option<&dyn Authenticator>,
        headers: Option<&HashMap<String, String>>,
        options: Option<&TransportOptions>,
    ) -> Result<Response>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("application/json"), ResponseMode::String)]
    #[case(Some("application/json; charset=utf-8"), ResponseMode::String)]
    #[case(Some("application/vnd.api+json"), ResponseMode::String)]
    #[case(Some("application/xml"), ResponseMode::String)]
    #[case(Some("application/graphql"), ResponseMode::String)]
    #[case(Some("text/html"), ResponseMode::String)]
    #[case(Some("text/plain; charset=ISO-8859-1"), ResponseMode::String)]
    #[case(Some("image/svg+xml"), ResponseMode::String)]
    #[case(Some("application/octet-stream"), ResponseMode::Binary)]
    #[case(Some("image/png"), ResponseMode::Binary)]
    #[case(Some("audio/mpeg"), ResponseMode::Binary)]
    #[case(None, ResponseMode::Binary)]
    fn test_response_mode_classification(
        #[case] content_type: Option<&str>,
        #[case] expected: ResponseMode,
    ) {
        assert_eq!(ResponseMode::from_content_type(content_type), expected);
    }

    #[test]
    fn test_custom_string_mode_table() {
        let matcher = StringModeMatcher::from_pattern(r"^application/x-ndjson")
            .expect("pattern should compile");
        assert_eq!(
            matcher.classify(Some("application/x-ndjson")),
            ResponseMode::String
        );
        // The custom table fully replaces the default one
        assert_eq!(matcher.classify(Some("text/html")), ResponseMode::Binary);
    }

    #[test]
    fn test_invalid_string_mode_pattern() {
        assert!(StringModeMatcher::from_pattern("(unclosed").is_err());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Patch.as_str(), "PATCH");
        assert_eq!(HttpMethod::Trace.as_str(), "TRACE");
    }

    #[test]
    fn test_no_exchange_response() {
        let response = Response::no_exchange("connection refused");
        assert!(!response.ok);
        assert_eq!(response.http_status, 0);
        assert_eq!(response.response_mode, ResponseMode::String);
        assert_eq!(response.value, b"connection refused");
        assert!(response.encoding.is_none());
        assert!(!response.reached_server());
    }

    #[test]
    fn test_response_decoding_helpers() {
        let response = Response {
            ok: true,
            value: br#"{"ok":true}"#.to_vec(),
            http_status: 200,
            response_mode: ResponseMode::String,
            encoding: Some("utf-8".to_string()),
        };
        assert!(response.reached_server());
        assert_eq!(response.text().unwrap(), r#"{"ok":true}"#);
        let decoded: serde_json::Value = response.json().unwrap();
        assert_eq!(decoded["ok"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_transport_options_default_has_no_override() {
        assert!(TransportOptions::default().timeout.is_none());
        assert_eq!(
            TransportOptions::with_timeout(Duration::from_secs(5)).timeout,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_closure_authenticator() {
        let authenticator = || {
            let mut headers = HashMap::new();
            headers.insert("authorization".to_string(), "Bearer token".to_string());
            headers
        };
        let headers = Authenticator::auth_headers(&authenticator);
        assert_eq!(headers.get("authorization").map(String::as_str), Some("Bearer token"));
    }
}
