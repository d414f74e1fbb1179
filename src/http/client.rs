//! HTTP transport client implementation
//!
//! Implements the Transport trait on top of a persistent reqwest client.
//! One attempt per call; connectivity failures are classified into the
//! returned Response rather than propagated.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::error::{Result, TransportError};
use crate::settings::TransportSettings;
use crate::traits::{
    Authenticator, HttpMethod, Response, ResponseMode, StringModeMatcher, Transport,
    TransportOptions,
};

/// Header carrying the SDK identity tag on every request.
pub const AGENT_TAG_HEADER: &str = "x-meridian-appid";

/// HTTP transport backed by a persistent [`reqwest::Client`].
///
/// The client is the session object: the merged identity and settings
/// headers plus the TLS-verification flag are baked into it at construction
/// and sent on every subsequent request. The settings timeout is re-read per
/// call. `reqwest::Client` is internally reference-counted and tolerates
/// concurrent use, but that is an engine property, not part of the Transport
/// contract.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: TransportSettings,
    client: ReqwestClient,
    string_modes: StringModeMatcher,
}

impl ReqwestTransport {
    /// Production factory: build the persistent session from the settings.
    ///
    /// The session's default headers are the identity header
    /// ([`AGENT_TAG_HEADER`] mapped to `settings.agent_tag`) with
    /// `settings.headers` merged over it, caller keys winning on collision.
    /// TLS verification follows `settings.verify_ssl`.
    pub fn configure(settings: TransportSettings) -> Result<Self> {
        let mut defaults = HeaderMap::new();
        defaults.insert(
            AGENT_TAG_HEADER,
            HeaderValue::from_str(&settings.agent_tag)
                .map_err(|_| TransportError::InvalidHeaderValue(AGENT_TAG_HEADER.to_string()))?,
        );
        if let Some(headers) = &settings.headers {
            merge_into_header_map(&mut defaults, headers)?;
        }

        let client = ReqwestClient::builder()
            .default_headers(defaults)
            .danger_accept_invalid_certs(!settings.verify_ssl)
            .build()?;

        Ok(Self::new(settings, client))
    }

    /// Lower-level constructor taking a pre-built client, for test doubles.
    ///
    /// The caller is responsible for the client's session state; settings
    /// headers and the TLS flag are not re-applied here because reqwest bakes
    /// them in at client build time.
    pub fn new(settings: TransportSettings, client: ReqwestClient) -> Self {
        Self {
            settings,
            client,
            string_modes: StringModeMatcher::default(),
        }
    }

    /// Replace the content-type classification table.
    pub fn with_string_modes(mut self, string_modes: StringModeMatcher) -> Self {
        self.string_modes = string_modes;
        self
    }

    /// The settings this transport was constructed with.
    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query_params: Option<&HashMap<String, String>>,
        body: Option<&[u8]>,
        authenticator: Option<&dyn Authenticator>,
        headers: Option<&HashMap<String, String>>,
        options: Option<&TransportOptions>,
    ) -> Result<Response> {
        // Per-call precedence, low to high: session defaults < `headers`
        // argument < authenticator-injected headers. The first step happens
        // inside reqwest (per-call headers override client defaults); the
        // rest is this merge.
        let mut call_headers: HashMap<String, String> = headers.cloned().unwrap_or_default();
        if let Some(authenticator) = authenticator {
            call_headers.extend(authenticator.auth_headers());
        }
        let mut header_map = HeaderMap::with_capacity(call_headers.len());
        merge_into_header_map(&mut header_map, &call_headers)?;

        let timeout = options
            .and_then(|options| options.timeout)
            .unwrap_or(self.settings.timeout);

        // Method and path only; query params, body, and headers may carry
        // credentials and stay out of the log.
        tracing::info!(method = %method, path, "dispatching request");

        let mut builder = self
            .client
            .request(reqwest_method(method), path)
            .headers(header_map)
            .timeout(timeout);
        if let Some(query_params) = query_params {
            builder = builder.query(query_params);
        }
        if let Some(body) = body {
            builder = builder.body(body.to_vec());
        }

        // reqwest performs no ambient netrc credential lookup, so the
        // suppression hook other engines need has no counterpart here; the
        // wire-level regression test covers it instead.
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => return Ok(Response::no_exchange(err.to_string())),
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let value = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            // The body read failing mid-exchange is the same connectivity
            // class as never connecting: no usable HTTP response.
            Err(err) => return Ok(Response::no_exchange(err.to_string())),
        };

        Ok(Response {
            // Non-error statuses, redirects included (200..=399).
            ok: status.is_success() || status.is_redirection(),
            value,
            http_status: status.as_u16(),
            response_mode: self.string_modes.classify(content_type.as_deref()),
            encoding: encoding_from_content_type(content_type.as_deref()),
        })
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Trace => reqwest::Method::TRACE,
    }
}

fn merge_into_header_map(map: &mut HeaderMap, headers: &HashMap<String, String>) -> Result<()> {
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TransportError::InvalidHeaderName(name.clone()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| TransportError::InvalidHeaderValue(name.clone()))?;
        map.insert(header_name, header_value);
    }
    Ok(())
}

/// Infer the payload character encoding from a Content-Type value.
///
/// The charset parameter wins when present; otherwise `text/*` defaults to
/// ISO-8859-1 and `application/json` to utf-8, matching the common HTTP
/// engine convention. Anything else yields no encoding.
fn encoding_from_content_type(content_type: Option<&str>) -> Option<String> {
    let content_type = content_type?;
    let mut parts = content_type.split(';');
    let mime = parts.next().unwrap_or("").trim().to_ascii_lowercase();
    for param in parts {
        if let Some((key, value)) = param.split_once('=') {
            if key.trim().eq_ignore_ascii_case("charset") {
                let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    if mime.starts_with("text/") {
        return Some("ISO-8859-1".to_string());
    }
    if mime == "application/json" {
        return Some("utf-8".to_string());
    }
    None
}
