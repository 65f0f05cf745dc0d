//! HTTP GET adapter.
//!
//! Resources receive a `&dyn HttpClient` so that the network can be replaced
//! in tests.  The production client is [`UreqClient`], configured through an
//! explicit [`HttpOptions`] value rather than process-wide state.
use anyhow::Result;
use ureq::Agent;
use ureq::tls::TlsConfig;

use crate::error::TransportError;

/// Transport options threaded into the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HttpOptions {
    /// Verify TLS certificates.  Off by default.
    pub verify_tls: bool,
}

/// A single GET request with the optional headers a resource may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpRequest<'a> {
    /// Target URL.
    pub url: &'a str,
    /// `Accept` header value.
    pub accept: Option<&'a str>,
    /// `Authorization` header value, sent verbatim.
    pub authorization: Option<&'a str>,
}

impl<'a> HttpRequest<'a> {
    /// Create a request without optional headers.
    #[must_use]
    pub const fn new(url: &'a str) -> Self {
        Self {
            url,
            accept: None,
            authorization: None,
        }
    }

    /// Header pairs to attach; absent values produce no header.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, &'a str)> {
        let mut headers = Vec::new();
        if let Some(accept) = self.accept {
            headers.push(("Accept", accept));
        }
        if let Some(authorization) = self.authorization {
            headers.push(("Authorization", authorization));
        }
        headers
    }
}

/// Abstraction over HTTP GET requests returning a text body.
pub trait HttpClient: Send + Sync + std::fmt::Debug {
    /// Perform a GET request and decode the body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, non-2xx status, or an
    /// unreadable body.
    fn get_text(&self, request: &HttpRequest<'_>) -> Result<String>;
}

/// Production [`HttpClient`] backed by [`ureq`].
#[derive(Debug)]
pub struct UreqClient {
    agent: Agent,
}

impl UreqClient {
    /// Build a client from transport options.
    #[must_use]
    pub fn new(options: HttpOptions) -> Self {
        let config = Agent::config_builder()
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(!options.verify_tls)
                    .build(),
            )
            .http_status_as_error(true)
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }
}

impl HttpClient for UreqClient {
    fn get_text(&self, request: &HttpRequest<'_>) -> Result<String> {
        let mut builder = self.agent.get(request.url);
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let mut response = builder.call().map_err(|e| TransportError::Request {
            url: request.url.to_string(),
            message: e.to_string(),
        })?;

        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| TransportError::Body {
                url: request.url.to_string(),
                message: e.to_string(),
            })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
