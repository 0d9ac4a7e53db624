//! Blocking HTTP transport used by [`CoinGeckoClient`](crate::client::CoinGeckoClient).
//!
//! The client only ever issues GET requests with a query string and a per-request
//! timeout, so the seam is a single method. Production code uses
//! [`ReqwestTransport`]; any closure `Fn(&HttpRequest) -> Result<HttpResponse>`
//! is also a transport, which lets tests script responses without a server.

use crate::error::{CoinwatchError, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// GET request envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            timeout,
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Executes a single GET request. Errors mean the request never produced a
/// status line (connect failure, timeout, unreadable body).
pub trait Transport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse>,
{
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self(request)
    }
}

/// Transport backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build the blocking client with the crate's user agent.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("coinwatch/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(url = %request.url, query = ?request.query, "GET");
        let response = self
            .client
            .get(&request.url)
            .query(&request.query)
            .timeout(request.timeout)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    CoinwatchError::Transport(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    CoinwatchError::Transport(format!("connection failed: {e}"))
                } else {
                    CoinwatchError::Transport(format!("request failed: {e}"))
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| CoinwatchError::Transport(format!("failed to read response body: {e}")))?;
        debug!(status, bytes = body.len(), "response");
        Ok(HttpResponse { status, body })
    }
}
