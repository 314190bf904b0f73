/*
[INPUT]:  Endpoint path, extra headers and a JSON body
[OUTPUT]: Raw HTTP status + body, or a transport-level error
[POS]:    HTTP layer - pluggable transport (reqwest in production, mock in tests)
[UPDATE]: When changing connection handling or adding transport options
*/

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};

use super::client::ClientConfig;
use super::error::{Layr0Error, Result};

/// One outbound POST, before it hits the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    /// Path relative to the configured host, e.g. `api/v1/margin`
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

/// Response as received; interpretation is left to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single JSON POST and returns whatever came back.
///
/// Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn post_json(&self, request: OutboundRequest) -> Result<TransportResponse>;
}

/// reqwest-backed transport bound to one host.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
    connect_timeout: Duration,
}

impl HttpTransport {
    pub fn new(host: &str, config: &ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(Layr0Error::transport)?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(host)?,
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint, keeping any path prefix of the host
    fn url(&self, endpoint: &str) -> std::result::Result<Url, url::ParseError> {
        self.base_url.join(endpoint.trim_start_matches('/'))
    }

    /// Limit that applies to a timed-out request
    fn timeout_for(&self, during_connect: bool) -> Duration {
        if during_connect {
            self.connect_timeout
        } else {
            self.timeout
        }
    }

    fn map_error(&self, err: reqwest::Error) -> Layr0Error {
        if err.is_timeout() {
            Layr0Error::Timeout {
                duration: self.timeout_for(err.is_connect()),
            }
        } else {
            Layr0Error::transport(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, request: OutboundRequest) -> Result<TransportResponse> {
        let url = self.url(&request.endpoint)?;
        let mut builder = self.http_client.request(Method::POST, url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|err| self.map_error(err))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| self.map_error(err))?;
        Ok(TransportResponse { status, body })
    }
}

/// Parse a host and make sure joins append to its path instead of replacing
/// the last segment.
pub fn normalize_base_url(host: &str) -> Result<Url> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Layr0Error::Config("host must not be empty".to_string()));
    }

    let mut url = Url::parse(host)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Layr0Error::Config(format!(
            "unsupported scheme {:?} in host {host}",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// In-memory transport that records requests and replays queued responses.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<TransportResponse>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that answers the first call with `body`.
    pub fn with_json(status: u16, body: serde_json::Value) -> Self {
        let transport = Self::new();
        transport.push_json(status, body);
        transport
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_raw(status, &body.to_string());
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.lock_responses().push_back(Ok(TransportResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_error(&self, error: Layr0Error) {
        self.lock_responses().push_back(Err(error));
    }

    /// Number of `post_json` calls seen so far.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<TransportResponse>>> {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, request: OutboundRequest) -> Result<TransportResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.lock_responses()
            .pop_front()
            .unwrap_or_else(|| Err(Layr0Error::transport("no mock response queued")))
    }
}
