/*
[INPUT]:  Host, API key, timeouts and API key placement
[OUTPUT]: Configured client ready for margin API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};

use super::error::{Layr0Error, Result};
use super::transport::{HttpTransport, OutboundRequest, Transport, TransportResponse};

/// Header used when the key is sent out of band and no name is configured
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-KEY";

/// Where the API key travels on each request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ApiKeyPlacement {
    /// `"apikey"` field in the JSON body
    #[default]
    Body,
    /// Dedicated request header
    Header { name: String },
}

impl ApiKeyPlacement {
    pub fn header() -> Self {
        ApiKeyPlacement::Header {
            name: DEFAULT_API_KEY_HEADER.to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub api_key_placement: ApiKeyPlacement,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            api_key_placement: ApiKeyPlacement::Body,
        }
    }
}

/// API-key authenticated client for the trading platform.
///
/// Cloning is cheap; clones share the underlying transport.
#[derive(Clone)]
pub struct Layr0Client {
    transport: Arc<dyn Transport>,
    api_key: String,
    api_key_placement: ApiKeyPlacement,
}

impl fmt::Debug for Layr0Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layr0Client")
            .field("transport", &self.transport)
            .field("api_key", &"<redacted>")
            .field("api_key_placement", &self.api_key_placement)
            .finish()
    }
}

impl Layr0Client {
    /// Create a new client with default configuration
    pub fn new(host: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(host, api_key, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(host: &str, api_key: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(host, &config)?;
        Self::with_transport(Arc::new(transport), api_key, config.api_key_placement)
    }

    /// Create a client on top of an arbitrary transport
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        api_key: impl Into<String>,
        api_key_placement: ApiKeyPlacement,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Layr0Error::Config("api key must not be empty".to_string()));
        }
        if let ApiKeyPlacement::Header { name } = &api_key_placement {
            if name.trim().is_empty() {
                return Err(Layr0Error::Config(
                    "api key header name must not be empty".to_string(),
                ));
            }
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                Layr0Error::Config(format!("invalid api key header name {name:?}: {err}"))
            })?;
            HeaderValue::from_str(&api_key).map_err(|_| {
                Layr0Error::Config("api key is not a valid header value".to_string())
            })?;
        }

        Ok(Self {
            transport,
            api_key,
            api_key_placement,
        })
    }

    pub fn api_key_placement(&self) -> &ApiKeyPlacement {
        &self.api_key_placement
    }

    /// Key to embed in the JSON body, if that is where it goes
    pub(crate) fn body_api_key(&self) -> Option<&str> {
        match self.api_key_placement {
            ApiKeyPlacement::Body => Some(&self.api_key),
            ApiKeyPlacement::Header { .. } => None,
        }
    }

    /// POST an already-serialized body, attaching the key header if configured
    pub(crate) async fn post_authenticated(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<TransportResponse> {
        let headers = match &self.api_key_placement {
            ApiKeyPlacement::Body => Vec::new(),
            ApiKeyPlacement::Header { name } => vec![(name.clone(), self.api_key.clone())],
        };
        self.transport
            .post_json(OutboundRequest {
                endpoint: endpoint.to_string(),
                headers,
                body,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::transport::MockTransport;

    #[test]
    fn test_client_rejects_blank_key() {
        let err = Layr0Client::new("http://127.0.0.1:5000", " ").unwrap_err();
        assert!(matches!(err, Layr0Error::Config(_)));
    }

    #[test]
    fn test_client_rejects_blank_header_name() {
        let err = Layr0Client::with_transport(
            Arc::new(MockTransport::new()),
            "key",
            ApiKeyPlacement::Header {
                name: String::new(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, Layr0Error::Config(_)));
    }

    #[test]
    fn test_client_rejects_malformed_header_at_construction() {
        let bad_name = Layr0Client::with_transport(
            Arc::new(MockTransport::new()),
            "key",
            ApiKeyPlacement::Header {
                name: "X API KEY".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(bad_name, Layr0Error::Config(_)));
        assert!(!bad_name.is_retryable());

        let bad_value = Layr0Client::with_config(
            "http://127.0.0.1:5000",
            "key\nwith-newline",
            ClientConfig {
                api_key_placement: ApiKeyPlacement::header(),
                ..ClientConfig::default()
            },
        )
        .unwrap_err();
        assert!(matches!(bad_value, Layr0Error::Config(_)));
        assert!(!bad_value.to_string().contains("with-newline"));

        // Body placement never puts the key in a header.
        assert!(
            Layr0Client::with_transport(
                Arc::new(MockTransport::new()),
                "key\nwith-newline",
                ApiKeyPlacement::Body,
            )
            .is_ok()
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = Layr0Client::new("http://127.0.0.1:5000", "super-secret").unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_body_key_only_for_body_placement() {
        let body = Layr0Client::with_transport(
            Arc::new(MockTransport::new()),
            "k",
            ApiKeyPlacement::Body,
        )
        .unwrap();
        assert_eq!(body.body_api_key(), Some("k"));

        let header = Layr0Client::with_transport(
            Arc::new(MockTransport::new()),
            "k",
            ApiKeyPlacement::header(),
        )
        .unwrap();
        assert_eq!(header.body_api_key(), None);
    }
}
