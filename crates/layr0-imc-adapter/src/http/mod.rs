/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod margin;
pub mod strategy;
pub mod transport;

pub use error::{Layr0Error, Result, ValidationError};

pub use client::{ApiKeyPlacement, ClientConfig, DEFAULT_API_KEY_HEADER, Layr0Client};
pub use strategy::StrategyClient;
pub use transport::{
    HttpTransport, MockTransport, OutboundRequest, Transport, TransportResponse,
    normalize_base_url,
};
