/*
[INPUT]:  Host URL, webhook id, symbol/action/position size
[OUTPUT]: Strategy webhook acknowledgement
[POS]:    HTTP layer - strategy webhook endpoint (webhook id is the credential)
[UPDATE]: When the webhook payload or route changes
*/

use std::sync::Arc;

use tracing::{debug, warn};

use crate::http::margin::body_snippet;
use crate::http::{
    ClientConfig, HttpTransport, Layr0Error, OutboundRequest, Result, Transport, ValidationError,
};
use crate::types::{Action, StrategyOrderPayload, StrategyOrderResponse};

/// Client for strategies configured on the server and driven by webhook.
#[derive(Debug, Clone)]
pub struct StrategyClient {
    transport: Arc<dyn Transport>,
    webhook_id: String,
}

impl StrategyClient {
    pub fn new(host_url: &str, webhook_id: impl Into<String>) -> Result<Self> {
        Self::with_config(host_url, webhook_id, &ClientConfig::default())
    }

    pub fn with_config(
        host_url: &str,
        webhook_id: impl Into<String>,
        config: &ClientConfig,
    ) -> Result<Self> {
        let transport = HttpTransport::new(host_url, config)?;
        Self::with_transport(Arc::new(transport), webhook_id)
    }

    pub fn with_transport(transport: Arc<dyn Transport>, webhook_id: impl Into<String>) -> Result<Self> {
        let webhook_id = webhook_id.into().trim().to_string();
        if webhook_id.is_empty() {
            return Err(ValidationError::EmptyField { field: "webhook_id" }.into());
        }
        if !is_path_segment(&webhook_id) {
            return Err(ValidationError::InvalidPathSegment {
                field: "webhook_id",
                value: webhook_id,
            }
            .into());
        }
        Ok(Self {
            transport,
            webhook_id,
        })
    }

    pub fn webhook_id(&self) -> &str {
        &self.webhook_id
    }

    /// Send a signal to the strategy
    ///
    /// POST /strategy/webhook/{webhook_id}
    ///
    /// `position_size` is only used by strategies configured for both
    /// directions; `Some(0)` closes the open position.
    pub async fn strategy_order(
        &self,
        symbol: &str,
        action: Action,
        position_size: Option<u64>,
    ) -> Result<StrategyOrderResponse> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ValidationError::EmptyField { field: "symbol" }.into());
        }

        let payload = StrategyOrderPayload {
            symbol,
            action,
            position_size: position_size.map(|size| size.to_string()),
        };
        let endpoint = format!("strategy/webhook/{}", self.webhook_id);
        debug!(%endpoint, symbol, %action, ?position_size, "sending strategy order");

        let response = self
            .transport
            .post_json(OutboundRequest {
                endpoint,
                headers: Vec::new(),
                body: serde_json::to_value(&payload)?,
            })
            .await?;

        if !response.is_success() {
            let message = serde_json::from_str::<StrategyOrderResponse>(&response.body)
                .ok()
                .and_then(|ack| ack.message)
                .unwrap_or_else(|| body_snippet(&response.body));
            warn!(status = response.status, %message, "strategy webhook rejected order");
            return Err(Layr0Error::Api {
                code: i32::from(response.status),
                message,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(StrategyOrderResponse::default());
        }
        serde_json::from_str(&response.body).map_err(|err| {
            Layr0Error::InvalidResponse(format!("malformed strategy webhook response: {err}"))
        })
    }
}

/// The id is placed in the path verbatim; it must not add, remove or
/// escape segments.
fn is_path_segment(value: &str) -> bool {
    value != "."
        && value != ".."
        && !value
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn order_payload_includes_position_size_as_string() {
        let transport = Arc::new(MockTransport::with_json(
            200,
            json!({"status": "success", "message": "Order queued"}),
        ));
        let client = StrategyClient::with_transport(transport.clone(), "wh-123").unwrap();

        let ack = client
            .strategy_order("ZOMATO", Action::Sell, Some(10))
            .await
            .unwrap();

        assert_eq!(ack.status.as_deref(), Some("success"));
        let sent = &transport.requests()[0];
        assert_eq!(sent.endpoint, "strategy/webhook/wh-123");
        assert_eq!(
            sent.body,
            json!({"symbol": "ZOMATO", "action": "SELL", "position_size": "10"})
        );
    }

    #[tokio::test]
    async fn order_without_size_omits_field() {
        let transport = Arc::new(MockTransport::new());
        transport.push_raw(200, "");
        let client = StrategyClient::with_transport(transport.clone(), "wh-123").unwrap();

        let ack = client.strategy_order("RELIANCE", Action::Buy, None).await.unwrap();

        assert_eq!(ack, StrategyOrderResponse::default());
        assert_eq!(
            transport.requests()[0].body,
            json!({"symbol": "RELIANCE", "action": "BUY"})
        );
    }

    #[tokio::test]
    async fn http_failure_is_an_api_error() {
        let transport = Arc::new(MockTransport::with_json(
            404,
            json!({"status": "error", "message": "Invalid webhook ID"}),
        ));
        let client = StrategyClient::with_transport(transport, "unknown").unwrap();

        let err = client
            .strategy_order("ZOMATO", Action::Buy, Some(0))
            .await
            .unwrap_err();

        match err {
            Layr0Error::Api { code, message } => {
                assert_eq!(code, 404);
                assert_eq!(message, "Invalid webhook ID");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn webhook_id_cannot_escape_its_path() {
        for webhook_id in ["../../api/v1/margin", "a/b", "..", "id?x=1", "id#frag", "%2e%2e", "a b"] {
            let err = StrategyClient::with_transport(Arc::new(MockTransport::new()), webhook_id)
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    Layr0Error::Validation(ValidationError::InvalidPathSegment { field: "webhook_id", .. })
                ),
                "{webhook_id} accepted"
            );
        }
        assert!(StrategyClient::with_transport(Arc::new(MockTransport::new()), "wh_1-a.b").is_ok());
    }

    #[tokio::test]
    async fn blank_inputs_are_rejected_locally() {
        let transport = Arc::new(MockTransport::new());
        assert!(StrategyClient::with_transport(transport.clone(), "  ").is_err());

        let client = StrategyClient::with_transport(transport.clone(), "wh").unwrap();
        let err = client.strategy_order(" ", Action::Buy, None).await.unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(transport.call_count(), 0);
    }
}
