/*
[INPUT]:  Position legs (raw params or a validated MarginRequest)
[OUTPUT]: MarginResult (server success or server-reported failure)
[POS]:    HTTP layer - margin calculator endpoint (API key auth)
[UPDATE]: When the margin endpoint or its envelope changes
*/

use tracing::{debug, warn};
use uuid::Uuid;

use crate::http::{Layr0Client, Layr0Error, Result, TransportResponse};
use crate::types::{
    MarginEnvelope, MarginPayload, MarginRequest, MarginResult, PositionParams, ResponseStatus,
};

const MARGIN_ENDPOINT: &str = "api/v1/margin";

/// Longest slice of an unparseable body quoted back in errors
const BODY_SNIPPET_LEN: usize = 200;

impl Layr0Client {
    /// Calculate margin for one or more legs
    ///
    /// POST /api/v1/margin
    ///
    /// Legs are validated first; an invalid leg or an empty list fails with
    /// [`Layr0Error::Validation`] and nothing is sent.
    pub async fn margin(&self, positions: Vec<PositionParams>) -> Result<MarginResult> {
        let request = MarginRequest::from_params(positions)?;
        self.compute_margin(&request).await
    }

    /// Calculate margin for an already validated request. Exactly one call is
    /// made; retries are up to the caller.
    pub async fn compute_margin(&self, request: &MarginRequest) -> Result<MarginResult> {
        let payload = MarginPayload {
            apikey: self.body_api_key(),
            positions: request.positions(),
        };
        let body = serde_json::to_value(&payload)?;

        let request_id = Uuid::new_v4();
        debug!(%request_id, legs = request.len(), endpoint = MARGIN_ENDPOINT, "submitting margin request");

        let response = match self.post_authenticated(MARGIN_ENDPOINT, body).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%request_id, error = %err, "margin request failed in transport");
                return Err(err);
            }
        };

        let result = decode_margin_response(&response);
        match &result {
            Ok(MarginResult::Success(breakdown)) => debug!(
                %request_id,
                total = %breakdown.total_margin_required,
                "margin computed"
            ),
            Ok(MarginResult::Failure { message }) => {
                debug!(%request_id, status = response.status, %message, "margin rejected by server")
            }
            Err(err) => warn!(%request_id, status = response.status, error = %err, "unreadable margin response"),
        }
        result
    }
}

/// Map a raw response onto the margin contract.
///
/// A well-formed error envelope is a `Failure` whatever the HTTP status;
/// anything else that does not parse is an error.
pub(crate) fn decode_margin_response(response: &TransportResponse) -> Result<MarginResult> {
    let envelope: MarginEnvelope = match serde_json::from_str(&response.body) {
        Ok(envelope) => envelope,
        Err(_) if !response.is_success() => {
            return Err(Layr0Error::Api {
                code: i32::from(response.status),
                message: body_snippet(&response.body),
            });
        }
        Err(err) => {
            return Err(Layr0Error::InvalidResponse(format!(
                "malformed margin response: {err}"
            )));
        }
    };

    match envelope.status {
        ResponseStatus::Success => match envelope.breakdown() {
            Some(Ok(breakdown)) => Ok(MarginResult::Success(breakdown)),
            Some(Err(err)) => Err(Layr0Error::InvalidResponse(format!(
                "malformed margin data: {err}"
            ))),
            None => Err(Layr0Error::InvalidResponse(
                "success response without data".to_string(),
            )),
        },
        ResponseStatus::Error => {
            let message = envelope
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| {
                    format!("request failed with HTTP status {}", response.status)
                });
            Ok(MarginResult::Failure { message })
        }
    }
}

pub(crate) fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(BODY_SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::http::{ApiKeyPlacement, MockTransport, ValidationError};
    use crate::types::{Action, Exchange, MarginBreakdown, Product};

    fn client(transport: Arc<MockTransport>) -> Layr0Client {
        Layr0Client::with_transport(transport, "test-key", ApiKeyPlacement::Body)
            .expect("client init")
    }

    fn sbin_limit() -> PositionParams {
        PositionParams::new("SBIN", Exchange::Nse, Action::Buy, Product::Cnc, 10).limit(dec!(750.50))
    }

    fn iron_condor() -> Vec<PositionParams> {
        let leg = |symbol: &str, action: Action, price: Decimal| {
            PositionParams::new(symbol, Exchange::Nfo, action, Product::Nrml, 75)
                .limit(price)
                .with_lot_size(75)
        };
        vec![
            leg("NIFTY30DEC2526500CE", Action::Sell, dec!(50.00)),
            leg("NIFTY30DEC2527000CE", Action::Buy, dec!(25.00)),
            leg("NIFTY30DEC2525500PE", Action::Sell, dec!(45.00)),
            leg("NIFTY30DEC2525000PE", Action::Buy, dec!(20.00)),
        ]
    }

    #[tokio::test]
    async fn single_leg_success_maps_every_component() {
        let transport = Arc::new(MockTransport::with_json(
            200,
            json!({
                "status": "success",
                "data": {
                    "total_margin_required": 3752.50,
                    "span_margin": 3000.00,
                    "exposure_margin": 752.50
                }
            }),
        ));
        let client = client(transport.clone());

        let result = client.margin(vec![sbin_limit()]).await.expect("margin");

        assert_eq!(
            result,
            MarginResult::Success(MarginBreakdown {
                total_margin_required: dec!(3752.50),
                span_margin: Some(dec!(3000.00)),
                exposure_margin: Some(dec!(752.50)),
            })
        );
        assert_eq!(transport.call_count(), 1);

        let sent = &transport.requests()[0];
        assert_eq!(sent.endpoint, "api/v1/margin");
        assert!(sent.headers.is_empty());
        assert_eq!(
            sent.body,
            json!({
                "apikey": "test-key",
                "positions": [{
                    "symbol": "SBIN",
                    "exchange": "NSE",
                    "action": "BUY",
                    "product": "CNC",
                    "pricetype": "LIMIT",
                    "quantity": "10",
                    "price": "750.50"
                }]
            })
        );
    }

    #[tokio::test]
    async fn iron_condor_without_components_reports_absent() {
        let transport = Arc::new(MockTransport::with_json(
            200,
            json!({"status": "success", "data": {"total_margin_required": 41235.80}}),
        ));
        let client = client(transport.clone());

        let result = client.margin(iron_condor()).await.expect("margin");

        let breakdown = result.breakdown().expect("success");
        assert_eq!(breakdown.total_margin_required, dec!(41235.80));
        assert_eq!(breakdown.span_margin, None);
        assert_eq!(breakdown.exposure_margin, None);
        assert_eq!(transport.call_count(), 1);
        assert_eq!(
            transport.requests()[0].body["positions"]
                .as_array()
                .map(Vec::len),
            Some(4)
        );
    }

    #[tokio::test]
    async fn zero_component_is_not_absent() {
        let transport = Arc::new(MockTransport::with_json(
            200,
            json!({"status": "success", "data": {
                "total_margin_required": 0, "span_margin": 0, "exposure_margin": 0
            }}),
        ));
        let result = client(transport).margin(vec![sbin_limit()]).await.unwrap();
        let breakdown = result.breakdown().unwrap();
        assert_eq!(breakdown.span_margin, Some(Decimal::ZERO));
        assert_eq!(breakdown.exposure_margin, Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn server_error_is_a_failure_not_an_err() {
        let transport = Arc::new(MockTransport::with_json(
            400,
            json!({"status": "error", "message": "Invalid symbol"}),
        ));
        let result = client(transport.clone()).margin(vec![sbin_limit()]).await;

        assert_eq!(
            result.expect("failure is a normal outcome"),
            MarginResult::Failure {
                message: "Invalid symbol".to_string()
            }
        );
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn invalid_legs_never_reach_the_transport() {
        let transport = Arc::new(MockTransport::new());
        let client = client(transport.clone());

        let empty_symbol = PositionParams {
            symbol: String::new(),
            ..sbin_limit()
        };
        let err = client.margin(vec![empty_symbol]).await.unwrap_err();
        assert!(matches!(
            err,
            Layr0Error::Validation(ValidationError::EmptySymbol { leg: 0 })
        ));

        let zero_qty = PositionParams {
            quantity: 0,
            ..sbin_limit()
        };
        let err = client.margin(vec![sbin_limit(), zero_qty]).await.unwrap_err();
        assert!(matches!(
            err,
            Layr0Error::Validation(ValidationError::ZeroQuantity { leg: 1 })
        ));

        let err = client.margin(Vec::new()).await.unwrap_err();
        assert!(matches!(err, Layr0Error::Validation(ValidationError::EmptyRequest)));

        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn transport_error_is_propagated_once() {
        let transport = Arc::new(MockTransport::new());
        transport.push_error(Layr0Error::transport(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )));
        let err = client(transport.clone())
            .margin(vec![sbin_limit()])
            .await
            .unwrap_err();

        assert!(matches!(err, Layr0Error::Transport { .. }));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn header_placement_moves_key_out_of_body() {
        let transport = Arc::new(MockTransport::with_json(
            200,
            json!({"status": "success", "data": {"total_margin_required": "1"}}),
        ));
        let client =
            Layr0Client::with_transport(transport.clone(), "test-key", ApiKeyPlacement::header())
                .unwrap();

        client.margin(vec![sbin_limit()]).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(
            sent.headers,
            vec![("X-API-KEY".to_string(), "test-key".to_string())]
        );
        assert!(sent.body.get("apikey").is_none());
    }

    #[test]
    fn decode_handles_malformed_bodies() {
        let html = TransportResponse {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert!(matches!(
            decode_margin_response(&html),
            Err(Layr0Error::Api { code: 502, .. })
        ));

        let garbage = TransportResponse {
            status: 200,
            body: "not json".to_string(),
        };
        assert!(matches!(
            decode_margin_response(&garbage),
            Err(Layr0Error::InvalidResponse(_))
        ));

        let no_data = TransportResponse {
            status: 200,
            body: r#"{"status":"success"}"#.to_string(),
        };
        assert!(matches!(
            decode_margin_response(&no_data),
            Err(Layr0Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn decode_keeps_full_precision_amounts() {
        let response = TransportResponse {
            status: 200,
            body: r#"{"status":"success","data":{
                "total_margin_required": 1234567890123456.78,
                "span_margin": 0.1000000000000000055
            }}"#
            .to_string(),
        };

        let breakdown = decode_margin_response(&response)
            .unwrap()
            .breakdown()
            .cloned()
            .unwrap();
        assert_eq!(breakdown.total_margin_required, dec!(1234567890123456.78));
        assert_eq!(breakdown.span_margin, Some(dec!(0.1000000000000000055)));
    }

    #[test]
    fn decode_error_envelope_with_data_is_a_failure() {
        let response = TransportResponse {
            status: 400,
            body: r#"{"status":"error","message":"Invalid symbol","data":{}}"#.to_string(),
        };
        assert_eq!(
            decode_margin_response(&response).unwrap(),
            MarginResult::Failure {
                message: "Invalid symbol".to_string()
            }
        );

        let bad_data = TransportResponse {
            status: 200,
            body: r#"{"status":"success","data":{"span_margin":1}}"#.to_string(),
        };
        assert!(matches!(
            decode_margin_response(&bad_data),
            Err(Layr0Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn decode_error_without_message_uses_status() {
        let response = TransportResponse {
            status: 403,
            body: r#"{"status":"error"}"#.to_string(),
        };
        assert_eq!(
            decode_margin_response(&response).unwrap(),
            MarginResult::Failure {
                message: "request failed with HTTP status 403".to_string()
            }
        );
    }
}
