/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for layr0-imc-adapter tests

use rust_decimal_macros::dec;
use layr0_imc_adapter::{Action, Exchange, PositionParams, Product};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "7371cc58b9d30204e5fee1d143dc8cd9";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// SBIN delivery buy, 10 @ 750.50
pub fn sbin_limit() -> PositionParams {
    PositionParams::new("SBIN", Exchange::Nse, Action::Buy, Product::Cnc, 10).limit(dec!(750.50))
}
