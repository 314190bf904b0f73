/*
[INPUT]:  Server host and strategy webhook id
[OUTPUT]: Webhook acknowledgements for entry and exit signals
[POS]:    Examples - strategy webhook
[UPDATE]: When strategy webhook API changes
*/

use layr0_imc_adapter::*;

/// Example: Drive a server-side strategy through its webhook
#[tokio::main]
async fn main() {
    println!("=== layr0-imc Strategy Webhook Example ===\n");

    let host = std::env::var("LAYR0_IMC_HOST").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let webhook_id = std::env::var("LAYR0_IMC_WEBHOOK_ID").unwrap_or_else(|_| "your-webhook-id".to_string());

    let client = match StrategyClient::new(&host, webhook_id) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };

    // Long/short-only strategy: no position size
    report(client.strategy_order("RELIANCE", Action::Buy, None).await);
    // Strategy configured for both directions: explicit size
    report(client.strategy_order("ZOMATO", Action::Sell, Some(10)).await);
    // Size 0 closes the short
    report(client.strategy_order("ZOMATO", Action::Buy, Some(0)).await);
}

fn report(result: Result<StrategyOrderResponse>) {
    match result {
        Ok(ack) => println!("✓ Order sent: {:?}", ack),
        Err(e) => println!("✗ Error sending order: {}", e),
    }
}
