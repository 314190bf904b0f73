/*
[INPUT]:  Server host and API key (LAYR0_IMC_HOST / LAYR0_IMC_API_KEY)
[OUTPUT]: Margin requirements for a stock buy and a short straddle
[POS]:    Examples - margin calculation
[UPDATE]: When margin API changes
*/

use layr0_imc_adapter::*;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Example: Calculate margin for a single leg and for a hedged pair
#[tokio::main]
async fn main() {
    println!("=== layr0-imc Margin Example ===\n");

    let host = std::env::var("LAYR0_IMC_HOST").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let api_key = std::env::var("LAYR0_IMC_API_KEY").unwrap_or_else(|_| "your_api_key_here".to_string());

    let client = match Layr0Client::new(&host, api_key) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created for {host}\n");

    println!("Single stock (SBIN, CNC, 10 @ 750.50)...");
    let price = Decimal::from_str("750.50").unwrap_or_default();
    let sbin = PositionParams::new("SBIN", Exchange::Nse, Action::Buy, Product::Cnc, 10).limit(price);
    print_result(client.margin(vec![sbin]).await);

    println!("\nShort straddle (NIFTY 26000, 1 lot)...");
    let straddle = StrategyTemplate::ShortStraddle {
        strike: Decimal::from(26000),
    }
    .legs(&Underlying::new("NIFTY", "30DEC25", 75), 1);
    print_result(client.margin(straddle).await);

    println!("\n✓ Margin example complete");
}

fn print_result(result: Result<MarginResult>) {
    match result {
        Ok(MarginResult::Success(breakdown)) => {
            println!("  Total Margin Required: {}", format_margin(Some(breakdown.total_margin_required)));
            println!("  SPAN Margin: {}", format_margin(breakdown.span_margin));
            println!("  Exposure Margin: {}", format_margin(breakdown.exposure_margin));
        }
        Ok(MarginResult::Failure { message }) => println!("  ✗ Server rejected request: {message}"),
        Err(e) => println!("  ✗ Request failed: {e}"),
    }
}
