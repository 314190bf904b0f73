/*
[INPUT]:  A margin client plus underlying/strike parameters
[OUTPUT]: Margin outcomes for the built-in scenarios and hedge comparisons
[POS]:    Command layer - canned margin requests
[UPDATE]: When adding scenarios or hedge strategies
*/

use futures_util::future::join_all;
use layr0_imc_adapter::{
    Action, Exchange, Layr0Client, MarginComparison, MarginResult, PositionParams, Product,
    Result as AdapterResult, StrategyTemplate, Underlying, ValidationError,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// One canned margin request
#[derive(Debug, Clone)]
pub struct Scenario {
    pub title: &'static str,
    pub note: Option<&'static str>,
    pub positions: Vec<PositionParams>,
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub title: &'static str,
    pub note: Option<&'static str>,
    pub result: AdapterResult<MarginResult>,
}

fn nfo(symbol: &str, action: Action, quantity: i64) -> PositionParams {
    PositionParams::new(symbol, Exchange::Nfo, action, Product::Nrml, quantity)
}

/// Equity, futures, option spreads, intraday and stop-loss requests.
pub fn example_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            title: "Single Stock Margin Calculation",
            note: None,
            positions: vec![
                PositionParams::new("SBIN", Exchange::Nse, Action::Buy, Product::Cnc, 10)
                    .limit(Decimal::new(75050, 2)),
            ],
        },
        Scenario {
            title: "Futures Margin Calculation",
            note: None,
            positions: vec![nfo("NIFTY30DEC25FUT", Action::Buy, 75).limit(Decimal::new(2605000, 2))],
        },
        Scenario {
            title: "Options Spread Margin Calculation (Short Straddle)",
            note: Some("Margin benefit applied for hedged positions"),
            positions: vec![
                nfo("NIFTY30DEC2526000CE", Action::Sell, 75).limit(Decimal::new(15000, 2)),
                nfo("NIFTY30DEC2526000PE", Action::Sell, 75).limit(Decimal::new(12500, 2)),
            ],
        },
        Scenario {
            title: "Iron Condor Strategy Margin Calculation",
            note: Some("Significant margin benefit for this hedged strategy"),
            positions: vec![
                nfo("NIFTY30DEC2526500CE", Action::Sell, 75).limit(Decimal::new(5000, 2)),
                nfo("NIFTY30DEC2527000CE", Action::Buy, 75).limit(Decimal::new(2500, 2)),
                nfo("NIFTY30DEC2525500PE", Action::Sell, 75).limit(Decimal::new(4500, 2)),
                nfo("NIFTY30DEC2525000PE", Action::Buy, 75).limit(Decimal::new(2000, 2)),
            ],
        },
        Scenario {
            title: "Intraday (MIS) Margin Calculation",
            note: Some("MIS provides leverage, requiring less margin than CNC"),
            positions: vec![PositionParams::new(
                "RELIANCE",
                Exchange::Nse,
                Action::Buy,
                Product::Mis,
                100,
            )],
        },
        Scenario {
            title: "Stop Loss Order Margin Calculation",
            note: None,
            positions: vec![
                PositionParams::new(
                    "BANKNIFTY30DEC2548000CE",
                    Exchange::Nfo,
                    Action::Buy,
                    Product::Mis,
                    35,
                )
                .stop_limit(Decimal::new(30000, 2), Decimal::new(29500, 2)),
            ],
        },
    ]
}

/// Run every scenario in order, one request each.
pub async fn run_examples(client: &Layr0Client) -> Vec<ScenarioOutcome> {
    let mut outcomes = Vec::new();
    for scenario in example_scenarios() {
        info!(title = scenario.title, legs = scenario.positions.len(), "running scenario");
        let result = client.margin(scenario.positions).await;
        if let Err(err) = &result {
            warn!(title = scenario.title, error = %err, "scenario failed");
        }
        outcomes.push(ScenarioOutcome {
            title: scenario.title,
            note: scenario.note,
            result,
        });
    }
    outcomes
}

/// Price naked futures against hedged variants concurrently.
///
/// Legs are validated before anything is sent; a request that fails in
/// transport shows up as an unavailable row.
pub async fn run_hedge(
    client: &Layr0Client,
    underlying: &Underlying,
    strike: Decimal,
    wing: Decimal,
    lots: u64,
) -> Result<MarginComparison, ValidationError> {
    let suite = StrategyTemplate::hedge_suite(strike, wing);
    let requests = suite
        .iter()
        .map(|template| template.request(underlying, lots))
        .collect::<Result<Vec<_>, _>>()?;

    let results = join_all(requests.iter().map(|request| client.compute_margin(request))).await;

    let mut comparison = MarginComparison::new();
    for (template, result) in suite.iter().zip(results) {
        let benchmark = template.benchmark().map(|benchmark| benchmark.label());
        match result {
            Ok(result) => {
                if let MarginResult::Failure { message } = &result {
                    warn!(strategy = template.label(), %message, "server rejected strategy");
                }
                comparison.record(template.label(), &result, benchmark);
            }
            Err(err) => {
                warn!(strategy = template.label(), error = %err, "strategy margin unavailable");
                comparison.record_unavailable(template.label(), benchmark);
            }
        }
    }
    Ok(comparison)
}
