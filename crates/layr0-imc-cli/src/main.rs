/*
[INPUT]:  CLI arguments, YAML settings file, LAYR0_IMC_* environment
[OUTPUT]: Margin reports, strategy webhook acknowledgements, settings files
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or subcommands
*/

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use console::style;
use rust_decimal::Decimal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use layr0_imc_adapter::http::normalize_base_url;
use layr0_imc_adapter::{Action, MarginRequest, Underlying};
use layr0_imc_cli::cli::run_init;
use layr0_imc_cli::report;
use layr0_imc_cli::{Settings, load_positions, run_examples, run_hedge};

#[derive(Parser, Debug)]
#[command(name = "layr0-imc-cli", version, about = "Margin calculator and strategy webhook client")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    /// Override the configured host URL
    #[arg(long, value_name = "URL", global = true)]
    host: Option<String>,
    /// Override the configured API key
    #[arg(long = "api-key", value_name = "KEY", global = true)]
    api_key: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate margin for the legs in a YAML or JSON file
    Margin {
        #[arg(long, value_name = "PATH")]
        positions: PathBuf,
    },
    /// Run the built-in margin scenarios
    Examples,
    /// Compare naked futures with hedged strategies
    Hedge {
        #[arg(long, default_value = "NIFTY")]
        underlying: String,
        /// Expiry code as used in symbols, e.g. 25NOV25
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        strike: Decimal,
        /// Distance of the collar wings from the strike
        #[arg(long, default_value = "500")]
        wing: Decimal,
        #[arg(long = "lot-size", default_value_t = 75)]
        lot_size: u64,
        #[arg(long, default_value_t = 1)]
        lots: u64,
    },
    /// Send a signal to a webhook-driven strategy
    StrategyOrder {
        #[arg(long)]
        symbol: String,
        #[arg(long, value_parser = parse_action)]
        action: Action,
        #[arg(long = "position-size")]
        position_size: Option<u64>,
        #[arg(long = "webhook-id")]
        webhook_id: Option<String>,
    },
    /// Create a settings file interactively
    Init {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Validate settings (and optionally a positions file) without sending
    Check {
        #[arg(long, value_name = "PATH")]
        positions: Option<PathBuf>,
    },
}

fn parse_action(value: &str) -> Result<Action, String> {
    match value.trim().to_ascii_uppercase().as_str() {
        "BUY" => Ok(Action::Buy),
        "SELL" => Ok(Action::Sell),
        other => Err(format!("unknown action {other:?}, expected BUY or SELL")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let Cli {
        config_path,
        host,
        api_key,
        command,
        ..
    } = args;
    let load_settings = || -> Result<Settings> {
        let settings = Settings::load(config_path.as_deref())
            .context("load settings")?
            .with_overrides(host.clone(), api_key.clone());
        debug!(host = %settings.host, placement = ?settings.api_key_placement, "settings loaded");
        Ok(settings)
    };

    match command {
        Command::Margin { positions } => {
            let legs = load_positions(&positions)?;
            let client = load_settings()?.margin_client()?;
            info!(legs = legs.len(), "calculating margin");

            report::print_header(&format!("Margin for {}", positions.display()));
            match client.margin(legs).await {
                Ok(result) => {
                    report::print_margin(&result);
                    if !result.is_success() {
                        bail!("server rejected the margin request");
                    }
                }
                Err(err) => {
                    report::print_error(&err);
                    return Err(err.into());
                }
            }
        }
        Command::Examples => {
            let client = load_settings()?.margin_client()?;
            report::print_header("Margin Calculator Examples");
            println!(
                "{}",
                style(chrono::Local::now().format("%Y-%m-%d %H:%M:%S")).dim()
            );

            for outcome in run_examples(&client).await {
                println!("\n=== {} ===", outcome.title);
                match &outcome.result {
                    Ok(result) => {
                        report::print_margin(result);
                        if let (true, Some(note)) = (result.is_success(), outcome.note) {
                            println!("  Note: {note}");
                        }
                    }
                    Err(err) => report::print_error(err),
                }
            }

            report::print_header("All examples completed!");
        }
        Command::Hedge {
            underlying,
            expiry,
            strike,
            wing,
            lot_size,
            lots,
        } => {
            let client = load_settings()?.margin_client()?;
            let underlying = Underlying::new(underlying, expiry, lot_size);
            info!(
                future = %underlying.future_symbol(),
                %strike,
                %wing,
                lots,
                "comparing hedge strategies"
            );

            let comparison = run_hedge(&client, &underlying, strike, wing, lots)
                .await
                .context("build hedge legs")?;
            report::print_comparison(&comparison);
        }
        Command::StrategyOrder {
            symbol,
            action,
            position_size,
            webhook_id,
        } => {
            let client = load_settings()?.strategy_client(webhook_id)?;
            let ack = client
                .strategy_order(&symbol, action, position_size)
                .await
                .context("send strategy order")?;
            println!(
                "{} {}",
                style(ack.status.as_deref().unwrap_or("sent")).green(),
                ack.message.as_deref().unwrap_or("")
            );
        }
        Command::Check { positions } => {
            let settings = load_settings()?;
            let base_url = normalize_base_url(&settings.host).context("invalid host")?;
            println!("Settings OK (host {base_url})");
            if settings.api_key.is_none() {
                println!("{}", style("No API key configured").yellow());
            }
            if let Some(path) = positions {
                let request = MarginRequest::from_params(load_positions(&path)?)
                    .with_context(|| format!("invalid legs in {}", path.display()))?;
                println!("Positions OK ({} legs)", request.len());
            }
        }
        Command::Init { output } => run_init(output)?,
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
