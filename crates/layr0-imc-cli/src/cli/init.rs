/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML settings file
[POS]:    CLI initialization layer
[UPDATE]: When Settings schema changes
*/

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use console::style;
use dialoguer::{Input, Password, Select, theme::ColorfulTheme};

use crate::config::{KeyPlacement, Settings};

/// Prompt for connection settings and write them to `output`, or to the
/// default settings path.
pub fn run_init(output: Option<PathBuf>) -> Result<()> {
    let output = match output {
        Some(path) => path,
        None => Settings::default_path()
            .ok_or_else(|| anyhow!("no config directory on this platform; pass --output"))?,
    };

    println!("{}", style("Welcome to layr0-imc setup").bold().cyan());
    println!(
        "{}",
        style("This will create the connection settings used by every command.").dim()
    );

    let theme = ColorfulTheme::default();
    let defaults = Settings::default();

    println!("\n{}", style("--- Server ---").bold());
    let host: String = Input::with_theme(&theme)
        .with_prompt("Host URL")
        .default(defaults.host.clone())
        .interact_text()?;

    let api_key: String = Password::with_theme(&theme)
        .with_prompt("API Key (leave empty to use LAYR0_IMC_API_KEY)")
        .allow_empty_password(true)
        .interact()?;

    let placements = ["body (apikey field)", "header"];
    let api_key_placement = match Select::with_theme(&theme)
        .with_prompt("Send API key in")
        .items(&placements)
        .default(0)
        .interact()?
    {
        0 => KeyPlacement::Body,
        _ => KeyPlacement::Header,
    };

    let api_key_header = if api_key_placement == KeyPlacement::Header {
        Input::with_theme(&theme)
            .with_prompt("Header name")
            .default(defaults.api_key_header.clone())
            .interact_text()?
    } else {
        defaults.api_key_header.clone()
    };

    println!("\n{}", style("--- Strategy Webhook ---").bold());
    let webhook_id: String = Input::with_theme(&theme)
        .with_prompt("Webhook ID (optional)")
        .allow_empty(true)
        .interact_text()?;

    println!("\n{}", style("--- Timeouts ---").bold());
    let timeout_secs: u64 = Input::with_theme(&theme)
        .with_prompt("Request timeout (seconds)")
        .default(defaults.timeout_secs)
        .interact_text()?;

    let settings = Settings {
        host,
        api_key: non_empty(api_key),
        api_key_placement,
        api_key_header,
        timeout_secs,
        webhook_id: non_empty(webhook_id),
        ..defaults
    };

    settings
        .write_to(&output)
        .context("failed to write settings")?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!("Settings written to: {}", style(output.display()).cyan());

    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_answers_become_none() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" wh-1 ".to_string()), Some("wh-1".to_string()));
    }
}
