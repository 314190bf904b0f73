/*
[INPUT]:  Margin results, comparisons and errors from the adapter
[OUTPUT]: Human-readable console report lines
[POS]:    Presentation layer - terminal output
[UPDATE]: When report layout or colour scheme changes
*/

use console::style;
use layr0_imc_adapter::{Layr0Error, MarginComparison, MarginResult, format_margin};
use rust_decimal::{Decimal, RoundingStrategy};

const RULE_WIDTH: usize = 80;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn print_header(title: &str) {
    println!("\n{}", rule());
    println!("{}", style(title).bold().cyan());
    println!("{}", rule());
}

/// Lines describing one margin outcome. Kept separate from printing so the
/// layout is testable.
pub fn margin_lines(result: &MarginResult) -> Vec<String> {
    match result {
        MarginResult::Success(breakdown) => vec![
            format!(
                "Total Margin Required: {}",
                format_margin(Some(breakdown.total_margin_required))
            ),
            format!("SPAN Margin:           {}", format_margin(breakdown.span_margin)),
            format!(
                "Exposure Margin:       {}",
                format_margin(breakdown.exposure_margin)
            ),
        ],
        MarginResult::Failure { message } => vec![format!("Error: {message}")],
    }
}

pub fn print_margin(result: &MarginResult) {
    let styled = result.is_success();
    for line in margin_lines(result) {
        if styled {
            println!("  {}", style(line).green());
        } else {
            println!("  {}", style(line).red());
        }
    }
}

pub fn print_error(err: &Layr0Error) {
    let kind = if err.is_validation_error() {
        "Invalid request"
    } else if err.is_retryable() {
        "Request failed (retryable)"
    } else {
        "Request failed"
    };
    println!("  {}", style(format!("{kind}: {err}")).red());
}

pub fn comparison_lines(comparison: &MarginComparison) -> Vec<String> {
    let mut lines = Vec::with_capacity(comparison.rows().len() + 1);
    for row in comparison.rows() {
        let mut line = format!("{:<24} {:>20}", row.label, format_margin(row.total));
        if let Some(saved) = comparison.savings(row) {
            line.push_str(&format!("  ({}% lower)", percent(saved)));
        }
        lines.push(line);
    }
    if let Some(cheapest) = comparison.cheapest() {
        lines.push(format!(
            "Lowest requirement: {} at {}",
            cheapest.label,
            format_margin(cheapest.total)
        ));
    }
    lines
}

pub fn print_comparison(comparison: &MarginComparison) {
    print_header("MARGIN COMPARISON SUMMARY");
    for line in comparison_lines(comparison) {
        println!("  {line}");
    }
}

fn percent(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
