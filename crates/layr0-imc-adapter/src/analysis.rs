/*
[INPUT]:  Margin results for several strategies
[OUTPUT]: Formatted amounts and hedge savings against naked benchmarks
[POS]:    Domain helpers - margin comparison and display
[UPDATE]: When report columns or formatting rules change
*/

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::MarginResult;

/// `₹1,234,567.89`, or `N/A` when the server left the amount out.
pub fn format_margin(amount: Option<Decimal>) -> String {
    let Some(amount) = amount else {
        return "N/A".to_string();
    };

    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}₹{grouped}.{fraction}")
}

/// Percentage saved by `hedged` relative to `naked`; `None` when the
/// benchmark is not positive.
pub fn savings_pct(naked: Decimal, hedged: Decimal) -> Option<Decimal> {
    if naked <= Decimal::ZERO {
        return None;
    }
    Some((naked - hedged) / naked * Decimal::ONE_HUNDRED)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub label: String,
    /// `None` when the request failed or was rejected
    pub total: Option<Decimal>,
    /// Label of the row this one is measured against
    pub benchmark: Option<String>,
}

/// Side-by-side view of several margin requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarginComparison {
    rows: Vec<ComparisonRow>,
}

impl MarginComparison {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: impl Into<String>, result: &MarginResult, benchmark: Option<&str>) {
        self.rows.push(ComparisonRow {
            label: label.into(),
            total: result.total_margin_required(),
            benchmark: benchmark.map(str::to_string),
        });
    }

    /// Record a row whose request never produced a result.
    pub fn record_unavailable(&mut self, label: impl Into<String>, benchmark: Option<&str>) {
        self.rows.push(ComparisonRow {
            label: label.into(),
            total: None,
            benchmark: benchmark.map(str::to_string),
        });
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn total_for(&self, label: &str) -> Option<Decimal> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .and_then(|row| row.total)
    }

    /// Savings of `row` against its benchmark, when both totals are known.
    pub fn savings(&self, row: &ComparisonRow) -> Option<Decimal> {
        let benchmark = row.benchmark.as_deref()?;
        savings_pct(self.total_for(benchmark)?, row.total?)
    }

    /// Row with the smallest positive requirement.
    pub fn cheapest(&self) -> Option<&ComparisonRow> {
        self.rows
            .iter()
            .filter(|row| row.total.is_some_and(|total| total > Decimal::ZERO))
            .min_by_key(|row| row.total)
    }
}
