/*
[INPUT]:  Underlying contract (name, expiry code, lot size) and strikes
[OUTPUT]: Validated multi-leg margin requests for common F&O strategies
[POS]:    Domain helpers - derivative symbols and strategy legs
[UPDATE]: When adding strategies or the exchange changes symbol format
*/

use rust_decimal::Decimal;

use crate::http::ValidationError;
use crate::types::{Action, Exchange, MarginRequest, PositionParams, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            OptionKind::Call => "CE",
            OptionKind::Put => "PE",
        }
    }
}

/// Derivatives underlying for one expiry, e.g. NIFTY `25NOV25` with lot 75.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Underlying {
    pub name: String,
    /// Expiry code as it appears in symbols (`25NOV25`, `30DEC25`)
    pub expiry: String,
    pub exchange: Exchange,
    pub lot_size: u64,
}

impl Underlying {
    /// Underlying listed on the NSE F&O segment.
    pub fn new(name: impl Into<String>, expiry: impl Into<String>, lot_size: u64) -> Self {
        Self {
            name: name.into().trim().to_ascii_uppercase(),
            expiry: expiry.into().trim().to_ascii_uppercase(),
            exchange: Exchange::Nfo,
            lot_size,
        }
    }

    pub fn on_exchange(mut self, exchange: Exchange) -> Self {
        self.exchange = exchange;
        self
    }

    /// `NIFTY25NOV25FUT`
    pub fn future_symbol(&self) -> String {
        format!("{}{}FUT", self.name, self.expiry)
    }

    /// `NIFTY25NOV2525000CE`; fractional strikes keep their decimals.
    pub fn option_symbol(&self, strike: Decimal, kind: OptionKind) -> String {
        format!(
            "{}{}{}{}",
            self.name,
            self.expiry,
            strike.normalize(),
            kind.suffix()
        )
    }
}

/// Strategy shapes priced against the margin endpoint. All legs are market
/// orders on the carry-forward (`NRML`) product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrategyTemplate {
    LongFuture,
    ShortFuture,
    /// Long future + long put
    ProtectivePut { strike: Decimal },
    /// Short future + long call
    ProtectiveCall { strike: Decimal },
    /// Long call + short put at the same strike
    SyntheticLong { strike: Decimal },
    /// Long future + long put + short call
    Collar {
        put_strike: Decimal,
        call_strike: Decimal,
    },
    /// Short call + short put at the same strike
    ShortStraddle { strike: Decimal },
    IronCondor {
        long_put: Decimal,
        short_put: Decimal,
        short_call: Decimal,
        long_call: Decimal,
    },
}

impl StrategyTemplate {
    /// Naked futures against hedges around `strike`, collar wings `wing` away.
    pub fn hedge_suite(strike: Decimal, wing: Decimal) -> Vec<StrategyTemplate> {
        vec![
            StrategyTemplate::LongFuture,
            StrategyTemplate::ShortFuture,
            StrategyTemplate::ProtectivePut { strike },
            StrategyTemplate::ProtectiveCall { strike },
            StrategyTemplate::SyntheticLong { strike },
            StrategyTemplate::Collar {
                put_strike: strike - wing,
                call_strike: strike + wing,
            },
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrategyTemplate::LongFuture => "Long Futures",
            StrategyTemplate::ShortFuture => "Short Futures",
            StrategyTemplate::ProtectivePut { .. } => "Long Futures + Put",
            StrategyTemplate::ProtectiveCall { .. } => "Short Futures + Call",
            StrategyTemplate::SyntheticLong { .. } => "Synthetic Long",
            StrategyTemplate::Collar { .. } => "Collar Strategy",
            StrategyTemplate::ShortStraddle { .. } => "Short Straddle",
            StrategyTemplate::IronCondor { .. } => "Iron Condor",
        }
    }

    /// Unhedged position this strategy is measured against, if any.
    pub fn benchmark(&self) -> Option<StrategyTemplate> {
        match self {
            StrategyTemplate::ProtectivePut { .. } => Some(StrategyTemplate::LongFuture),
            StrategyTemplate::ProtectiveCall { .. } => Some(StrategyTemplate::ShortFuture),
            _ => None,
        }
    }

    /// Build validated legs, `lots` contracts each.
    pub fn request(&self, underlying: &Underlying, lots: u64) -> Result<MarginRequest, ValidationError> {
        MarginRequest::from_params(self.legs(underlying, lots))
    }

    pub fn legs(&self, underlying: &Underlying, lots: u64) -> Vec<PositionParams> {
        let quantity = i64::try_from(lots.saturating_mul(underlying.lot_size)).unwrap_or(i64::MAX);
        let leg = |symbol: String, action: Action| {
            PositionParams::new(
                symbol,
                underlying.exchange.clone(),
                action,
                Product::Nrml,
                quantity,
            )
            .with_lot_size(underlying.lot_size)
        };
        let future = |action: Action| leg(underlying.future_symbol(), action);
        let option = |strike: Decimal, kind: OptionKind, action: Action| {
            leg(underlying.option_symbol(strike, kind), action)
        };

        match *self {
            StrategyTemplate::LongFuture => vec![future(Action::Buy)],
            StrategyTemplate::ShortFuture => vec![future(Action::Sell)],
            StrategyTemplate::ProtectivePut { strike } => vec![
                future(Action::Buy),
                option(strike, OptionKind::Put, Action::Buy),
            ],
            StrategyTemplate::ProtectiveCall { strike } => vec![
                future(Action::Sell),
                option(strike, OptionKind::Call, Action::Buy),
            ],
            StrategyTemplate::SyntheticLong { strike } => vec![
                option(strike, OptionKind::Call, Action::Buy),
                option(strike, OptionKind::Put, Action::Sell),
            ],
            StrategyTemplate::Collar {
                put_strike,
                call_strike,
            } => vec![
                future(Action::Buy),
                option(put_strike, OptionKind::Put, Action::Buy),
                option(call_strike, OptionKind::Call, Action::Sell),
            ],
            StrategyTemplate::ShortStraddle { strike } => vec![
                option(strike, OptionKind::Call, Action::Sell),
                option(strike, OptionKind::Put, Action::Sell),
            ],
            StrategyTemplate::IronCondor {
                long_put,
                short_put,
                short_call,
                long_call,
            } => vec![
                option(short_call, OptionKind::Call, Action::Sell),
                option(long_call, OptionKind::Call, Action::Buy),
                option(short_put, OptionKind::Put, Action::Sell),
                option(long_put, OptionKind::Put, Action::Buy),
            ],
        }
    }
}
