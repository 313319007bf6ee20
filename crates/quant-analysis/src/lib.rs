//! Return-based analytics over a daily bar series: distribution, drawdowns,
//! seasonality, and the summary statistics card.

use analysis_core::Bar;

pub mod distribution;
pub mod drawdown;
pub mod seasonality;
pub mod statistics;

pub use distribution::*;
pub use drawdown::*;
pub use seasonality::*;
pub use statistics::*;

/// Trading sessions per year, for annualization
pub const TRADING_DAYS: f64 = 252.0;

/// Simple returns `close[t] / close[t-1] - 1`; one shorter than `bars`.
pub fn simple_returns(bars: &[Bar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect()
}
