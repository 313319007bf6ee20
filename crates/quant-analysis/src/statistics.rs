use analysis_core::Bar;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::TRADING_DAYS;

/// Annual risk-free rate used by the Sharpe ratio
pub const RISK_FREE_RATE: f64 = 0.04;

/// Bars the summary card looks back over (about one trading year)
pub const SUMMARY_WINDOW: usize = 252;

/// Headline numbers for the overview cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub current_price: f64,
    pub total_return_pct: f64,
    pub annualized_volatility_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
}

/// The trailing `SUMMARY_WINDOW` bars
pub fn trailing_year(bars: &[Bar]) -> &[Bar] {
    &bars[bars.len().saturating_sub(SUMMARY_WINDOW)..]
}

/// Summary statistics over log returns. `None` with fewer than two bars.
pub fn summary_statistics(bars: &[Bar]) -> Option<SummaryStats> {
    let log_returns: Vec<f64> = bars
        .windows(2)
        .map(|w| (w[1].close / w[0].close).ln())
        .filter(|r| r.is_finite())
        .collect();

    if log_returns.is_empty() {
        return None;
    }

    let first = bars.first()?.close;
    let last = bars.last()?.close;

    let mut volatility = log_returns.as_slice().std_dev() * TRADING_DAYS.sqrt();
    if !volatility.is_finite() {
        volatility = 0.0;
    }

    let excess_return = log_returns.as_slice().mean() * TRADING_DAYS - RISK_FREE_RATE;
    let sharpe_ratio = if volatility != 0.0 { excess_return / volatility } else { 0.0 };

    let mut cumulative = 1.0_f64;
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0_f64;
    for r in &log_returns {
        cumulative *= 1.0 + r;
        peak = peak.max(cumulative);
        max_drawdown = max_drawdown.min(cumulative / peak - 1.0);
    }

    Some(SummaryStats {
        current_price: last,
        total_return_pct: (last / first - 1.0) * 100.0,
        annualized_volatility_pct: volatility * 100.0,
        sharpe_ratio,
        max_drawdown_pct: max_drawdown * 100.0,
    })
}
