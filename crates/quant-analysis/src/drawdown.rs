use analysis_core::Bar;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::{simple_returns, TRADING_DAYS};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownReport {
    pub max_drawdown: f64,
    /// Mean of the strictly negative drawdowns, 0 when never under water
    pub avg_drawdown: f64,
    /// 5th-percentile daily return
    pub var_95: f64,
    pub sortino: f64,
    pub current_drawdown: f64,
    /// One entry per bar, always <= 0
    pub drawdown_series: Vec<f64>,
}

/// Drawdown from the running peak of the compounded return curve
pub fn drawdown_series(returns: &[f64]) -> Vec<f64> {
    let mut series = Vec::with_capacity(returns.len() + 1);
    let mut cumulative = 1.0_f64;
    let mut peak = 1.0_f64;
    series.push(0.0);

    for r in returns {
        cumulative *= 1.0 + r;
        peak = peak.max(cumulative);
        series.push((cumulative / peak - 1.0).min(0.0));
    }

    series
}

/// Linear-interpolated percentile, `q` in [0, 100]
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Annualized mean return over annualized downside deviation. The downside
/// variance divides by the full sample size.
pub fn sortino_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let annualized_return = returns.mean() * TRADING_DAYS;
    let downside_variance =
        returns.iter().map(|r| r.min(0.0).powi(2)).sum::<f64>() / returns.len() as f64;
    let downside_dev = downside_variance.sqrt() * TRADING_DAYS.sqrt();

    if downside_dev == 0.0 {
        return 0.0;
    }

    annualized_return / downside_dev
}

pub fn drawdowns(bars: &[Bar]) -> DrawdownReport {
    let returns = simple_returns(bars);
    let series = if bars.is_empty() { vec![] } else { drawdown_series(&returns) };

    let max_drawdown = series.iter().copied().fold(0.0, f64::min);
    let current_drawdown = series.last().copied().unwrap_or(0.0);

    let under_water: Vec<f64> = series.iter().copied().filter(|d| *d < 0.0).collect();
    let avg_drawdown = if under_water.is_empty() {
        0.0
    } else {
        under_water.iter().sum::<f64>() / under_water.len() as f64
    };

    DrawdownReport {
        max_drawdown,
        avg_drawdown,
        var_95: percentile(&returns, 5.0),
        sortino: sortino_ratio(&returns),
        current_drawdown,
        drawdown_series: series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_drawdowns_never_positive() {
        let closes: Vec<f64> = (0..300)
            .map(|i| 100.0 + (i as f64 / 7.0).sin() * 15.0 + i as f64 * 0.05)
            .collect();
        let report = drawdowns(&bars_from_closes(&closes));

        assert!(report.max_drawdown <= 0.0);
        assert!(report.current_drawdown <= 0.0);
        assert!(report.avg_drawdown <= 0.0);
        assert_eq!(report.drawdown_series.len(), closes.len());
        assert!(report.drawdown_series.iter().all(|d| *d <= 0.0));
    }

    #[test]
    fn test_known_drawdown() {
        let report = drawdowns(&bars_from_closes(&[100.0, 120.0, 90.0, 108.0]));

        assert!((report.max_drawdown - (-0.25)).abs() < 1e-12);
        assert!((report.current_drawdown - (-0.10)).abs() < 1e-12);
        assert!((report.avg_drawdown - (-0.175)).abs() < 1e-12);
    }

    #[test]
    fn test_rising_series_has_no_drawdown() {
        let closes: Vec<f64> = (0..50).map(|i| 10.0 + i as f64).collect();
        let report = drawdowns(&bars_from_closes(&closes));

        assert_eq!(report.max_drawdown, 0.0);
        assert_eq!(report.avg_drawdown, 0.0);
        assert_eq!(report.sortino, 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values: Vec<f64> = (1..=21).map(|i| i as f64).collect();
        // rank 0.05 * 20 = 1
        assert!((percentile(&values, 5.0) - 2.0).abs() < 1e-12);
        assert!((percentile(&[1.0, 2.0], 50.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_sortino_sign_follows_mean() {
        assert!(sortino_ratio(&[0.02, -0.01, 0.03, -0.005]) > 0.0);
        assert!(sortino_ratio(&[-0.02, 0.01, -0.03]) < 0.0);
    }

    #[test]
    fn test_empty_series() {
        let report = drawdowns(&[]);
        assert!(report.drawdown_series.is_empty());
        assert_eq!(report.max_drawdown, 0.0);
        assert_eq!(report.var_95, 0.0);
    }
}
