//! Year × month seasonality grid and weekday return profile.
//!
//! The grid prefers a true monthly-granularity series fetched from the
//! provider. When that fetch is unavailable (no symbol, provider error, empty
//! series, nothing left after trimming) it falls back to compounding the daily
//! returns inside each calendar month. [`reconcile_from_series`] is the pure
//! core; [`reconcile`] adds the fetch.

use std::collections::BTreeMap;

use analysis_core::{Bar, DateWindow, MonthlyBar, MonthlyHistorySource, MonthlyRequest};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::simple_returns;

/// Where the grid came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalitySource {
    Monthly,
    DailyCompounded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyReturn {
    pub year: i32,
    pub month: u32,
    pub value: f64,
}

/// Rectangular rendering of the grid: one row per year, one column per month
/// present anywhere in the grid, missing cells as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub columns: Vec<u32>,
    pub index: Vec<i32>,
    pub data: Vec<Vec<f64>>,
}

/// Sparse (year, month) → return table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonalityGrid {
    cells: BTreeMap<(i32, u32), f64>,
}

impl SeasonalityGrid {
    pub fn from_returns(rows: &[MonthlyReturn]) -> Self {
        let cells = rows.iter().map(|r| ((r.year, r.month), r.value)).collect();
        Self { cells }
    }

    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        self.cells.get(&(year, month)).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = (i32, u32)> + '_ {
        self.cells.keys().copied()
    }

    pub fn to_heatmap(&self) -> Heatmap {
        let mut index: Vec<i32> = self.cells.keys().map(|(y, _)| *y).collect();
        index.dedup();

        let mut columns: Vec<u32> = self.cells.keys().map(|(_, m)| *m).collect();
        columns.sort_unstable();
        columns.dedup();

        let data = index
            .iter()
            .map(|year| {
                columns
                    .iter()
                    .map(|month| self.get(*year, *month).unwrap_or(0.0))
                    .collect()
            })
            .collect();

        Heatmap { columns, index, data }
    }
}

impl Serialize for SeasonalityGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_heatmap().serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalityReport {
    #[serde(rename = "monthly_heatmap")]
    pub grid: SeasonalityGrid,
    /// Calendar month (1-12) → mean monthly return across years
    pub avg_monthly: BTreeMap<u32, f64>,
    /// Weekday (Mon = 0) → mean daily return in percent. Weekdays without
    /// observations are absent.
    pub avg_daily: BTreeMap<u32, f64>,
    pub source: SeasonalitySource,
}

/// Mean daily return per weekday, in percent
pub fn average_daily(bars: &[Bar]) -> BTreeMap<u32, f64> {
    let returns = simple_returns(bars);
    let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();

    for (bar, r) in bars.iter().skip(1).zip(&returns) {
        let entry = buckets.entry(bar.weekday_index()).or_insert((0.0, 0));
        entry.0 += r;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(day, (sum, count))| (day, sum / count as f64 * 100.0))
        .collect()
}

/// Compound the daily returns inside each calendar month. A month whose only
/// bar is the first of the series has no return to compound and reports 0.
pub fn compound_monthly(bars: &[Bar]) -> Vec<MonthlyReturn> {
    let mut growth: BTreeMap<(i32, u32), f64> = BTreeMap::new();

    if let Some(first) = bars.first() {
        growth.insert(first.month_key(), 1.0);
    }
    for (w, r) in bars.windows(2).zip(simple_returns(bars)) {
        *growth.entry(w[1].month_key()).or_insert(1.0) *= 1.0 + r;
    }

    growth
        .into_iter()
        .map(|((year, month), g)| MonthlyReturn { year, month, value: g - 1.0 })
        .collect()
}

/// Month-over-month returns from a monthly close series, keeping months at or
/// after `from`. The first row has no predecessor and is dropped; so is a
/// lead-in month before `from`.
pub fn monthly_from_closes(monthly: &[MonthlyBar], from: Option<(i32, u32)>) -> Vec<MonthlyReturn> {
    // one row per month, last write wins (providers may append a partial month)
    let by_month: BTreeMap<(i32, u32), f64> = monthly.iter().map(|m| (m.key(), m.close)).collect();
    let rows: Vec<((i32, u32), f64)> = by_month.into_iter().collect();

    rows.windows(2)
        .filter(|w| w[0].1 != 0.0)
        .map(|w| {
            let ((year, month), close) = w[1];
            MonthlyReturn { year, month, value: close / w[0].1 - 1.0 }
        })
        .filter(|r| from.map_or(true, |key| (r.year, r.month) >= key))
        .collect()
}

/// Calendar month → mean return across all years present
pub fn average_by_month(rows: &[MonthlyReturn]) -> BTreeMap<u32, f64> {
    let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = buckets.entry(row.month).or_insert((0.0, 0));
        entry.0 += row.value;
        entry.1 += 1;
    }
    buckets
        .into_iter()
        .map(|(month, (sum, count))| (month, sum / count as f64))
        .collect()
}

/// Build the report from data already in hand. `monthly = None` selects the
/// daily-compounding path directly.
pub fn reconcile_from_series(
    daily: &[Bar],
    monthly: Option<&[MonthlyBar]>,
    window_start: Option<NaiveDate>,
) -> SeasonalityReport {
    let from = window_start.map(|d| (d.year(), d.month()));

    let primary = monthly
        .map(|m| monthly_from_closes(m, from))
        .filter(|rows| !rows.is_empty());

    let (rows, source) = match primary {
        Some(rows) => (rows, SeasonalitySource::Monthly),
        None => (compound_monthly(daily), SeasonalitySource::DailyCompounded),
    };

    SeasonalityReport {
        grid: SeasonalityGrid::from_returns(&rows),
        avg_monthly: average_by_month(&rows),
        avg_daily: average_daily(daily),
        source,
    }
}

/// Fetch the monthly series for `symbol`, or `None` if it is unavailable for
/// any reason.
async fn fetch_monthly_series<S>(source: &S, symbol: &str, window: Option<DateWindow>) -> Option<Vec<MonthlyBar>>
where
    S: MonthlyHistorySource + ?Sized,
{
    let request = match window {
        Some(w) => MonthlyRequest::Range { from: w.lead_in_start(), to: w.end },
        None => MonthlyRequest::Max,
    };

    match source.fetch_monthly(symbol, request).await {
        Ok(bars) if !bars.is_empty() => Some(bars.iter().map(MonthlyBar::from_bar).collect()),
        Ok(_) => {
            tracing::warn!(symbol, "Monthly history empty, using daily compounding");
            None
        }
        Err(e) => {
            tracing::warn!(symbol, error = %e, "Monthly history unavailable, using daily compounding");
            None
        }
    }
}

/// Seasonality for one request: monthly series when the provider has it,
/// compounded daily returns otherwise. Never fails.
pub async fn reconcile<S>(
    source: &S,
    daily: &[Bar],
    symbol: Option<&str>,
    window: Option<DateWindow>,
) -> SeasonalityReport
where
    S: MonthlyHistorySource + ?Sized,
{
    let monthly = match symbol {
        Some(symbol) => fetch_monthly_series(source, symbol, window).await,
        None => None,
    };

    let report = reconcile_from_series(daily, monthly.as_deref(), window.map(|w| w.start));
    tracing::debug!(source = ?report.source, cells = report.grid.len(), "Seasonality reconciled");
    report
}
