use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// OHLCV bar for one trading session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Monday = 0 ... Sunday = 6
    pub fn weekday_index(&self) -> u32 {
        self.date.weekday().num_days_from_monday()
    }

    pub fn month_key(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

/// One row of a monthly-granularity close series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBar {
    pub year: i32,
    pub month: u32,
    pub close: f64,
}

impl MonthlyBar {
    pub fn from_bar(bar: &Bar) -> Self {
        Self {
            year: bar.date.year(),
            month: bar.date.month(),
            close: bar.close,
        }
    }

    pub fn key(&self) -> (i32, u32) {
        (self.year, self.month)
    }
}

/// Inclusive calendar-date window requested by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalysisError> {
        if start > end {
            return Err(AnalysisError::InvalidData(format!(
                "window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Start of the month preceding `start`, so the first in-window month
    /// has a predecessor to difference against.
    pub fn lead_in_start(&self) -> NaiveDate {
        let month_start = self.start.with_day(1).unwrap_or(self.start);
        month_start
            .checked_sub_months(Months::new(1))
            .unwrap_or(month_start)
    }
}

/// What the seasonality path asks the provider for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyRequest {
    /// `[from, to]` inclusive, monthly granularity
    Range { from: NaiveDate, to: NaiveDate },
    /// Everything the provider has
    Max,
}

/// Daily history request: a named period (`1y`, `max`, ...) unless an
/// explicit window is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub period: String,
    pub interval: String,
    pub window: Option<DateWindow>,
}

impl HistoryRequest {
    pub fn new(period: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            interval: interval.into(),
            window: None,
        }
    }

    pub fn with_window(mut self, window: Option<DateWindow>) -> Self {
        self.window = window;
        self
    }
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self::new("max", "1d")
    }
}

/// Normalized symbol-search match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: Option<String>,
    pub shortname: Option<String>,
    #[serde(rename = "type")]
    pub quote_type: Option<String>,
    pub exchange: Option<String>,
}

/// Loosely-typed fundamentals snapshot keyed by provider field name
pub type Fundamentals = serde_json::Map<String, serde_json::Value>;
