use async_trait::async_trait;
use crate::{AnalysisError, Bar, Fundamentals, HistoryRequest, MonthlyRequest, SymbolMatch};

/// Capability used by the seasonality path: fetch a monthly-granularity
/// series or fail. Callers treat a failure as "no monthly data".
#[async_trait]
pub trait MonthlyHistorySource: Send + Sync {
    async fn fetch_monthly(&self, symbol: &str, request: MonthlyRequest) -> Result<Vec<Bar>, AnalysisError>;
}

/// Trait for market-data providers
#[async_trait]
pub trait MarketDataProvider: MonthlyHistorySource {
    /// Free-text symbol search
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, AnalysisError>;

    /// Daily (or other interval) OHLCV history, ascending by date.
    /// An unknown symbol yields an empty vector, not an error.
    async fn daily_history(&self, symbol: &str, request: &HistoryRequest) -> Result<Vec<Bar>, AnalysisError>;

    /// Flat key/value fundamentals snapshot
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, AnalysisError>;
}
