use std::time::Duration;

use analysis_core::{
    AnalysisError, Bar, Fundamentals, HistoryRequest, MarketDataProvider, MonthlyHistorySource,
    MonthlyRequest, SymbolMatch,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::parse::{self, SUMMARY_MODULES};

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    /// Applied to every request
    pub timeout: Duration,
    /// Tighter bound for the interactive search box
    pub search_timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            search_timeout: Duration::from_secs(5),
        }
    }
}

/// Market-data provider backed by the Yahoo Finance HTTP API.
///
/// Holds one pooled `reqwest::Client` with a cookie store; nothing else is
/// kept between calls.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    config: YahooConfig,
}

impl YahooClient {
    pub fn new(config: YahooConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Decode a JSON body whatever the status; Yahoo reports most failures
    /// inside the payload.
    async fn get_json(&self, builder: reqwest::RequestBuilder) -> Result<Value, AnalysisError> {
        let response = builder
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                AnalysisError::ApiError(format!("malformed response: {}", e))
            } else {
                AnalysisError::ApiError(format!("HTTP {}: {}", status, text))
            }
        })
    }

    async fn chart(&self, symbol: &str, query: Vec<(&'static str, String)>) -> Result<Vec<Bar>, AnalysisError> {
        let url = self.url(&format!("/v8/finance/chart/{}", symbol));
        tracing::debug!(symbol, ?query, "Fetching chart");

        let body = self.get_json(self.client.get(&url).query(&query)).await?;
        parse::parse_chart(&body)
    }

    /// Session crumb for quoteSummary. Visiting the cookie host seeds the
    /// cookie store; its status is irrelevant.
    async fn crumb(&self) -> Result<String, AnalysisError> {
        if let Err(e) = self.client.get(COOKIE_URL).send().await {
            tracing::debug!("Cookie priming request failed: {}", e);
        }

        let crumb = self
            .client
            .get(self.url("/v1/test/getcrumb"))
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?
            .text()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        let crumb = crumb.trim();
        if crumb.is_empty() || crumb.contains('<') || crumb.contains(' ') {
            return Err(AnalysisError::ApiError("could not obtain a session crumb".to_string()));
        }
        Ok(crumb.to_string())
    }
}

#[async_trait]
impl MonthlyHistorySource for YahooClient {
    async fn fetch_monthly(&self, symbol: &str, request: MonthlyRequest) -> Result<Vec<Bar>, AnalysisError> {
        self.chart(symbol, parse::monthly_query(request)).await
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, AnalysisError> {
        let builder = self
            .client
            .get(self.url("/v1/finance/search"))
            .query(&[("q", query)])
            .timeout(self.config.search_timeout);

        let body = self.get_json(builder).await?;
        Ok(parse::parse_search(&body))
    }

    async fn daily_history(&self, symbol: &str, request: &HistoryRequest) -> Result<Vec<Bar>, AnalysisError> {
        let bars = self.chart(symbol, parse::history_query(request)).await?;
        tracing::info!(symbol, bars = bars.len(), period = %request.period, "Fetched price history");
        Ok(bars)
    }

    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, AnalysisError> {
        let crumb = self.crumb().await?;
        let url = self.url(&format!("/v10/finance/quoteSummary/{}", symbol));
        let modules = SUMMARY_MODULES.join(",");

        let body = self
            .get_json(
                self.client
                    .get(&url)
                    .query(&[("modules", modules.as_str()), ("crumb", crumb.as_str())]),
            )
            .await?;
        parse::flatten_quote_summary(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = YahooConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.search_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = YahooClient::new(YahooConfig {
            base_url: "http://localhost:9000/".to_string(),
            ..YahooConfig::default()
        })
        .unwrap();

        assert_eq!(
            client.url("/v1/finance/search"),
            "http://localhost:9000/v1/finance/search"
        );
    }
}
