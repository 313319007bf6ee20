use std::sync::Arc;

use analysis_core::{AnalysisError, Fundamentals, HistoryRequest, MarketDataProvider, SymbolMatch};
use fundamental_analysis::RatioSnapshot;
use quant_analysis::{DistributionReport, DrawdownReport, SeasonalityReport, SummaryStats};
use serde::Serialize;
use serde_json::Value;
use technical_analysis::{ChartPoint, IndicatorEngine, TechnicalSnapshot};

const SUMMARY_KEY: &str = "longBusinessSummary_es";
const NO_SUMMARY: &str = "No summary available.";

/// Every analysis computed for one ticker request
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSection {
    pub technical: TechnicalSnapshot,
    pub seasonality: SeasonalityReport,
    pub distribution: DistributionReport,
    pub drawdowns: DrawdownReport,
    pub ratios: RatioSnapshot,
}

/// Response body for `/api/ticker/{symbol}`
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub symbol: String,
    pub info: Fundamentals,
    /// `None` when there are fewer than two bars to compare
    pub stats: Option<SummaryStats>,
    pub chart_data: Vec<ChartPoint>,
    pub analysis: AnalysisSection,
}

/// Copies the best available business description into
/// `longBusinessSummary_es`.
pub fn enrich_info(info: &mut Fundamentals) {
    let text = |key: &str| {
        info.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let summary = text("longBusinessSummary")
        .or_else(|| text("description"))
        .unwrap_or_else(|| NO_SUMMARY.to_string());

    info.insert(SUMMARY_KEY.to_string(), Value::String(summary));
}

pub struct AnalysisOrchestrator {
    provider: Arc<dyn MarketDataProvider>,
    indicators: IndicatorEngine,
}

impl AnalysisOrchestrator {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            indicators: IndicatorEngine::new(),
        }
    }

    /// Symbol search for the autocomplete box. Provider failures come back
    /// as an empty list.
    pub async fn search(&self, query: &str) -> Vec<SymbolMatch> {
        match self.provider.search(query).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(query, error = %e, "Symbol search failed");
                Vec::new()
            }
        }
    }

    /// Full analysis for one symbol
    pub async fn analyze(&self, symbol: &str, request: &HistoryRequest) -> Result<AnalysisResponse, AnalysisError> {
        tracing::info!(
            "Starting analysis for {} (period: {}, interval: {}, window: {:?})",
            symbol,
            request.period,
            request.interval,
            request.window
        );

        let bars = self.provider.daily_history(symbol, request).await?;
        if bars.is_empty() {
            return Err(AnalysisError::NotFound("No data found for symbol".to_string()));
        }

        let mut info = self.provider.fundamentals(symbol).await?;
        enrich_info(&mut info);

        let (chart_data, technical) = self.indicators.compute(&bars);
        let seasonality =
            quant_analysis::reconcile(self.provider.as_ref(), &bars, Some(symbol), request.window).await;
        let distribution = quant_analysis::distribution(&bars);
        let drawdowns = quant_analysis::drawdowns(&bars);
        let ratios = fundamental_analysis::extract(&info);
        let stats = quant_analysis::summary_statistics(quant_analysis::trailing_year(&bars));

        tracing::info!("Analysis complete for {} ({} bars)", symbol, bars.len());

        Ok(AnalysisResponse {
            symbol: symbol.to_string(),
            info,
            stats,
            chart_data,
            analysis: AnalysisSection {
                technical,
                seasonality,
                distribution,
                drawdowns,
                ratios,
            },
        })
    }
}
