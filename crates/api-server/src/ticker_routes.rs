use analysis_core::{DateWindow, HistoryRequest};
use analysis_orchestrator::AnalysisResponse;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppError, AppState};

/// Intervals that yield one bar per session or coarser
const SESSION_INTERVALS: &[&str] = &["1d", "5d", "1wk", "1mo", "3mo"];

#[derive(Debug, Default, Deserialize)]
pub struct TickerQuery {
    pub period: Option<String>,
    pub interval: Option<String>,
    /// `YYYY-MM-DD`, inclusive; overrides `period` together with `end`
    pub start: Option<String>,
    pub end: Option<String>,
}

impl TickerQuery {
    fn window(&self) -> Result<Option<DateWindow>, AppError> {
        let parse = |label: &str, value: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("invalid {} date '{}', expected YYYY-MM-DD", label, value)))
        };

        match (self.start.as_deref(), self.end.as_deref()) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => {
                let window = DateWindow::new(parse("start", start)?, parse("end", end)?)?;
                Ok(Some(window))
            }
            _ => Err(AppError::BadRequest("start and end must be given together".to_string())),
        }
    }

    pub fn history_request(&self) -> Result<HistoryRequest, AppError> {
        let defaults = HistoryRequest::default();
        let period = self.period.clone().filter(|p| !p.is_empty()).unwrap_or(defaults.period);
        let interval = self.interval.clone().filter(|i| !i.is_empty()).unwrap_or(defaults.interval);
        if !SESSION_INTERVALS.contains(&interval.as_str()) {
            return Err(AppError::BadRequest(format!(
                "unsupported interval '{}', expected one of {}",
                interval,
                SESSION_INTERVALS.join(", ")
            )));
        }

        Ok(HistoryRequest::new(period, interval).with_window(self.window()?))
    }
}

pub fn ticker_routes() -> Router<AppState> {
    Router::new().route("/api/ticker/:symbol", get(get_ticker))
}

async fn get_ticker(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<TickerQuery>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let request = query.history_request()?;
    let response = state.orchestrator.analyze(symbol.trim(), &request).await?;
    Ok(Json(response))
}
