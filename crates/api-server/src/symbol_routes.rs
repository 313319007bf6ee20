//! Symbol search for the ticker autocomplete box.

use analysis_core::SymbolMatch;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{AppError, AppState};

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub fn symbol_routes() -> Router<AppState> {
    Router::new().route("/api/search", get(search_symbols))
}

async fn search_symbols(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SymbolMatch>>, AppError> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(AppError::BadRequest("query parameter 'q' must not be empty".to_string()));
    }

    Ok(Json(state.orchestrator.search(q).await))
}
