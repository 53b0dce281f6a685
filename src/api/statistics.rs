//! Audit statistics API endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{models::AuditStatistics, utils::AppError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(statistics))
}

#[derive(Deserialize)]
struct WindowParams {
    #[serde(default)]
    days: Option<u32>,
}

async fn statistics(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<AuditStatistics>, AppError> {
    let days = params
        .days
        .or(Some(state.config.dashboard.stats_window_days));
    Ok(Json(state.audit.statistics(days).await?))
}
