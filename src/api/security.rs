//! Security events API endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{models::SecurityReport, utils::AppError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/events", get(security_events))
}

#[derive(Deserialize)]
struct WindowParams {
    #[serde(default)]
    days: Option<u32>,
}

async fn security_events(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<SecurityReport>, AppError> {
    let days = params
        .days
        .or(Some(state.config.dashboard.security_window_days));
    Ok(Json(state.audit.security_events(days).await?))
}
