//! Activity log API endpoints

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    models::{ActivityPage, ActivityQuery},
    services::{export_activities, ExportFormat},
    utils::{page_window, AppError, PageItem, SortDirection, PAGE_WINDOW_DELTA},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activity))
        .route("/types", get(activity_types))
        .route("/export", get(export_activity))
        .route("/feed", get(feed_snapshot))
        .route("/feed/pause", post(pause_feed))
        .route("/feed/resume", post(resume_feed))
        .route("/feed/sort", post(toggle_feed_sort))
        .route("/{id}", get(activity_detail))
}

/// Activity page plus the windowed pager sequence for it.
#[derive(Serialize)]
struct ActivityListResponse {
    #[serde(flatten)]
    page: ActivityPage,
    page_window: Vec<PageItem>,
}

async fn list_activity(
    State(state): State<AppState>,
    Query(mut query): Query<ActivityQuery>,
) -> Result<Json<ActivityListResponse>, AppError> {
    if query.limit.is_none() {
        query.limit = Some(state.config.dashboard.page_size);
    }
    let page = state.audit.activity_page(query).await?;
    let window = page_window(
        page.pagination.page,
        page.pagination.total_pages,
        PAGE_WINDOW_DELTA,
    );
    Ok(Json(ActivityListResponse {
        page,
        page_window: window,
    }))
}

async fn activity_types(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.audit.activity_types().await?))
}

async fn activity_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    match state.audit.activity_detail(id).await? {
        Some(activity) => Ok(Json(activity)),
        None => Err(AppError::not_found(format!("Activity {} not found", id))),
    }
}

// Filters are spelled out rather than flattened: query-string
// deserialization rejects flattened numeric fields.
#[derive(Deserialize)]
struct ExportParams {
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    activity_type: Option<String>,
    #[serde(default)]
    user_id: Option<Uuid>,
    #[serde(default)]
    project_id: Option<Uuid>,
    #[serde(default)]
    days: Option<u32>,
    #[serde(default)]
    search: Option<String>,
}

impl ExportParams {
    fn filters(&self) -> ActivityQuery {
        ActivityQuery {
            activity_type: self.activity_type.clone(),
            user_id: self.user_id,
            project_id: self.project_id,
            days: self.days,
            search: self.search.clone(),
            page: None,
            limit: None,
        }
    }
}

async fn export_activity(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let format: ExportFormat = match params.format.as_deref() {
        Some(raw) => raw.parse().map_err(AppError::bad_request)?,
        None => ExportFormat::default(),
    };

    let activities = state.audit.export_window(params.filters()).await?;
    let artifact = export_activities(&activities, format)
        .map_err(|e| AppError::internal(format!("Failed to build export: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.bytes,
    ))
}

async fn feed_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.feed.snapshot().await)
}

async fn pause_feed(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.feed.pause();
    Json(serde_json::json!({"paused": true}))
}

async fn resume_feed(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.feed.resume();
    Json(serde_json::json!({"paused": false}))
}

#[derive(Deserialize)]
struct SortParams {
    column: String,
}

#[derive(Serialize)]
struct SortResponse {
    column: String,
    direction: SortDirection,
}

async fn toggle_feed_sort(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Json<SortResponse> {
    let (column, direction) = state.feed.toggle_sort(&params.column).await;
    Json(SortResponse { column, direction })
}
