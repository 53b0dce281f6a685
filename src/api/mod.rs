//! API routes and handlers
//!
//! This module defines all API endpoints and their routing. The whole
//! surface is read-only over the audit data; there is no write path back to
//! the activity log.

use axum::{routing::get, Router};

use crate::AppState;

mod activity;
mod health;
mod security;
mod statistics;

pub use health::*;

/// Create the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/activity", activity::routes())
        .nest("/security", security::routes())
        .nest("/statistics", statistics::routes())
}
