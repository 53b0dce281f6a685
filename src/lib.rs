//! Audit WebUI Library
//!
//! Core functionality for the audit-webui application: a web service that
//! fronts the admin backend's activity log with mapped domain models,
//! derived security events and statistics, exports, and a live feed.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
use services::{ActivityFeed, AuditService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Audit mapping and derivation service
    pub audit: Arc<AuditService>,
    /// Live activity feed
    pub feed: Arc<ActivityFeed>,
}
