//! Derived audit statistics
//!
//! The admin backend exposes no metrics endpoint, so the statistics tab is
//! computed from a window of raw activity records. Method and status-code
//! breakdowns are heuristic approximations over activity-type names, not
//! measured HTTP data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::ActivityType;

/// Pseudo HTTP method a kind of activity is bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    pub const ALL: &'static [RequestMethod] = &[
        RequestMethod::Get,
        RequestMethod::Post,
        RequestMethod::Put,
        RequestMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }

    /// Bucket an activity kind by substring heuristics on its wire name.
    /// Destructive kinds are checked first so "bulk_user_delete" never lands
    /// in the creation bucket via "user".
    pub fn for_activity(activity_type: &ActivityType) -> Self {
        let name = activity_type.as_str();
        if name.contains("delete") || name.contains("revoke") || name.contains("remov") {
            RequestMethod::Delete
        } else if name.contains("creation")
            || name.contains("grant")
            || name.contains("add")
            || name.contains("assignment")
        {
            RequestMethod::Post
        } else if name.contains("update") || name.contains("change") {
            RequestMethod::Put
        } else {
            RequestMethod::Get
        }
    }
}

/// High-level request counters for the statistics window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsOverview {
    pub total_requests: u64,
    pub success_count: u64,
    pub failure_count: u64,
    /// Percentage in `[0, 100]`; 100 when the window is empty.
    pub success_rate: f64,
    pub avg_duration_ms: f64,
}

/// One row of the per-method breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCount {
    pub method: RequestMethod,
    pub count: u64,
    pub percentage: f64,
}

/// One row of the top-endpoints table, keyed by raw activity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointCount {
    pub endpoint: String,
    pub count: u64,
    pub percentage: f64,
}

/// One bucket of the synthetic status-code histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: u16,
    pub count: u64,
}

/// Derived statistics report for the audit dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStatistics {
    pub overview: StatisticsOverview,
    pub by_method: Vec<MethodCount>,
    pub top_endpoints: Vec<EndpointCount>,
    pub status_distribution: Vec<StatusCount>,
    pub window_days: u32,
    pub generated_at: DateTime<Utc>,
}
