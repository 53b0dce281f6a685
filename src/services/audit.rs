//! Audit service
//!
//! Maps raw backend records into domain models and derives the security
//! events view and the statistics report from fetched windows of activity.
//! Read-only: nothing here writes back to the audit log.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::error;
use uuid::Uuid;

use crate::models::{
    map_raw, ActivityLog, ActivityPage, ActivityQuery, ActivityType, AuditStatistics,
    EndpointCount, MethodCount, Pagination, RequestMethod, SecurityEvent, SecurityReport,
    SecuritySummary, SeverityRules, StatisticsOverview, StatusCount, SECURITY_EVENT_TYPES,
};
use crate::services::upstream::ActivitySource;
use crate::utils::AppError;

/// Most records fetched when deriving security events.
pub const SECURITY_FETCH_LIMIT: u32 = 100;
/// Hard backend cap shared by statistics and export.
pub const EXPORT_FETCH_LIMIT: u32 = 500;
/// Default lookback window in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Audit data mapping and derivation service.
pub struct AuditService {
    source: Arc<dyn ActivitySource>,
    rules: SeverityRules,
}

impl AuditService {
    pub fn new(source: Arc<dyn ActivitySource>) -> Self {
        Self {
            source,
            rules: SeverityRules::default(),
        }
    }

    /// Substitute the severity tables (used by tests).
    pub fn with_rules(source: Arc<dyn ActivitySource>, rules: SeverityRules) -> Self {
        Self { source, rules }
    }

    pub fn rules(&self) -> &SeverityRules {
        &self.rules
    }

    /// Fetch and map one page of activity records.
    pub async fn activity_page(&self, query: ActivityQuery) -> Result<ActivityPage, AppError> {
        let raw = self.source.fetch_activity(&query).await.map_err(|e| {
            error!("Failed to fetch activity page: {:#}", e);
            AppError::upstream("Failed to load activity feed")
        })?;

        let activities: Vec<ActivityLog> = raw.records.into_iter().map(map_raw).collect();
        let pagination = match raw.pagination {
            Some(p) => {
                let limit = p.limit.unwrap_or_else(|| activities.len().max(1) as u32);
                Pagination {
                    page: p.page,
                    limit,
                    total: p.total,
                    total_pages: p.total_pages.unwrap_or_else(|| {
                        if limit == 0 {
                            0
                        } else {
                            p.total.div_ceil(limit as u64) as u32
                        }
                    }),
                }
            }
            None => Pagination::from_len(activities.len(), &query),
        };

        Ok(ActivityPage {
            activities,
            pagination,
            filters: query,
            generated_at: Utc::now(),
        })
    }

    pub async fn activity_types(&self) -> Result<Vec<String>, AppError> {
        self.source.fetch_activity_types().await.map_err(|e| {
            error!("Failed to fetch activity types: {:#}", e);
            AppError::upstream("Failed to load activity types")
        })
    }

    pub async fn activity_detail(&self, id: Uuid) -> Result<Option<ActivityLog>, AppError> {
        let raw = self.source.fetch_activity_by_id(id).await.map_err(|e| {
            error!("Failed to fetch activity {}: {:#}", id, e);
            AppError::upstream("Failed to load activity details")
        })?;
        Ok(raw.map(map_raw))
    }

    /// Derive the security events view for the given lookback window.
    ///
    /// Fetches up to [`SECURITY_FETCH_LIMIT`] recent records, keeps only the
    /// security-relevant kinds, classifies each, and summarizes the filtered
    /// set. Backend order (most-recent-first) is preserved.
    pub async fn security_events(&self, days: Option<u32>) -> Result<SecurityReport, AppError> {
        let window_days = days.unwrap_or(DEFAULT_WINDOW_DAYS);
        let query = ActivityQuery::new()
            .days(window_days)
            .limit(SECURITY_FETCH_LIMIT);

        let raw = self.source.fetch_activity(&query).await.map_err(|e| {
            error!("Failed to fetch security events: {:#}", e);
            AppError::upstream("Failed to load security events")
        })?;

        let events: Vec<SecurityEvent> = raw
            .records
            .into_iter()
            .map(map_raw)
            .filter(|a| SECURITY_EVENT_TYPES.contains(&a.activity_type))
            .map(|a| SecurityEvent::from_activity(a, &self.rules))
            .collect();

        let summary = SecuritySummary::from_events(&events);

        Ok(SecurityReport {
            events,
            summary,
            window_days,
            generated_at: Utc::now(),
        })
    }

    /// Derive the statistics report for the given lookback window.
    pub async fn statistics(&self, days: Option<u32>) -> Result<AuditStatistics, AppError> {
        let window_days = days.unwrap_or(DEFAULT_WINDOW_DAYS);
        let query = ActivityQuery::new()
            .days(window_days)
            .limit(EXPORT_FETCH_LIMIT);

        let raw = self.source.fetch_activity(&query).await.map_err(|e| {
            error!("Failed to fetch audit statistics window: {:#}", e);
            AppError::upstream("Failed to load audit statistics")
        })?;

        let activities: Vec<ActivityLog> = raw.records.into_iter().map(map_raw).collect();
        Ok(compute_statistics(&activities, window_days))
    }

    /// Fetch up to [`EXPORT_FETCH_LIMIT`] records matching the filters for
    /// export.
    pub async fn export_window(&self, query: ActivityQuery) -> Result<Vec<ActivityLog>, AppError> {
        let query = query.limit(EXPORT_FETCH_LIMIT);
        let raw = self.source.fetch_activity(&query).await.map_err(|e| {
            error!("Failed to fetch export window: {:#}", e);
            AppError::upstream("Failed to export activity logs")
        })?;
        Ok(raw.records.into_iter().map(map_raw).collect())
    }
}

/// A record counts as a success when details carry no `error_code` and
/// `success` is not explicitly false.
fn is_success(activity: &ActivityLog) -> bool {
    let details = &activity.details;
    if details.get("error_code").map(|v| !v.is_null()) == Some(true) {
        return false;
    }
    details.get("success") != Some(&serde_json::Value::Bool(false))
}

/// Compute the statistics report from a window of mapped records.
///
/// Pure function over its input; the method and status breakdowns are the
/// documented heuristics, not measured HTTP data.
pub fn compute_statistics(activities: &[ActivityLog], window_days: u32) -> AuditStatistics {
    let total = activities.len() as u64;
    let success_count = activities.iter().filter(|a| is_success(a)).count() as u64;
    let failure_count = total - success_count;
    let success_rate = if total == 0 {
        100.0
    } else {
        (success_count as f64 / total as f64) * 100.0
    };

    let durations: Vec<f64> = activities
        .iter()
        .filter_map(|a| a.details.get("duration_ms").and_then(|v| v.as_f64()))
        .collect();
    let avg_duration_ms = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    };

    let mut method_counts: HashMap<RequestMethod, u64> = HashMap::new();
    for activity in activities {
        *method_counts
            .entry(RequestMethod::for_activity(&activity.activity_type))
            .or_insert(0) += 1;
    }
    let by_method = RequestMethod::ALL
        .iter()
        .map(|method| {
            let count = method_counts.get(method).copied().unwrap_or(0);
            MethodCount {
                method: *method,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();

    let mut endpoint_counts: HashMap<&str, u64> = HashMap::new();
    for activity in activities {
        *endpoint_counts
            .entry(activity.activity_type.as_str())
            .or_insert(0) += 1;
    }
    let mut top_endpoints: Vec<EndpointCount> = endpoint_counts
        .into_iter()
        .map(|(endpoint, count)| EndpointCount {
            endpoint: endpoint.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();
    top_endpoints.sort_by(|a, b| b.count.cmp(&a.count).then(a.endpoint.cmp(&b.endpoint)));
    top_endpoints.truncate(5);

    AuditStatistics {
        overview: StatisticsOverview {
            total_requests: total,
            success_count,
            failure_count,
            success_rate,
            avg_duration_ms,
        },
        by_method,
        top_endpoints,
        status_distribution: status_distribution(success_count, failure_count),
        window_days,
        generated_at: Utc::now(),
    }
}

/// Synthetic status-code histogram: successes report 200, failures are
/// split 30/40/30 across 400/401/500. An approximation carried over from
/// the dashboard; the backend exposes no real status codes.
fn status_distribution(success_count: u64, failure_count: u64) -> Vec<StatusCount> {
    let c400 = failure_count * 30 / 100;
    let c401 = failure_count * 40 / 100;
    let c500 = failure_count - c400 - c401;
    vec![
        StatusCount {
            status: 200,
            count: success_count,
        },
        StatusCount {
            status: 400,
            count: c400,
        },
        StatusCount {
            status: 401,
            count: c401,
        },
        StatusCount {
            status: 500,
            count: c500,
        },
    ]
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}
