//! Security event models
//!
//! Security events are activity records from a fixed allow-list of
//! security-relevant kinds, enriched with a derived severity and with
//! request metadata pulled out of the opaque `details` payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::{ActivityLog, ActivityType};

/// Derived severity of a security event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// Activity kinds surfaced on the security events tab.
pub const SECURITY_EVENT_TYPES: &[ActivityType] = &[
    ActivityType::UserLogin,
    ActivityType::UserLogout,
    ActivityType::PasswordChange,
    ActivityType::PasswordResetRequest,
    ActivityType::AccountLock,
    ActivityType::AccountUnlock,
    ActivityType::PermissionGrant,
    ActivityType::PermissionRevoke,
    ActivityType::RoleAssignment,
    ActivityType::RoleRemoval,
    ActivityType::ApiKeyRevoke,
    ActivityType::BulkUserDelete,
];

/// Severity membership tables.
///
/// Kept as plain data injected into classification so tests can substitute
/// their own tables. Resolution is first-match: critical before warning,
/// then the failed-login rule, then info.
#[derive(Debug, Clone)]
pub struct SeverityRules {
    critical: Vec<ActivityType>,
    warning: Vec<ActivityType>,
}

impl Default for SeverityRules {
    fn default() -> Self {
        Self {
            critical: vec![
                ActivityType::UserDelete,
                ActivityType::BulkUserDelete,
                ActivityType::RoleDelete,
                ActivityType::GroupDelete,
                ActivityType::ProjectDelete,
                ActivityType::AccountLock,
            ],
            warning: vec![
                ActivityType::PermissionRevoke,
                ActivityType::RoleRemoval,
                ActivityType::ApiKeyRevoke,
                ActivityType::AccountUnlock,
                ActivityType::PasswordResetRequest,
            ],
        }
    }
}

impl SeverityRules {
    pub fn new(critical: Vec<ActivityType>, warning: Vec<ActivityType>) -> Self {
        Self { critical, warning }
    }

    /// Classify an activity. Total over every `(activity_type, details)`
    /// combination.
    pub fn classify(&self, activity_type: &ActivityType, details: &serde_json::Value) -> Severity {
        if self.critical.contains(activity_type) {
            return Severity::Critical;
        }
        if self.warning.contains(activity_type) {
            return Severity::Warning;
        }
        // Failed logins are warnings even though user_login is info by itself.
        if matches!(
            activity_type,
            ActivityType::UserLogin | ActivityType::UserLogout
        ) && details.get("success") == Some(&serde_json::Value::Bool(false))
        {
            return Severity::Warning;
        }
        Severity::Info
    }
}

/// An activity record promoted to a security event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    #[serde(flatten)]
    pub activity: ActivityLog,
    pub severity: Severity,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub response_status: Option<u16>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl SecurityEvent {
    /// Derive a security event from a mapped activity record.
    pub fn from_activity(activity: ActivityLog, rules: &SeverityRules) -> Self {
        let severity = rules.classify(&activity.activity_type, &activity.details);
        let details = &activity.details;
        let client_ip = activity
            .ip_address
            .clone()
            .or_else(|| details_str(details, "client_ip"));
        let user_agent = details_str(details, "user_agent");
        let response_status = details
            .get("response_status")
            .and_then(|v| v.as_u64())
            .and_then(|v| u16::try_from(v).ok());
        let error_code = details_str(details, "error_code");
        let error_message = details_str(details, "error_message");
        Self {
            activity,
            severity,
            client_ip,
            user_agent,
            response_status,
            error_code,
            error_message,
        }
    }

    fn is_failed_login(&self) -> bool {
        self.activity.activity_type == ActivityType::UserLogin
            && self.activity.details.get("success") == Some(&serde_json::Value::Bool(false))
    }
}

fn details_str(details: &serde_json::Value, key: &str) -> Option<String> {
    details
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Aggregate counts over the fetched page of security events.
///
/// Scans whatever page is in memory: this is a window summary, not a
/// historical aggregate. Unauthorized attempts are inferred from
/// `response_status`, which the backend rarely populates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecuritySummary {
    pub total_events: u64,
    pub failed_logins: u64,
    pub unauthorized_attempts: u64,
    pub critical_events: u64,
    pub last_event_at: Option<DateTime<Utc>>,
}

impl SecuritySummary {
    pub fn from_events(events: &[SecurityEvent]) -> Self {
        Self {
            total_events: events.len() as u64,
            failed_logins: events.iter().filter(|e| e.is_failed_login()).count() as u64,
            unauthorized_attempts: events
                .iter()
                .filter(|e| matches!(e.response_status, Some(401) | Some(403)))
                .count() as u64,
            critical_events: events
                .iter()
                .filter(|e| e.severity == Severity::Critical)
                .count() as u64,
            last_event_at: events.iter().map(|e| e.activity.created_at).max(),
        }
    }
}

/// Payload of the security events endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityReport {
    pub events: Vec<SecurityEvent>,
    pub summary: SecuritySummary,
    pub window_days: u32,
    pub generated_at: DateTime<Utc>,
}
