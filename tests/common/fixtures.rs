//! Test fixtures for admin backend payloads
//!
//! Raw activity records as the admin backend emits them, plus the three
//! list response envelopes the backend has shipped over time.

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

/// A raw activity record with the given type, created now.
pub fn raw_record(activity_type: &str) -> Value {
    raw_record_at(activity_type, 0)
}

/// A raw activity record created `minutes_ago` minutes in the past.
pub fn raw_record_at(activity_type: &str, minutes_ago: i64) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "activity_type": activity_type,
        "details": {},
        "created_at": (Utc::now() - Duration::minutes(minutes_ago)).to_rfc3339(),
        "user": {
            "id": Uuid::new_v4(),
            "username": "alice",
            "email": "alice@example.com"
        },
        "project": {
            "id": Uuid::new_v4(),
            "name": "payments"
        },
        "ip_address": "10.0.0.5"
    })
}

/// A raw record with custom details (used for success/failure heuristics).
pub fn raw_record_with_details(activity_type: &str, details: Value) -> Value {
    let mut record = raw_record(activity_type);
    record["details"] = details;
    record
}

/// Bare-array list envelope.
pub fn bare_array_envelope(records: Vec<Value>) -> Value {
    Value::Array(records)
}

/// `{activities, pagination}` list envelope.
pub fn keyed_envelope(records: Vec<Value>, page: u32, limit: u32, total: u64) -> Value {
    let total_pages = if limit == 0 {
        0
    } else {
        total.div_ceil(limit as u64)
    };
    json!({
        "activities": records,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "total_pages": total_pages
        }
    })
}

/// `{data: {activities, pagination}}` list envelope.
pub fn data_envelope(records: Vec<Value>, page: u32, limit: u32, total: u64) -> Value {
    json!({ "data": keyed_envelope(records, page, limit, total) })
}

/// The default set of activity type strings the backend reports.
pub fn activity_types_payload() -> Value {
    json!({
        "types": [
            "user_login",
            "user_logout",
            "user_creation",
            "user_delete",
            "project_creation",
            "permission_revoke",
            "bulk_user_delete"
        ]
    })
}
