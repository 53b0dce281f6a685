//! Activity log export
//!
//! Serializes a window of mapped activity records to CSV or pretty JSON for
//! client download. Bounded upstream by the shared 500-record fetch cap.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;

use crate::models::ActivityLog;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unsupported export format: {}", other)),
        }
    }
}

/// A generated export ready to be served as a download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

const CSV_HEADER: &str =
    "\"ID\",\"Activity Type\",\"User\",\"Project\",\"Target User\",\"IP Address\",\"Created At\",\"Details\"";

/// Serialize activities into the requested format.
pub fn export_activities(
    activities: &[ActivityLog],
    format: ExportFormat,
) -> Result<ExportArtifact> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(activities).into_bytes(),
        ExportFormat::Json => {
            serde_json::to_vec_pretty(activities).context("Failed to serialize activities")?
        }
    };
    Ok(ExportArtifact {
        bytes,
        content_type: format.content_type(),
        filename: format!(
            "activity-log-{}.{}",
            Utc::now().format("%Y%m%d-%H%M%S"),
            format.extension()
        ),
    })
}

fn to_csv(activities: &[ActivityLog]) -> String {
    let mut csv = String::new();
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for activity in activities {
        let details = serde_json::to_string(&activity.details).unwrap_or_default();
        let fields = [
            activity.id.to_string(),
            activity.activity_type.as_str().to_string(),
            activity
                .user
                .as_ref()
                .map(|u| u.username.clone())
                .unwrap_or_default(),
            activity
                .project
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            activity
                .target_user
                .as_ref()
                .map(|u| u.username.clone())
                .unwrap_or_default(),
            activity.ip_address.clone().unwrap_or_default(),
            activity
                .created_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            details,
        ];
        let row: Vec<String> = fields.iter().map(|f| quote_csv(f)).collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// RFC4180 quoting: every field is wrapped in double quotes with internal
/// quotes doubled.
fn quote_csv(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
