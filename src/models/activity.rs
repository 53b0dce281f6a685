//! Activity log models
//!
//! Domain models for the admin activity feed: the closed set of activity
//! kinds, the raw wire record returned by the admin backend, and the mapped
//! domain record served to the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// The closed set of activity kinds emitted by the admin backend.
///
/// Values arrive as snake_case strings. Anything outside the known set maps
/// to [`ActivityType::Unknown`] carrying the raw value, so unrecognized
/// kinds keep their label instead of disappearing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActivityType {
    UserLogin,
    UserLogout,
    UserCreation,
    UserUpdate,
    UserDelete,
    BulkUserDelete,
    PasswordChange,
    PasswordResetRequest,
    PasswordResetComplete,
    TokenRefresh,
    AccountLock,
    AccountUnlock,
    PermissionGrant,
    PermissionRevoke,
    RoleCreation,
    RoleUpdate,
    RoleDelete,
    RoleAssignment,
    RoleRemoval,
    GroupCreation,
    GroupUpdate,
    GroupDelete,
    GroupMemberAdd,
    GroupMemberRemove,
    ProjectCreation,
    ProjectUpdate,
    ProjectDelete,
    ApiKeyCreation,
    ApiKeyRevoke,
    SettingsUpdate,
    DataExport,
    /// Fallback for values the backend added after this build.
    Unknown(String),
}

/// Coarse grouping used for icons and filter menus in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Authentication,
    Accounts,
    Permissions,
    Roles,
    Groups,
    Projects,
    ApiKeys,
    Settings,
    Data,
    Other,
}

impl ActivityType {
    /// All known kinds, in wire order.
    pub const KNOWN: &'static [ActivityType] = &[
        ActivityType::UserLogin,
        ActivityType::UserLogout,
        ActivityType::UserCreation,
        ActivityType::UserUpdate,
        ActivityType::UserDelete,
        ActivityType::BulkUserDelete,
        ActivityType::PasswordChange,
        ActivityType::PasswordResetRequest,
        ActivityType::PasswordResetComplete,
        ActivityType::TokenRefresh,
        ActivityType::AccountLock,
        ActivityType::AccountUnlock,
        ActivityType::PermissionGrant,
        ActivityType::PermissionRevoke,
        ActivityType::RoleCreation,
        ActivityType::RoleUpdate,
        ActivityType::RoleDelete,
        ActivityType::RoleAssignment,
        ActivityType::RoleRemoval,
        ActivityType::GroupCreation,
        ActivityType::GroupUpdate,
        ActivityType::GroupDelete,
        ActivityType::GroupMemberAdd,
        ActivityType::GroupMemberRemove,
        ActivityType::ProjectCreation,
        ActivityType::ProjectUpdate,
        ActivityType::ProjectDelete,
        ActivityType::ApiKeyCreation,
        ActivityType::ApiKeyRevoke,
        ActivityType::SettingsUpdate,
        ActivityType::DataExport,
    ];

    /// The snake_case wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::UserLogin => "user_login",
            ActivityType::UserLogout => "user_logout",
            ActivityType::UserCreation => "user_creation",
            ActivityType::UserUpdate => "user_update",
            ActivityType::UserDelete => "user_delete",
            ActivityType::BulkUserDelete => "bulk_user_delete",
            ActivityType::PasswordChange => "password_change",
            ActivityType::PasswordResetRequest => "password_reset_request",
            ActivityType::PasswordResetComplete => "password_reset_complete",
            ActivityType::TokenRefresh => "token_refresh",
            ActivityType::AccountLock => "account_lock",
            ActivityType::AccountUnlock => "account_unlock",
            ActivityType::PermissionGrant => "permission_grant",
            ActivityType::PermissionRevoke => "permission_revoke",
            ActivityType::RoleCreation => "role_creation",
            ActivityType::RoleUpdate => "role_update",
            ActivityType::RoleDelete => "role_delete",
            ActivityType::RoleAssignment => "role_assignment",
            ActivityType::RoleRemoval => "role_removal",
            ActivityType::GroupCreation => "group_creation",
            ActivityType::GroupUpdate => "group_update",
            ActivityType::GroupDelete => "group_delete",
            ActivityType::GroupMemberAdd => "group_member_add",
            ActivityType::GroupMemberRemove => "group_member_remove",
            ActivityType::ProjectCreation => "project_creation",
            ActivityType::ProjectUpdate => "project_update",
            ActivityType::ProjectDelete => "project_delete",
            ActivityType::ApiKeyCreation => "api_key_creation",
            ActivityType::ApiKeyRevoke => "api_key_revoke",
            ActivityType::SettingsUpdate => "settings_update",
            ActivityType::DataExport => "data_export",
            ActivityType::Unknown(raw) => raw,
        }
    }

    /// Parse a wire value, falling back to `Unknown` for unrecognized input.
    pub fn from_raw(raw: &str) -> Self {
        ActivityType::KNOWN
            .iter()
            .find(|t| t.as_str() == raw)
            .cloned()
            .unwrap_or_else(|| ActivityType::Unknown(raw.to_string()))
    }

    /// Human-readable label for tables and detail panels.
    pub fn label(&self) -> String {
        match self {
            ActivityType::UserLogin => "User login".to_string(),
            ActivityType::UserLogout => "User logout".to_string(),
            ActivityType::UserCreation => "User created".to_string(),
            ActivityType::UserUpdate => "User updated".to_string(),
            ActivityType::UserDelete => "User deleted".to_string(),
            ActivityType::BulkUserDelete => "Bulk user deletion".to_string(),
            ActivityType::PasswordChange => "Password changed".to_string(),
            ActivityType::PasswordResetRequest => "Password reset requested".to_string(),
            ActivityType::PasswordResetComplete => "Password reset completed".to_string(),
            ActivityType::TokenRefresh => "Token refreshed".to_string(),
            ActivityType::AccountLock => "Account locked".to_string(),
            ActivityType::AccountUnlock => "Account unlocked".to_string(),
            ActivityType::PermissionGrant => "Permission granted".to_string(),
            ActivityType::PermissionRevoke => "Permission revoked".to_string(),
            ActivityType::RoleCreation => "Role created".to_string(),
            ActivityType::RoleUpdate => "Role updated".to_string(),
            ActivityType::RoleDelete => "Role deleted".to_string(),
            ActivityType::RoleAssignment => "Role assigned".to_string(),
            ActivityType::RoleRemoval => "Role removed".to_string(),
            ActivityType::GroupCreation => "Group created".to_string(),
            ActivityType::GroupUpdate => "Group updated".to_string(),
            ActivityType::GroupDelete => "Group deleted".to_string(),
            ActivityType::GroupMemberAdd => "Group member added".to_string(),
            ActivityType::GroupMemberRemove => "Group member removed".to_string(),
            ActivityType::ProjectCreation => "Project created".to_string(),
            ActivityType::ProjectUpdate => "Project updated".to_string(),
            ActivityType::ProjectDelete => "Project deleted".to_string(),
            ActivityType::ApiKeyCreation => "API key created".to_string(),
            ActivityType::ApiKeyRevoke => "API key revoked".to_string(),
            ActivityType::SettingsUpdate => "Settings updated".to_string(),
            ActivityType::DataExport => "Data exported".to_string(),
            ActivityType::Unknown(raw) => format!("Unknown activity ({})", raw),
        }
    }

    pub fn category(&self) -> ActivityCategory {
        match self {
            ActivityType::UserLogin
            | ActivityType::UserLogout
            | ActivityType::TokenRefresh
            | ActivityType::PasswordChange
            | ActivityType::PasswordResetRequest
            | ActivityType::PasswordResetComplete => ActivityCategory::Authentication,
            ActivityType::UserCreation
            | ActivityType::UserUpdate
            | ActivityType::UserDelete
            | ActivityType::BulkUserDelete
            | ActivityType::AccountLock
            | ActivityType::AccountUnlock => ActivityCategory::Accounts,
            ActivityType::PermissionGrant | ActivityType::PermissionRevoke => {
                ActivityCategory::Permissions
            }
            ActivityType::RoleCreation
            | ActivityType::RoleUpdate
            | ActivityType::RoleDelete
            | ActivityType::RoleAssignment
            | ActivityType::RoleRemoval => ActivityCategory::Roles,
            ActivityType::GroupCreation
            | ActivityType::GroupUpdate
            | ActivityType::GroupDelete
            | ActivityType::GroupMemberAdd
            | ActivityType::GroupMemberRemove => ActivityCategory::Groups,
            ActivityType::ProjectCreation
            | ActivityType::ProjectUpdate
            | ActivityType::ProjectDelete => ActivityCategory::Projects,
            ActivityType::ApiKeyCreation | ActivityType::ApiKeyRevoke => ActivityCategory::ApiKeys,
            ActivityType::SettingsUpdate => ActivityCategory::Settings,
            ActivityType::DataExport => ActivityCategory::Data,
            ActivityType::Unknown(_) => ActivityCategory::Other,
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActivityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ActivityType::from_raw(&raw))
    }
}

/// Actor or target user attached to an activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Project an activity record belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
}

/// Raw activity record as returned by `GET /admin/activity`.
///
/// All associations are optional on the wire; `details` defaults to an empty
/// object when the backend omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawActivityRecord {
    pub id: Uuid,
    pub activity_type: String,
    #[serde(default = "empty_details")]
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub project: Option<ProjectSummary>,
    #[serde(default)]
    pub target_user: Option<UserSummary>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

fn empty_details() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Mapped domain record served to the dashboard. Immutable once mapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub activity_type: ActivityType,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub user: Option<UserSummary>,
    pub project: Option<ProjectSummary>,
    pub target_user: Option<UserSummary>,
    pub ip_address: Option<String>,
}

/// Map a raw backend record into the domain model.
///
/// Total and side-effect free: absent associations become `None`, an
/// unrecognized activity type becomes [`ActivityType::Unknown`].
pub fn map_raw(raw: RawActivityRecord) -> ActivityLog {
    ActivityLog {
        id: raw.id,
        activity_type: ActivityType::from_raw(&raw.activity_type),
        details: raw.details,
        created_at: raw.created_at,
        user: raw.user,
        project: raw.project,
        target_user: raw.target_user,
        ip_address: raw.ip_address,
    }
}

/// Filter set for activity listings.
///
/// Callers replace the whole object rather than merging fields, matching the
/// dashboard's filter bar semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ActivityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activity_type(mut self, activity_type: &ActivityType) -> Self {
        self.activity_type = Some(activity_type.as_str().to_string());
        self
    }

    pub fn days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    /// Build the upstream query string. The backend expects the filter under
    /// `activity_type_filter`; free-text search is percent-encoded.
    pub fn to_query_string(&self) -> String {
        let mut params = vec![];
        if let Some(ref activity_type) = self.activity_type {
            params.push(format!(
                "activity_type_filter={}",
                urlencoding::encode(activity_type)
            ));
        }
        if let Some(user_id) = self.user_id {
            params.push(format!("user_id={}", user_id));
        }
        if let Some(project_id) = self.project_id {
            params.push(format!("project_id={}", project_id));
        }
        if let Some(days) = self.days {
            params.push(format!("days={}", days));
        }
        if let Some(ref search) = self.search {
            params.push(format!("search={}", urlencoding::encode(search)));
        }
        if let Some(page) = self.page {
            params.push(format!("page={}", page));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Pagination metadata for an activity page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Synthesize pagination when the backend omits it (bare-array payloads).
    pub fn from_len(len: usize, query: &ActivityQuery) -> Self {
        let limit = query.limit.unwrap_or_else(|| len.max(1) as u32);
        let total = len as u64;
        Self {
            page: query.page.unwrap_or(1),
            limit,
            total,
            total_pages: if limit == 0 {
                0
            } else {
                total.div_ceil(limit as u64) as u32
            },
        }
    }
}

/// A fetched page of mapped activity records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPage {
    pub activities: Vec<ActivityLog>,
    pub pagination: Pagination,
    pub filters: ActivityQuery,
    pub generated_at: DateTime<Utc>,
}
