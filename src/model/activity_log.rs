use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

/* ===== Audit action names ===== */

pub mod actions {
    pub const SCAN_AM_IN: &str = "SCAN_AM_IN";
    pub const SCAN_AM_OUT: &str = "SCAN_AM_OUT";
    pub const SCAN_PM_IN: &str = "SCAN_PM_IN";
    pub const SCAN_PM_OUT: &str = "SCAN_PM_OUT";
    pub const SCAN_NIGHT_IN: &str = "SCAN_NIGHT_IN";
    pub const SCAN_NIGHT_OUT: &str = "SCAN_NIGHT_OUT";
    pub const LOGIN: &str = "LOGIN";
    pub const LOGOUT: &str = "LOGOUT";
    pub const EMPLOYEE_CREATE: &str = "EMPLOYEE_CREATE";
}

/* ===== Rows and payloads ===== */

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Info,
    Warning,
    Error,
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ActivityLog {
    #[schema(example = 1)]
    pub id: u64,

    /// Null for events not tied to an account, e.g. failed logins.
    #[schema(example = 42, nullable = true)]
    pub user_id: Option<u64>,

    #[schema(example = "Jane Doe")]
    pub user_name: String,

    #[schema(example = "SCAN_AM_IN")]
    pub action: String,

    #[schema(example = "Jane Doe clocked in (AM)")]
    pub description: String,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub log_type: ActivityType,

    /// JSON blob serialized as text, shape varies per action.
    #[schema(nullable = true)]
    pub metadata: Option<String>,

    /// Base64 snapshot captured by the scan kiosk, when one was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(nullable = true)]
    pub scan_photo: Option<String>,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

/// Event to append to the audit trail. Built by handlers, written by the
/// store in a spawned task so slow audit writes never hold up a response.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<u64>,
    pub user_name: String,
    pub action: String,
    pub description: String,
    pub log_type: ActivityType,
    pub metadata: Option<serde_json::Value>,
    pub scan_photo: Option<String>,
}
