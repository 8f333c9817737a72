use crate::auth::auth::AuthUser;
use crate::model::activity_log::{ActivityLog, ActivityType};
use actix_web::error::ErrorInternalServerError;
use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ActivityLogQuery {
    /// Filter by entry type
    #[serde(rename = "type")]
    pub log_type: Option<ActivityType>,
    /// Filter by action prefix, e.g. SCAN or LOGIN
    #[schema(example = "SCAN")]
    pub action: Option<String>,
    /// Search across user name, description and action
    #[schema(example = "jane")]
    pub search: Option<String>,
    #[schema(example = "2025-08-01", value_type = Option<String>, format = "date")]
    #[param(example = "2025-08-01", value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2025-08-31", value_type = Option<String>, format = "date")]
    #[param(example = "2025-08-31", value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
    /// One of createdAt, userName, action, type
    #[schema(example = "createdAt")]
    pub sort_by: Option<String>,
    /// asc or desc
    #[schema(example = "desc")]
    pub sort_dir: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 20)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct ActivityLogListResponse {
    pub data: Vec<ActivityLog>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 20)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    Str(&'a str),
    DateTime(NaiveDateTime),
}

/// Swagger doc for the audit trail endpoint
#[utoipa::path(
    get,
    path = "/api/activity-logs",
    params(ActivityLogQuery),
    responses(
        (status = 200, description = "Paginated audit trail, newest first by default", body = ActivityLogListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "ActivityLog"
)]
pub async fn list_activity_logs(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ActivityLogQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let type_s = query.log_type.map(|t| t.to_string());
    let action_like = query.action.as_deref().map(|a| format!("%{}%", a));
    let search_like = query.search.as_deref().map(|s| format!("%{}%", s));

    let mut where_clause = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(t) = type_s.as_deref() {
        where_clause.push_str(" AND `type` = ?");
        args.push(FilterValue::Str(t));
    }

    if let Some(like) = action_like.as_deref() {
        where_clause.push_str(" AND action LIKE ?");
        args.push(FilterValue::Str(like));
    }

    if let Some(like) = search_like.as_deref() {
        where_clause.push_str(" AND (user_name LIKE ? OR description LIKE ? OR action LIKE ?)");
        args.push(FilterValue::Str(like));
        args.push(FilterValue::Str(like));
        args.push(FilterValue::Str(like));
    }

    if let Some(start) = query.start_date {
        where_clause.push_str(" AND created_at >= ?");
        args.push(FilterValue::DateTime(start.and_hms_opt(0, 0, 0).unwrap()));
    }

    if let Some(end) = query.end_date {
        where_clause.push_str(" AND created_at <= ?");
        args.push(FilterValue::DateTime(end.and_hms_opt(23, 59, 59).unwrap()));
    }

    // Sort columns are whitelisted, never interpolated from raw input.
    let sort_column = match query.sort_by.as_deref() {
        Some("userName") => "user_name",
        Some("action") => "action",
        Some("type") => "`type`",
        _ => "created_at",
    };
    let sort_dir = match query.sort_dir.as_deref() {
        Some("asc") => "ASC",
        _ => "DESC",
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) FROM activity_logs{}", where_clause);
    debug!(sql = %count_sql, "Counting activity logs");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_query = match arg {
            FilterValue::Str(s) => count_query.bind(*s),
            FilterValue::DateTime(dt) => count_query.bind(*dt),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count activity logs");
        ErrorInternalServerError("Internal Server Error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT id, user_id, user_name, action, description, `type`, metadata, scan_photo, \
         created_at FROM activity_logs{} ORDER BY {} {} LIMIT ? OFFSET ?",
        where_clause, sort_column, sort_dir
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching activity logs");

    let mut data_query = sqlx::query_as::<_, ActivityLog>(&data_sql);
    for arg in args {
        data_query = match arg {
            FilterValue::Str(s) => data_query.bind(s),
            FilterValue::DateTime(dt) => data_query.bind(dt),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let logs = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch activity logs");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ActivityLogListResponse {
        data: logs,
        page,
        per_page,
        total,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_whitelist_rejects_unknown_columns() {
        let pick = |s: Option<&str>| match s {
            Some("userName") => "user_name",
            Some("action") => "action",
            Some("type") => "`type`",
            _ => "created_at",
        };

        assert_eq!(pick(Some("userName")), "user_name");
        assert_eq!(pick(Some("type")), "`type`");
        assert_eq!(pick(Some("created_at; DROP TABLE employees")), "created_at");
        assert_eq!(pick(None), "created_at");
    }
}
