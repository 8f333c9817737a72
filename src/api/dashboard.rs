use crate::auth::auth::AuthUser;
use crate::engine::decision::round_hours;
use crate::model::attendance::AttendanceRecord;
use crate::model::role::Role;
use actix_web::error::ErrorInternalServerError;
use actix_web::{web, HttpResponse, Responder};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct MonthlySummary {
    #[schema(example = 18)]
    pub total_days: i64,
    #[schema(example = 15)]
    pub present_days: i64,
    #[schema(example = 2)]
    pub late_days: i64,
    #[schema(example = 1)]
    pub half_days: i64,
    #[schema(example = 0)]
    pub absent_days: i64,
    #[schema(example = 142.5)]
    pub total_work_hours: f64,
}

#[derive(Serialize, ToSchema)]
pub struct AdminStats {
    #[schema(example = 52)]
    pub total_employees: i64,
    #[schema(example = 47)]
    pub today_present: i64,
    #[schema(example = 4)]
    pub today_late: i64,
    #[schema(example = 5)]
    pub today_absent: i64,
}

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(value_type = String, format = "date", example = "2025-08-25")]
    pub date: NaiveDate,
    pub today: Option<AttendanceRecord>,
    pub month: MonthlySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminStats>,
}

/// Swagger doc for the dashboard endpoint
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Personal summary, plus organisation stats for admins", body = DashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
pub async fn dashboard(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let today = Local::now().date_naive();
    let month_start = today.with_day(1).unwrap();

    // Today's record on the caller's own shift. The join pins the shift so a
    // stray record on the other shift does not surface here.
    let today_record = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT a.id, a.employee_id, a.date, a.shift_type,
               a.am_in, a.am_out, a.pm_in, a.pm_out, a.night_in, a.night_out,
               a.status, a.work_hours, a.notes
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id AND a.shift_type = e.shift_type
        WHERE a.employee_id = ? AND a.date = ?
        "#,
    )
    .bind(auth.user_id)
    .bind(today)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch today's attendance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let mut month = sqlx::query_as::<_, MonthlySummary>(
        r#"
        SELECT COUNT(*) AS total_days,
               COUNT(CASE WHEN status = 'PRESENT' THEN 1 END) AS present_days,
               COUNT(CASE WHEN status = 'LATE' THEN 1 END) AS late_days,
               COUNT(CASE WHEN status = 'HALF_DAY' THEN 1 END) AS half_days,
               COUNT(CASE WHEN status = 'ABSENT' THEN 1 END) AS absent_days,
               COALESCE(SUM(work_hours), 0) AS total_work_hours
        FROM attendance
        WHERE employee_id = ? AND date BETWEEN ? AND ?
        "#,
    )
    .bind(auth.user_id)
    .bind(month_start)
    .bind(today)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch monthly summary");
        ErrorInternalServerError("Internal Server Error")
    })?;
    month.total_work_hours = round_hours(month.total_work_hours);

    let admin = if auth.role == Role::Admin {
        Some(admin_stats(pool.get_ref(), today).await.map_err(|e| {
            error!(error = %e, "Failed to fetch admin stats");
            ErrorInternalServerError("Internal Server Error")
        })?)
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(DashboardResponse {
        date: today,
        today: today_record,
        month,
        admin,
    }))
}

async fn admin_stats(pool: &MySqlPool, today: NaiveDate) -> Result<AdminStats, sqlx::Error> {
    let total_employees = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM employees WHERE role_id = ?",
    )
    .bind(Role::Employee.id())
    .fetch_one(pool)
    .await?;

    let today_present = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE e.role_id = ? AND a.date = ? AND a.status IN ('PRESENT', 'LATE')
        "#,
    )
    .bind(Role::Employee.id())
    .bind(today)
    .fetch_one(pool)
    .await?;

    let today_late = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE e.role_id = ? AND a.date = ? AND a.status = 'LATE'
        "#,
    )
    .bind(Role::Employee.id())
    .bind(today)
    .fetch_one(pool)
    .await?;

    Ok(AdminStats {
        total_employees,
        today_present,
        today_late,
        today_absent: (total_employees - today_present).max(0),
    })
}
