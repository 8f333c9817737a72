use crate::config::Config;
use crate::engine::decision::next_expected_action;
use crate::engine::scan::{self, ScanOutcome, ScanRequest};
use crate::model::employee::EmployeeBrief;
use crate::model::shift::{AttendanceStatus, ShiftType};
use crate::store;
use actix_web::{web, HttpResponse, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "success": true,
    "attendance_id": 117,
    "action": "AM In",
    "time": "8:00:05 AM",
    "status": "PRESENT",
    "message": "Good morning, Jane Doe! AM In recorded at 8:00:05 AM.",
    "next_action": "am-out",
    "user": {
        "id": 42,
        "name": "Jane Doe",
        "department": "Engineering",
        "position": "Backend Developer",
        "shift_type": "DAY",
        "profile_image": null
    }
}))]
pub struct ScanResponse {
    pub success: bool,
    #[schema(example = 117)]
    pub attendance_id: u64,
    /// Slot the scan landed in, e.g. "AM In".
    #[schema(example = "AM In")]
    pub action: &'static str,
    #[schema(example = "8:00:05 AM")]
    pub time: String,
    pub status: AttendanceStatus,
    pub message: String,
    /// Slug the kiosk should offer next.
    #[schema(example = "am-out")]
    pub next_action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(nullable = true)]
    pub work_hours: Option<f64>,
    pub user: EmployeeBrief,
}

/* =========================
Badge scan
========================= */
/// Swagger doc for the scan endpoint
#[utoipa::path(
    post,
    path = "/scan",
    request_body(
        content = ScanRequest,
        description = "Badge scan payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Scan processed; success=false carries a cooldown or completed-shift rejection", body = ScanResponse),
        (status = 400, description = "Missing identifier", body = Object, example = json!({
            "message": "identifier is required"
        })),
        (status = 404, description = "Unknown identity", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Kiosk"
)]
pub async fn scan(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<ScanRequest>,
) -> actix_web::Result<impl Responder> {
    if payload.identifier.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "identifier is required"
        })));
    }

    let outcome = scan::process_scan(
        pool.get_ref(),
        config.store_timeout_ms,
        config.audit_timeout_ms,
        &payload,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, identifier = %payload.identifier, "Scan processing failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(match outcome {
        ScanOutcome::Recorded(recorded) => {
            let user = EmployeeBrief::from(recorded.employee.as_ref());
            HttpResponse::Ok().json(ScanResponse {
                success: true,
                attendance_id: recorded.attendance_id,
                action: recorded.slot.label(),
                time: scan::format_time(recorded.recorded_at),
                status: recorded.status,
                message: recorded.message,
                next_action: recorded.slot.next_slug(),
                work_hours: recorded.work_hours,
                user,
            })
        }

        ScanOutcome::Cooldown { wait_seconds } => HttpResponse::Ok().json(serde_json::json!({
            "success": false,
            "cooldown": true,
            "wait_seconds": wait_seconds,
            "message": scan::cooldown_message(wait_seconds),
        })),

        ScanOutcome::AlreadyComplete {
            employee,
            shift_type,
        } => HttpResponse::Ok().json(serde_json::json!({
            "success": false,
            "next_action": "complete",
            "message": scan::completed_message(&employee.name, shift_type),
            "user": EmployeeBrief::from(employee.as_ref()),
        })),

        ScanOutcome::AlreadyRecorded { employee, slot } => {
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "message": scan::already_recorded_message(&employee.name, slot),
                "user": EmployeeBrief::from(employee.as_ref()),
            }))
        }

        ScanOutcome::UnknownEmployee => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })),
    })
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ScanStatusQuery {
    /// Email or numeric employee id read off the badge
    #[schema(example = "jane.doe@example.com")]
    pub identifier: String,
    /// Defaults to the day shift
    pub shift_type: Option<ShiftType>,
}

/* =========================
Pre-scan status probe
========================= */
/// Swagger doc for the scan status endpoint
#[utoipa::path(
    get,
    path = "/scan/status",
    params(ScanStatusQuery),
    responses(
        (status = 200, description = "Current record and next expected action", body = Object, example = json!({
            "user": {
                "id": 42,
                "name": "Jane Doe",
                "department": "Engineering",
                "position": "Backend Developer",
                "shift_type": "DAY",
                "profile_image": null
            },
            "shift_type": "DAY",
            "date": "2026-02-03",
            "record": null,
            "next_action": "am-in"
        })),
        (status = 400, description = "Missing identifier"),
        (status = 404, description = "Unknown identity", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Kiosk"
)]
pub async fn scan_status(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<ScanStatusQuery>,
) -> actix_web::Result<impl Responder> {
    let identifier = query.identifier.trim();
    if identifier.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "identifier is required"
        })));
    }

    let employee = match scan::lookup_employee(pool.get_ref(), config.store_timeout_ms, identifier)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, identifier, "Identity lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })? {
        Some(employee) => employee,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": "Employee not found"
            })))
        }
    };

    let shift = query.shift_type.unwrap_or_default();
    let now = Local::now().naive_local();

    // Same anchoring as a real scan, so the probe and the scan agree about
    // which record an early-morning night worker is looking at.
    let date = scan::resolve_anchor_date(pool.get_ref(), config.store_timeout_ms, employee.id, shift, now)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id = employee.id, "Anchor date resolution failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let record = store::attendance::find_active(pool.get_ref(), employee.id, shift, date)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id = employee.id, "Attendance lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let next_action = next_expected_action(shift, record.as_ref());

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user": EmployeeBrief::from(employee.as_ref()),
        "shift_type": shift,
        "date": date,
        "record": record,
        "next_action": next_action,
    })))
}
