use crate::engine::classify::in_night_window;
use crate::engine::cooldown;
use crate::engine::decision::{Decision, PunchSlot};
use crate::engine::{day, night};
use crate::model::activity_log::{ActivityType, NewActivity};
use crate::model::employee::Employee;
use crate::model::schedule::ScheduleConfig;
use crate::model::shift::{AttendanceStatus, ShiftType};
use crate::store;
use crate::utils::{badge_filter, directory_cache};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use derive_more::{Display, From};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use utoipa::ToSchema;

/* ===== Wire and outcome types ===== */

/// One badge scan as received from the kiosk.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Email or numeric employee id read off the badge.
    #[schema(example = "jane.doe@example.com")]
    pub identifier: String,

    #[serde(default)]
    pub shift_type: ShiftType,

    /// Scan-time override sent by kiosks that buffer while offline.
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub timestamp: Option<NaiveDateTime>,

    /// Data-URL camera snapshot, forwarded to the audit entry only.
    #[schema(nullable = true)]
    pub scan_photo: Option<String>,
}

/// Everything the kiosk needs to render a recorded scan.
#[derive(Debug, Clone)]
pub struct RecordedScan {
    pub attendance_id: u64,
    pub slot: PunchSlot,
    pub recorded_at: NaiveDateTime,
    pub status: AttendanceStatus,
    pub work_hours: Option<f64>,
    pub message: String,
    pub employee: Arc<Employee>,
}

/// Outcome of one scan. Business rejections are ordinary outcomes, not
/// errors: the kiosk renders them as guidance and the record stays intact.
#[derive(Debug)]
pub enum ScanOutcome {
    Recorded(RecordedScan),
    Cooldown {
        wait_seconds: u64,
    },
    AlreadyComplete {
        employee: Arc<Employee>,
        shift_type: ShiftType,
    },
    /// A concurrent scan filled this slot between our read and our write.
    AlreadyRecorded {
        employee: Arc<Employee>,
        slot: PunchSlot,
    },
    UnknownEmployee,
}

/// Infrastructure failure on the record path. Everything here is a 500 to
/// the kiosk; business rejections never take this form.
#[derive(Debug, Display, From)]
pub enum ScanError {
    #[display(fmt = "store error: {}", _0)]
    Store(sqlx::Error),
    #[from(ignore)]
    #[display(fmt = "{} timed out", _0)]
    Timeout(&'static str),
}

impl std::error::Error for ScanError {}

/// Runs a store call under the record-path deadline. A slow store fails the
/// scan rather than hanging the kiosk.
async fn bounded<T, F>(timeout_ms: u64, op: &'static str, fut: F) -> Result<T, ScanError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match actix_web::rt::time::timeout(Duration::from_millis(timeout_ms), fut).await {
        Ok(done) => done.map_err(ScanError::from),
        Err(_) => Err(ScanError::Timeout(op)),
    }
}

fn is_duplicate_key(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23000"),
        _ => false,
    }
}

/* ===== Orchestration ===== */

/// Processes one badge scan end to end: identity, schedule, anchor date,
/// cooldown, state machine, persistence, audit.
pub async fn process_scan(
    pool: &MySqlPool,
    store_timeout_ms: u64,
    audit_timeout_ms: u64,
    req: &ScanRequest,
) -> Result<ScanOutcome, ScanError> {
    let now = req.timestamp.unwrap_or_else(|| Local::now().naive_local());
    let shift = req.shift_type;

    let Some(employee) = lookup_employee(pool, store_timeout_ms, req.identifier.trim()).await?
    else {
        return Ok(ScanOutcome::UnknownEmployee);
    };

    let schedule = load_schedule(pool, store_timeout_ms).await;
    let date = resolve_anchor_date(pool, store_timeout_ms, employee.id, shift, now).await?;

    let record = bounded(
        store_timeout_ms,
        "attendance lookup",
        store::attendance::find_active(pool, employee.id, shift, date),
    )
    .await?;

    if let Some(wait_seconds) = record.as_ref().and_then(|r| cooldown::check(r, shift, now)) {
        return Ok(ScanOutcome::Cooldown { wait_seconds });
    }

    let decision = match shift {
        ShiftType::Day => day::decide(now, &schedule, record.as_ref()),
        ShiftType::Night => night::decide(now, &schedule, record.as_ref()),
    };

    match decision {
        Decision::AlreadyComplete => Ok(ScanOutcome::AlreadyComplete {
            employee,
            shift_type: shift,
        }),

        Decision::Create {
            slot,
            status,
            late_for_pm,
        } => {
            let inserted = bounded(
                store_timeout_ms,
                "attendance insert",
                store::attendance::insert_record(pool, employee.id, date, shift, slot, now, status),
            )
            .await;
            let attendance_id = match inserted {
                Ok(id) => id,
                Err(ScanError::Store(e)) if is_duplicate_key(&e) => {
                    // Two kiosks raced the first scan of the day. The loser
                    // backs off as if the cooldown had caught it.
                    return Ok(ScanOutcome::Cooldown {
                        wait_seconds: cooldown::SCAN_COOLDOWN_SECONDS as u64,
                    });
                }
                Err(e) => return Err(e),
            };

            let mut metadata = scan_metadata(&employee, attendance_id, shift, status);
            metadata["time"] = json!(now.format("%Y-%m-%dT%H:%M:%S").to_string());
            if slot == PunchSlot::PmIn {
                metadata["late_for_pm"] = json!(late_for_pm);
            }
            if slot == PunchSlot::NightIn {
                metadata["in_night_window"] = json!(in_night_window(now.time(), &schedule));
            }
            audit_scan(
                pool,
                audit_timeout_ms,
                &employee,
                slot,
                now,
                metadata,
                req.scan_photo.clone(),
            );

            let message = create_message(&employee.name, slot, now, status, late_for_pm);
            Ok(ScanOutcome::Recorded(RecordedScan {
                attendance_id,
                slot,
                recorded_at: now,
                status,
                work_hours: None,
                message,
                employee,
            }))
        }

        Decision::Punch {
            record_id,
            slot,
            new_status,
            work_hours,
        } => {
            let applied = bounded(
                store_timeout_ms,
                "attendance update",
                store::attendance::apply_punch(pool, record_id, slot, now, new_status, work_hours),
            )
            .await?;
            if !applied {
                return Ok(ScanOutcome::AlreadyRecorded { employee, slot });
            }

            let status = new_status
                .or(record.as_ref().map(|r| r.status))
                .unwrap_or(AttendanceStatus::Present);

            audit_scan(
                pool,
                audit_timeout_ms,
                &employee,
                slot,
                now,
                scan_metadata(&employee, record_id, shift, status),
                req.scan_photo.clone(),
            );

            let message = punch_message(&employee.name, slot, now);
            Ok(ScanOutcome::Recorded(RecordedScan {
                attendance_id: record_id,
                slot,
                recorded_at: now,
                status,
                work_hours,
                message,
                employee,
            }))
        }
    }
}

/// Identity resolution: negative cuckoo-filter probe first, then the
/// directory cache, then the employees table. Table hits are cached and
/// added to the filter on the way out.
pub async fn lookup_employee(
    pool: &MySqlPool,
    timeout_ms: u64,
    identifier: &str,
) -> Result<Option<Arc<Employee>>, ScanError> {
    if badge_filter::is_ready() && !badge_filter::might_exist(identifier) {
        return Ok(None);
    }

    if let Some(hit) = directory_cache::get(identifier).await {
        return Ok(Some(hit));
    }

    let found = bounded(
        timeout_ms,
        "employee lookup",
        store::employee::find_by_identifier(pool, identifier),
    )
    .await?;
    match found {
        Some(employee) => {
            let employee = Arc::new(employee);
            directory_cache::remember(&employee).await;
            badge_filter::insert_identifiers(&employee);
            Ok(Some(employee))
        }
        None => Ok(None),
    }
}

/// Loads the schedule, degrading to the built-in defaults when the row is
/// missing, unreadable or slow. A broken schedule must not take the kiosk
/// down with it.
async fn load_schedule(pool: &MySqlPool, timeout_ms: u64) -> ScheduleConfig {
    match bounded(timeout_ms, "schedule load", store::schedule::fetch_active(pool)).await {
        Ok(Some(schedule)) => schedule,
        Ok(None) => ScheduleConfig::default(),
        Err(e) => {
            warn!(error = %e, "falling back to default schedule");
            ScheduleConfig::default()
        }
    }
}

/// Date the scan belongs to. An early-morning night scan attaches to the
/// previous day when that day's night session is still open.
pub async fn resolve_anchor_date(
    pool: &MySqlPool,
    timeout_ms: u64,
    employee_id: u64,
    shift: ShiftType,
    now: NaiveDateTime,
) -> Result<NaiveDate, ScanError> {
    let today = now.date();
    if shift != ShiftType::Night || now.hour() >= 12 {
        return Ok(today);
    }
    let Some(yesterday) = today.pred_opt() else {
        return Ok(today);
    };
    let open = bounded(
        timeout_ms,
        "open night lookup",
        store::attendance::find_open_night(pool, employee_id, yesterday),
    )
    .await?;
    Ok(if night::anchors_to_previous_day(now, open) {
        yesterday
    } else {
        today
    })
}

/* ===== Audit ===== */

fn scan_metadata(
    employee: &Employee,
    attendance_id: u64,
    shift: ShiftType,
    status: AttendanceStatus,
) -> serde_json::Value {
    json!({
        "attendance_id": attendance_id,
        "shift_type": shift.to_string(),
        "status": status.to_string(),
        "department": employee.department,
        "position": employee.position,
    })
}

fn audit_scan(
    pool: &MySqlPool,
    timeout_ms: u64,
    employee: &Employee,
    slot: PunchSlot,
    at: NaiveDateTime,
    metadata: serde_json::Value,
    scan_photo: Option<String>,
) {
    store::activity_log::emit(
        pool,
        timeout_ms,
        NewActivity {
            user_id: Some(employee.id),
            user_name: employee.name.clone(),
            action: slot.audit_action().to_string(),
            description: format!(
                "{} scanned {} at {}",
                employee.name,
                slot.label(),
                format_time(at)
            ),
            log_type: ActivityType::Success,
            metadata: Some(metadata),
            scan_photo,
        },
    );
}

/* ===== Kiosk messages ===== */

/// 12-hour clock without a leading zero, the way the kiosk displays times.
pub fn format_time(at: NaiveDateTime) -> String {
    at.format("%-I:%M:%S %p").to_string()
}

fn punch_message(name: &str, slot: PunchSlot, at: NaiveDateTime) -> String {
    let time = format_time(at);
    match slot {
        PunchSlot::AmIn => format!("Good morning, {}! AM In recorded at {}.", name, time),
        PunchSlot::AmOut => format!("See you later, {}! AM Out recorded at {}.", name, time),
        PunchSlot::PmIn => format!("Welcome back, {}! PM In recorded at {}.", name, time),
        PunchSlot::PmOut => format!(
            "Goodbye, {}! PM Out recorded at {}. Have a great evening!",
            name, time
        ),
        PunchSlot::NightIn => format!("Good evening, {}! Night In recorded at {}.", name, time),
        PunchSlot::NightOut => format!(
            "Good morning, {}! Night Out recorded at {}. Rest well!",
            name, time
        ),
    }
}

fn create_message(
    name: &str,
    slot: PunchSlot,
    at: NaiveDateTime,
    status: AttendanceStatus,
    late_for_pm: bool,
) -> String {
    let time = format_time(at);
    match slot {
        PunchSlot::AmIn => {
            let suffix = match status {
                AttendanceStatus::Late => " (Late)",
                AttendanceStatus::HalfDay => " (Half Day)",
                _ => "",
            };
            format!(
                "Good morning, {}! AM In recorded at {}.{}",
                name, time, suffix
            )
        }
        PunchSlot::PmIn => {
            let suffix = if late_for_pm {
                " (Morning missed + Late PM arrival - Half Day)"
            } else {
                " (Morning session missed - Half Day)"
            };
            format!(
                "Good afternoon, {}! PM In recorded at {}.{}",
                name, time, suffix
            )
        }
        _ => punch_message(name, slot, at),
    }
}

pub fn completed_message(name: &str, shift: ShiftType) -> String {
    match shift {
        ShiftType::Day => format!("{} has already completed all attendance for today.", name),
        ShiftType::Night => format!(
            "{} has already completed all attendance for tonight's shift.",
            name
        ),
    }
}

pub fn cooldown_message(wait_seconds: u64) -> String {
    format!(
        "Please wait {} seconds before scanning again.",
        wait_seconds
    )
}

pub fn already_recorded_message(name: &str, slot: PunchSlot) -> String {
    format!("{}'s {} is already recorded.", name, slot.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 3)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_format_time_is_twelve_hour_without_padding() {
        assert_eq!(format_time(at(8, 0, 5)), "8:00:05 AM");
        assert_eq!(format_time(at(17, 10, 0)), "5:10:00 PM");
        assert_eq!(format_time(at(0, 30, 0)), "12:30:00 AM");
    }

    #[test]
    fn test_punch_messages_greet_by_slot() {
        let msg = punch_message("Jane", PunchSlot::PmOut, at(17, 10, 0));
        assert_eq!(msg, "Goodbye, Jane! PM Out recorded at 5:10:00 PM. Have a great evening!");

        let msg = punch_message("Jane", PunchSlot::NightOut, at(6, 0, 0));
        assert_eq!(msg, "Good morning, Jane! Night Out recorded at 6:00:00 AM. Rest well!");
    }

    #[test]
    fn test_create_message_marks_lateness() {
        let msg = create_message("Jane", PunchSlot::AmIn, at(8, 20, 0), AttendanceStatus::Late, false);
        assert!(msg.ends_with("(Late)"), "got: {}", msg);

        let msg = create_message("Jane", PunchSlot::AmIn, at(7, 58, 0), AttendanceStatus::Present, false);
        assert_eq!(msg, "Good morning, Jane! AM In recorded at 7:58:00 AM.");
    }

    #[test]
    fn test_create_message_explains_missed_morning() {
        let msg = create_message(
            "Jane",
            PunchSlot::PmIn,
            at(12, 30, 0),
            AttendanceStatus::HalfDay,
            false,
        );
        assert!(msg.starts_with("Good afternoon, Jane!"), "got: {}", msg);
        assert!(msg.ends_with("(Morning session missed - Half Day)"), "got: {}", msg);

        let late = create_message(
            "Jane",
            PunchSlot::PmIn,
            at(13, 20, 0),
            AttendanceStatus::HalfDay,
            true,
        );
        assert!(
            late.ends_with("(Morning missed + Late PM arrival - Half Day)"),
            "got: {}",
            late
        );
    }

    #[test]
    fn test_completed_message_names_the_shift() {
        assert_eq!(
            completed_message("Jane", ShiftType::Day),
            "Jane has already completed all attendance for today."
        );
        assert_eq!(
            completed_message("Jane", ShiftType::Night),
            "Jane has already completed all attendance for tonight's shift."
        );
    }
}
