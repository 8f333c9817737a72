use crate::engine::decision::PunchSlot;
use crate::model::attendance::AttendanceRecord;
use crate::model::shift::{AttendanceStatus, ShiftType};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;
use tracing::debug;

/// Loads the row a scan would mutate: this employee, this date, this shift
/// family.
pub async fn find_active(
    pool: &MySqlPool,
    employee_id: u64,
    shift: ShiftType,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, employee_id, date, shift_type,
               am_in, am_out, pm_in, pm_out, night_in, night_out,
               status, work_hours, notes
        FROM attendance
        WHERE employee_id = ? AND date = ? AND shift_type = ?
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .bind(shift)
    .fetch_optional(pool)
    .await
}

/// True when `date` carries a night session that was opened but never
/// closed. Drives the anchoring of early-morning night scans.
pub async fn find_open_night(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM attendance
            WHERE employee_id = ? AND date = ? AND shift_type = ?
              AND night_in IS NOT NULL AND night_out IS NULL
        )
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .bind(ShiftType::Night)
    .fetch_one(pool)
    .await
}

/// Creates the day's record with its first punch already in place. The
/// unique (employee_id, date, shift_type) key makes racing first scans safe:
/// the losing insert surfaces a duplicate-key error for the caller to map.
pub async fn insert_record(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
    shift: ShiftType,
    slot: PunchSlot,
    at: NaiveDateTime,
    status: AttendanceStatus,
) -> Result<u64, sqlx::Error> {
    let sql = format!(
        "INSERT INTO attendance (employee_id, date, shift_type, {}, status) VALUES (?, ?, ?, ?, ?)",
        slot.column()
    );
    debug!(sql = %sql, employee_id, "inserting attendance record");

    let done = sqlx::query(&sql)
        .bind(employee_id)
        .bind(date)
        .bind(shift)
        .bind(at)
        .bind(status)
        .execute(pool)
        .await?;
    Ok(done.last_insert_id())
}

/// Fills one slot on an existing record, guarded so a filled slot is never
/// overwritten. Returns false when the guard rejected the write, i.e. a
/// concurrent scan landed first.
pub async fn apply_punch(
    pool: &MySqlPool,
    record_id: u64,
    slot: PunchSlot,
    at: NaiveDateTime,
    new_status: Option<AttendanceStatus>,
    work_hours: Option<f64>,
) -> Result<bool, sqlx::Error> {
    let mut sql = format!("UPDATE attendance SET {} = ?", slot.column());
    if new_status.is_some() {
        sql.push_str(", status = ?");
    }
    if work_hours.is_some() {
        sql.push_str(", work_hours = ?");
    }
    sql.push_str(&format!(" WHERE id = ? AND {} IS NULL", slot.column()));
    debug!(sql = %sql, record_id, "applying punch");

    let mut query = sqlx::query(&sql).bind(at);
    if let Some(status) = new_status {
        query = query.bind(status);
    }
    if let Some(hours) = work_hours {
        query = query.bind(hours);
    }
    let done = query.bind(record_id).execute(pool).await?;
    Ok(done.rows_affected() > 0)
}
