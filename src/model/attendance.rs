use crate::model::shift::{AttendanceStatus, ShiftType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One employee's attendance for one calendar date and one shift type.
///
/// The `(employee_id, date, shift_type)` triple is unique at the store
/// level. Day shifts fill the four am/pm slots, night shifts the two night
/// slots; a night record keeps the `date` of the evening the shift started
/// even when `night_out` lands after midnight.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 42)]
    pub employee_id: u64,

    #[schema(value_type = String, format = "date", example = "2026-02-03")]
    pub date: NaiveDate,

    pub shift_type: ShiftType,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub am_in: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub am_out: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub pm_in: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub pm_out: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub night_in: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub night_out: Option<NaiveDateTime>,

    pub status: AttendanceStatus,

    #[schema(example = 8.13, nullable = true)]
    pub work_hours: Option<f64>,

    #[schema(nullable = true)]
    pub notes: Option<String>,
}
