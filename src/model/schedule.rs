use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Active shift schedule, one row in `schedule_config`.
///
/// All boundaries are local time-of-day values; `night_end` is numerically
/// smaller than `night_start` because the night session closes on the
/// following calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ScheduleConfig {
    #[schema(value_type = String, example = "08:00:00")]
    pub am_start: NaiveTime,

    #[schema(value_type = String, example = "12:00:00")]
    pub am_end: NaiveTime,

    #[schema(value_type = String, example = "13:00:00")]
    pub pm_start: NaiveTime,

    #[schema(value_type = String, example = "17:00:00")]
    pub pm_end: NaiveTime,

    #[schema(value_type = String, example = "22:00:00")]
    pub night_start: NaiveTime,

    #[schema(value_type = String, example = "06:00:00")]
    pub night_end: NaiveTime,

    #[schema(example = 15)]
    pub am_grace_minutes: u32,

    #[schema(example = 15)]
    pub pm_grace_minutes: u32,

    #[schema(example = 15)]
    pub night_grace_minutes: u32,

    /// Single lateness knob from before the per-session grace columns
    /// existed. Kept so older exports keep parsing; the engine ignores it.
    #[schema(example = 15)]
    pub late_threshold_minutes: u32,
}

impl Default for ScheduleConfig {
    /// Fallback used whenever the stored schedule is missing or unreadable:
    /// 08:00-12:00 / 13:00-17:00 day sessions, 22:00-06:00 night session,
    /// 15-minute grace everywhere.
    fn default() -> Self {
        fn t(h: u32, m: u32) -> NaiveTime {
            NaiveTime::from_hms_opt(h, m, 0).unwrap()
        }

        Self {
            am_start: t(8, 0),
            am_end: t(12, 0),
            pm_start: t(13, 0),
            pm_end: t(17, 0),
            night_start: t(22, 0),
            night_end: t(6, 0),
            am_grace_minutes: 15,
            pm_grace_minutes: 15,
            night_grace_minutes: 15,
            late_threshold_minutes: 15,
        }
    }
}
