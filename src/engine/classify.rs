use crate::model::schedule::ScheduleConfig;
use crate::model::shift::{AttendanceStatus, ShiftType};
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

/// Arriving this many minutes after a session's scheduled start downgrades
/// the day to a half day. Company policy, not configurable.
pub const HALF_DAY_THRESHOLD_MINUTES: i64 = 120;

/// Where a wall-clock moment sits relative to the configured sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Morning,
    LunchGap,
    Afternoon,
    NightWindow,
}

/// Minutes since local midnight, seconds dropped. All window comparisons
/// run on these integers so the boundaries stay exact half-open intervals.
pub fn minutes_since_midnight(t: NaiveTime) -> i64 {
    t.hour() as i64 * 60 + t.minute() as i64
}

/// Splits a day-shift scan into Morning / LunchGap / Afternoon on the AM-end
/// and PM-start boundaries, `[start, end)` on both: a scan at exactly AM-end
/// already belongs to the lunch gap. Night scans are not three-way split,
/// they always classify as `NightWindow`.
pub fn classify_period(shift: ShiftType, at: NaiveTime, schedule: &ScheduleConfig) -> Period {
    if shift == ShiftType::Night {
        return Period::NightWindow;
    }

    let now = minutes_since_midnight(at);
    if now < minutes_since_midnight(schedule.am_end) {
        Period::Morning
    } else if now < minutes_since_midnight(schedule.pm_start) {
        Period::LunchGap
    } else {
        Period::Afternoon
    }
}

/// Membership test for the overnight session window. The interval is
/// inverted because it crosses midnight: 22:00-06:00 means "at or after
/// 22:00, or before 06:00".
pub fn in_night_window(at: NaiveTime, schedule: &ScheduleConfig) -> bool {
    let now = minutes_since_midnight(at);
    now >= minutes_since_midnight(schedule.night_start)
        || now < minutes_since_midnight(schedule.night_end)
}

/// Lateness verdict for one arrival against one session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lateness {
    pub is_late: bool,
    pub is_half_day: bool,
    pub minutes_late: i64,
}

impl Lateness {
    pub fn status(self) -> AttendanceStatus {
        if self.is_half_day {
            AttendanceStatus::HalfDay
        } else if self.is_late {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        }
    }
}

/// Classifies an arrival against the session start on the arrival's own
/// calendar date. Within the grace period counts as on time with zero
/// minutes late; past it, minutes are counted from the scheduled start
/// itself, and crossing [`HALF_DAY_THRESHOLD_MINUTES`] flags a half day.
///
/// Shift-agnostic: callers pass the AM, PM, or night start with the
/// matching grace period.
pub fn check_lateness(arrival: NaiveDateTime, session_start: NaiveTime, grace_minutes: u32) -> Lateness {
    let scheduled_start = arrival.date().and_time(session_start);
    let grace_deadline = scheduled_start + Duration::minutes(grace_minutes as i64);

    if arrival <= grace_deadline {
        return Lateness {
            is_late: false,
            is_half_day: false,
            minutes_late: 0,
        };
    }

    let minutes_late = (arrival - scheduled_start).num_minutes().max(0);
    Lateness {
        is_late: true,
        is_half_day: minutes_late >= HALF_DAY_THRESHOLD_MINUTES,
        minutes_late,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn schedule() -> ScheduleConfig {
        ScheduleConfig::default()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 3)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_morning_runs_until_am_end_exclusive() {
        let cfg = schedule();
        assert_eq!(
            classify_period(ShiftType::Day, t(11, 59), &cfg),
            Period::Morning
        );
        assert_eq!(
            classify_period(ShiftType::Day, t(0, 0), &cfg),
            Period::Morning
        );
    }

    #[test]
    fn test_scan_at_exactly_am_end_is_lunch_gap() {
        let cfg = schedule();
        assert_eq!(
            classify_period(ShiftType::Day, t(12, 0), &cfg),
            Period::LunchGap,
            "AM-end boundary belongs to the lunch gap, not the morning"
        );
    }

    #[test]
    fn test_afternoon_starts_at_pm_start_inclusive() {
        let cfg = schedule();
        assert_eq!(
            classify_period(ShiftType::Day, t(12, 59), &cfg),
            Period::LunchGap
        );
        assert_eq!(
            classify_period(ShiftType::Day, t(13, 0), &cfg),
            Period::Afternoon
        );
        assert_eq!(
            classify_period(ShiftType::Day, t(23, 30), &cfg),
            Period::Afternoon
        );
    }

    #[test]
    fn test_night_shift_skips_the_day_split() {
        let cfg = schedule();
        assert_eq!(
            classify_period(ShiftType::Night, t(10, 0), &cfg),
            Period::NightWindow
        );
    }

    #[test]
    fn test_night_window_wraps_midnight() {
        let cfg = schedule();
        assert!(in_night_window(t(22, 0), &cfg));
        assert!(in_night_window(t(23, 30), &cfg));
        assert!(in_night_window(t(3, 0), &cfg));
        assert!(!in_night_window(t(6, 0), &cfg), "night end is exclusive");
        assert!(!in_night_window(t(12, 0), &cfg));
        assert!(!in_night_window(t(21, 59), &cfg));
    }

    #[test]
    fn test_arrival_within_grace_is_on_time_with_zero_minutes() {
        // AM start 08:00, grace 15: everything up to 08:15:00 is on time.
        let result = check_lateness(at(8, 10, 0), t(8, 0), 15);
        assert!(!result.is_late);
        assert!(!result.is_half_day);
        assert_eq!(result.minutes_late, 0);

        let exact = check_lateness(at(8, 15, 0), t(8, 0), 15);
        assert!(!exact.is_late, "grace deadline itself is still on time");
        assert_eq!(exact.minutes_late, 0);
    }

    #[test]
    fn test_early_arrival_is_on_time() {
        let result = check_lateness(at(7, 30, 0), t(8, 0), 15);
        assert!(!result.is_late);
        assert_eq!(result.minutes_late, 0);
    }

    #[test]
    fn test_late_minutes_count_from_scheduled_start() {
        // One second past the grace deadline flips the verdict, but the
        // minute count is anchored to 08:00, not 08:15.
        let result = check_lateness(at(8, 15, 1), t(8, 0), 15);
        assert!(result.is_late);
        assert!(!result.is_half_day);
        assert_eq!(result.minutes_late, 15);

        let result = check_lateness(at(8, 40, 30), t(8, 0), 15);
        assert!(result.is_late);
        assert_eq!(result.minutes_late, 40);
    }

    #[test]
    fn test_two_hours_late_is_half_day() {
        let result = check_lateness(at(10, 0, 0), t(8, 0), 15);
        assert!(result.is_late);
        assert!(result.is_half_day);
        assert_eq!(result.minutes_late, 120);
        assert_eq!(result.status(), AttendanceStatus::HalfDay);

        let worse = check_lateness(at(10, 35, 0), t(8, 0), 15);
        assert!(worse.is_half_day);
        assert_eq!(worse.status(), AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            check_lateness(at(8, 5, 0), t(8, 0), 15).status(),
            AttendanceStatus::Present
        );
        assert_eq!(
            check_lateness(at(8, 30, 0), t(8, 0), 15).status(),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn test_night_start_lateness_uses_same_day() {
        // 23:30 against a 22:00 start is 90 minutes late, still short of
        // the half-day threshold.
        let result = check_lateness(at(23, 30, 0), t(22, 0), 15);
        assert!(result.is_late);
        assert!(!result.is_half_day);
        assert_eq!(result.minutes_late, 90);

        // An early-morning arrival with no open record anchors to its own
        // date, where tonight's 22:00 start is still in the future.
        let early = check_lateness(at(3, 0, 0), t(22, 0), 15);
        assert!(!early.is_late);
        assert_eq!(early.minutes_late, 0);
    }
}
