use crate::model::activity_log::actions;
use crate::model::attendance::AttendanceRecord;
use crate::model::shift::{AttendanceStatus, ShiftType};
use chrono::NaiveDateTime;

/// One of the six punch columns a scan can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchSlot {
    AmIn,
    AmOut,
    PmIn,
    PmOut,
    NightIn,
    NightOut,
}

impl PunchSlot {
    /// Display label used in responses and audit descriptions.
    pub fn label(self) -> &'static str {
        match self {
            PunchSlot::AmIn => "AM In",
            PunchSlot::AmOut => "AM Out",
            PunchSlot::PmIn => "PM In",
            PunchSlot::PmOut => "PM Out",
            PunchSlot::NightIn => "Night In",
            PunchSlot::NightOut => "Night Out",
        }
    }

    /// Kiosk action slug.
    pub fn slug(self) -> &'static str {
        match self {
            PunchSlot::AmIn => "am-in",
            PunchSlot::AmOut => "am-out",
            PunchSlot::PmIn => "pm-in",
            PunchSlot::PmOut => "pm-out",
            PunchSlot::NightIn => "night-in",
            PunchSlot::NightOut => "night-out",
        }
    }

    /// Column this slot writes in the attendance table.
    pub fn column(self) -> &'static str {
        match self {
            PunchSlot::AmIn => "am_in",
            PunchSlot::AmOut => "am_out",
            PunchSlot::PmIn => "pm_in",
            PunchSlot::PmOut => "pm_out",
            PunchSlot::NightIn => "night_in",
            PunchSlot::NightOut => "night_out",
        }
    }

    /// Audit trail action name for a scan into this slot.
    pub fn audit_action(self) -> &'static str {
        match self {
            PunchSlot::AmIn => actions::SCAN_AM_IN,
            PunchSlot::AmOut => actions::SCAN_AM_OUT,
            PunchSlot::PmIn => actions::SCAN_PM_IN,
            PunchSlot::PmOut => actions::SCAN_PM_OUT,
            PunchSlot::NightIn => actions::SCAN_NIGHT_IN,
            PunchSlot::NightOut => actions::SCAN_NIGHT_OUT,
        }
    }

    /// Slug the kiosk should offer after this slot was recorded.
    pub fn next_slug(self) -> &'static str {
        match self {
            PunchSlot::AmIn => "am-out",
            PunchSlot::AmOut => "pm-in",
            PunchSlot::PmIn => "pm-out",
            PunchSlot::PmOut => "complete",
            PunchSlot::NightIn => "night-out",
            PunchSlot::NightOut => "complete",
        }
    }
}

/// Verdict of a shift state machine for one scan. Pure data, persisted by
/// the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// No record exists yet: create one with this slot filled.
    Create {
        slot: PunchSlot,
        status: AttendanceStatus,
        /// First scan landed after PM start and also missed its grace
        /// window. Recorded in audit metadata only; the missing morning
        /// already caps the status at half day.
        late_for_pm: bool,
    },
    /// Fill one slot on the existing record.
    Punch {
        record_id: u64,
        slot: PunchSlot,
        /// Set when the status ratchet moved, cleared when it held.
        new_status: Option<AttendanceStatus>,
        /// Set on the closing punch of a shift.
        work_hours: Option<f64>,
    },
    /// Every slot for this shift is filled; reject without mutating.
    AlreadyComplete,
}

/// Fractional hours between two punches.
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}

/// Two-decimal rounding used for every stored work-hours figure.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// Projects the next expected kiosk action from slot occupancy alone. Used
/// by the pre-scan status probe; the actual scan re-runs the full state
/// machine against the current time.
pub fn next_expected_action(shift: ShiftType, record: Option<&AttendanceRecord>) -> &'static str {
    match shift {
        ShiftType::Day => match record {
            None => "am-in",
            Some(r) if r.pm_out.is_some() => "complete",
            Some(r) if r.pm_in.is_some() => "pm-out",
            Some(r) if r.am_in.is_some() && r.am_out.is_some() => "pm-in",
            Some(r) if r.am_in.is_some() => "am-out",
            Some(_) => "am-in",
        },
        ShiftType::Night => match record {
            None => "night-in",
            Some(r) if r.night_out.is_some() => "complete",
            Some(r) if r.night_in.is_some() => "night-out",
            Some(_) => "night-in",
        },
    }
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

    fn record() -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            employee_id: 7,
            date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            shift_type: ShiftType::Day,
            am_in: None,
            am_out: None,
            pm_in: None,
            pm_out: None,
            night_in: None,
            night_out: None,
            status: AttendanceStatus::Present,
            work_hours: None,
            notes: None,
        }
    }

    #[test]
    fn test_round_hours_two_decimals() {
        assert_eq!(round_hours(8.133333), 8.13);
        assert_eq!(round_hours(8.135), 8.14);
        assert_eq!(round_hours(8.0), 8.0);
    }

    #[test]
    fn test_hours_between_keeps_seconds() {
        let h = hours_between(at(13, 5, 0), at(17, 10, 0));
        assert!((h - 4.083333).abs() < 1e-5);
    }

    #[test]
    fn test_next_action_walks_the_day_cycle() {
        let mut rec = record();
        assert_eq!(next_expected_action(ShiftType::Day, None), "am-in");
        assert_eq!(next_expected_action(ShiftType::Day, Some(&rec)), "am-in");

        rec.am_in = Some(at(8, 0, 0));
        assert_eq!(next_expected_action(ShiftType::Day, Some(&rec)), "am-out");

        rec.am_out = Some(at(12, 0, 0));
        assert_eq!(next_expected_action(ShiftType::Day, Some(&rec)), "pm-in");

        rec.pm_in = Some(at(13, 0, 0));
        assert_eq!(next_expected_action(ShiftType::Day, Some(&rec)), "pm-out");

        rec.pm_out = Some(at(17, 0, 0));
        assert_eq!(next_expected_action(ShiftType::Day, Some(&rec)), "complete");
    }

    #[test]
    fn test_next_action_missed_morning_goes_to_pm_out() {
        // Lunch-gap first scan leaves am_in empty with pm_in set; the next
        // expected action is closing the afternoon, not starting the morning.
        let mut rec = record();
        rec.pm_in = Some(at(12, 30, 0));
        assert_eq!(next_expected_action(ShiftType::Day, Some(&rec)), "pm-out");
    }

    #[test]
    fn test_next_action_night_cycle() {
        let mut rec = record();
        rec.shift_type = ShiftType::Night;
        assert_eq!(next_expected_action(ShiftType::Night, None), "night-in");
        assert_eq!(
            next_expected_action(ShiftType::Night, Some(&rec)),
            "night-in"
        );

        rec.night_in = Some(at(22, 0, 0));
        assert_eq!(
            next_expected_action(ShiftType::Night, Some(&rec)),
            "night-out"
        );

        rec.night_out = Some(at(6, 0, 0));
        assert_eq!(
            next_expected_action(ShiftType::Night, Some(&rec)),
            "complete"
        );
    }
}
