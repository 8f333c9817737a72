use crate::engine::classify::check_lateness;
use crate::engine::decision::{hours_between, round_hours, Decision, PunchSlot};
use crate::model::attendance::AttendanceRecord;
use crate::model::schedule::ScheduleConfig;
use chrono::{NaiveDateTime, Timelike};

/// An early-morning night scan belongs to the previous calendar day when
/// that day still has an unclosed night session. The caller supplies the
/// open-session lookup result so this stays a pure rule.
pub fn anchors_to_previous_day(scan: NaiveDateTime, open_previous: bool) -> bool {
    scan.hour() < 12 && open_previous
}

/// Night-shift state machine: one in-punch, one out-punch, then done.
pub fn decide(
    now: NaiveDateTime,
    schedule: &ScheduleConfig,
    record: Option<&AttendanceRecord>,
) -> Decision {
    let Some(r) = record else {
        let lateness = check_lateness(now, schedule.night_start, schedule.night_grace_minutes);
        return Decision::Create {
            slot: PunchSlot::NightIn,
            status: lateness.status(),
            late_for_pm: false,
        };
    };

    match (r.night_in, r.night_out) {
        (None, _) => {
            let lateness = check_lateness(now, schedule.night_start, schedule.night_grace_minutes);
            let ratcheted = r.status.ratchet(lateness.status());
            Decision::Punch {
                record_id: r.id,
                slot: PunchSlot::NightIn,
                new_status: (ratcheted != r.status).then_some(ratcheted),
                work_hours: None,
            }
        }
        (Some(night_in), None) => Decision::Punch {
            record_id: r.id,
            slot: PunchSlot::NightOut,
            new_status: None,
            work_hours: Some(round_hours(hours_between(night_in, now))),
        },
        (Some(_), Some(_)) => Decision::AlreadyComplete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shift::{AttendanceStatus, ShiftType};
    use chrono::NaiveDate;

    fn on(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn night_record() -> AttendanceRecord {
        AttendanceRecord {
            id: 9,
            employee_id: 7,
            date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            shift_type: ShiftType::Night,
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

    fn schedule() -> ScheduleConfig {
        ScheduleConfig::default()
    }

    #[test]
    fn test_first_scan_in_grace_creates_present_night_in() {
        let d = decide(on(3, 22, 10, 0), &schedule(), None);
        assert_eq!(
            d,
            Decision::Create {
                slot: PunchSlot::NightIn,
                status: AttendanceStatus::Present,
                late_for_pm: false,
            }
        );
    }

    #[test]
    fn test_ninety_minutes_late_is_late_not_half_day() {
        let d = decide(on(3, 23, 30, 0), &schedule(), None);
        assert_eq!(
            d,
            Decision::Create {
                slot: PunchSlot::NightIn,
                status: AttendanceStatus::Late,
                late_for_pm: false,
            }
        );
    }

    #[test]
    fn test_early_morning_fresh_record_is_on_time() {
        // With no open session to anchor to, a 00:30 scan opens a new record
        // dated that morning; 22:00 has not come around yet on that date.
        let d = decide(on(4, 0, 30, 0), &schedule(), None);
        assert_eq!(
            d,
            Decision::Create {
                slot: PunchSlot::NightIn,
                status: AttendanceStatus::Present,
                late_for_pm: false,
            }
        );
    }

    #[test]
    fn test_second_scan_closes_session_across_midnight() {
        let mut r = night_record();
        r.night_in = Some(on(3, 22, 0, 0));
        let d = decide(on(4, 6, 0, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 9,
                slot: PunchSlot::NightOut,
                new_status: None,
                work_hours: Some(8.0),
            }
        );
    }

    #[test]
    fn test_seeded_row_takes_night_in_punch_with_ratchet() {
        let mut r = night_record();
        r.status = AttendanceStatus::Absent;
        let d = decide(on(3, 22, 40, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 9,
                slot: PunchSlot::NightIn,
                new_status: Some(AttendanceStatus::Late),
                work_hours: None,
            }
        );
    }

    #[test]
    fn test_third_scan_is_already_complete() {
        let mut r = night_record();
        r.night_in = Some(on(3, 22, 0, 0));
        r.night_out = Some(on(4, 6, 0, 0));
        let d = decide(on(4, 6, 5, 0), &schedule(), Some(&r));
        assert_eq!(d, Decision::AlreadyComplete);
    }

    #[test]
    fn test_anchor_rule_needs_both_conditions() {
        let one_am = on(4, 1, 0, 0);
        assert!(anchors_to_previous_day(one_am, true));
        assert!(!anchors_to_previous_day(one_am, false));
        assert!(!anchors_to_previous_day(on(3, 22, 0, 0), true));
        assert!(anchors_to_previous_day(on(4, 11, 59, 59), true));
        assert!(!anchors_to_previous_day(on(4, 12, 0, 0), true));
    }
}
