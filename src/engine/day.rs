use crate::engine::classify::{check_lateness, classify_period, Period};
use crate::engine::decision::{hours_between, round_hours, Decision, PunchSlot};
use crate::model::attendance::AttendanceRecord;
use crate::model::schedule::ScheduleConfig;
use crate::model::shift::{AttendanceStatus, ShiftType};
use chrono::NaiveDateTime;

/// Day-shift state machine. Looks at which slots the record already has and
/// at the period the scan falls in, and returns the single mutation this
/// scan is allowed to make.
pub fn decide(
    now: NaiveDateTime,
    schedule: &ScheduleConfig,
    record: Option<&AttendanceRecord>,
) -> Decision {
    let Some(r) = record else {
        return first_scan(now, schedule, None);
    };

    if r.am_in.is_some() && r.am_out.is_none() && r.pm_in.is_none() && r.pm_out.is_none() {
        // Morning still open. Before the afternoon begins this scan closes
        // it; afterwards the AM out was skipped and the worker is clocking
        // back in for the afternoon.
        let slot = match classify_period(ShiftType::Day, now.time(), schedule) {
            Period::Morning | Period::LunchGap => PunchSlot::AmOut,
            _ => PunchSlot::PmIn,
        };
        return Decision::Punch {
            record_id: r.id,
            slot,
            new_status: None,
            work_hours: None,
        };
    }

    if r.am_in.is_some() && r.am_out.is_some() && r.pm_in.is_none() && r.pm_out.is_none() {
        // Back from lunch. A late return can worsen the day, but never past
        // LATE. Only a missed morning makes a half day.
        let lateness = check_lateness(now, schedule.pm_start, schedule.pm_grace_minutes);
        let candidate = if lateness.is_late {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };
        let ratcheted = r.status.ratchet(candidate);
        return Decision::Punch {
            record_id: r.id,
            slot: PunchSlot::PmIn,
            new_status: (ratcheted != r.status).then_some(ratcheted),
            work_hours: None,
        };
    }

    if let (Some(pm_in), None) = (r.pm_in, r.pm_out) {
        // Closing punch. The morning pair only counts when both ends exist.
        let morning = match (r.am_in, r.am_out) {
            (Some(am_in), Some(am_out)) => hours_between(am_in, am_out),
            _ => 0.0,
        };
        return Decision::Punch {
            record_id: r.id,
            slot: PunchSlot::PmOut,
            new_status: None,
            work_hours: Some(round_hours(morning + hours_between(pm_in, now))),
        };
    }

    if r.am_in.is_none() && r.pm_in.is_none() {
        // A row with no in-punch at all, e.g. seeded absent overnight. Treat
        // the scan as the first of the day against that row.
        return first_scan(now, schedule, Some(r));
    }

    Decision::AlreadyComplete
}

/// First scan of the day, either creating a fresh record or punching into an
/// existing row that has no in-punch yet.
fn first_scan(
    now: NaiveDateTime,
    schedule: &ScheduleConfig,
    existing: Option<&AttendanceRecord>,
) -> Decision {
    match classify_period(ShiftType::Day, now.time(), schedule) {
        Period::Morning => {
            let lateness = check_lateness(now, schedule.am_start, schedule.am_grace_minutes);
            match existing {
                None => Decision::Create {
                    slot: PunchSlot::AmIn,
                    status: lateness.status(),
                    late_for_pm: false,
                },
                Some(r) => {
                    let ratcheted = r.status.ratchet(lateness.status());
                    Decision::Punch {
                        record_id: r.id,
                        slot: PunchSlot::AmIn,
                        new_status: (ratcheted != r.status).then_some(ratcheted),
                        work_hours: None,
                    }
                }
            }
        }
        _ => {
            // The whole morning was missed, which caps the day at half-day
            // no matter how punctual the afternoon arrival is.
            let late_for_pm =
                check_lateness(now, schedule.pm_start, schedule.pm_grace_minutes).is_late;
            match existing {
                None => Decision::Create {
                    slot: PunchSlot::PmIn,
                    status: AttendanceStatus::HalfDay,
                    late_for_pm,
                },
                Some(r) => {
                    let ratcheted = r.status.ratchet(AttendanceStatus::HalfDay);
                    Decision::Punch {
                        record_id: r.id,
                        slot: PunchSlot::PmIn,
                        new_status: (ratcheted != r.status).then_some(ratcheted),
                        work_hours: None,
                    }
                }
            }
        }
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

    fn base_record() -> AttendanceRecord {
        AttendanceRecord {
            id: 42,
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

    fn schedule() -> ScheduleConfig {
        ScheduleConfig::default()
    }

    #[test]
    fn test_first_scan_in_grace_creates_present_am_in() {
        let d = decide(at(7, 58, 0), &schedule(), None);
        assert_eq!(
            d,
            Decision::Create {
                slot: PunchSlot::AmIn,
                status: AttendanceStatus::Present,
                late_for_pm: false,
            },
            "arrival before the grace deadline should open an on-time record"
        );
    }

    #[test]
    fn test_first_scan_past_grace_creates_late() {
        let d = decide(at(8, 20, 0), &schedule(), None);
        assert_eq!(
            d,
            Decision::Create {
                slot: PunchSlot::AmIn,
                status: AttendanceStatus::Late,
                late_for_pm: false,
            }
        );
    }

    #[test]
    fn test_first_scan_two_hours_late_creates_half_day() {
        // 10:05 is 125 minutes past the 08:00 session start.
        let d = decide(at(10, 5, 0), &schedule(), None);
        assert_eq!(
            d,
            Decision::Create {
                slot: PunchSlot::AmIn,
                status: AttendanceStatus::HalfDay,
                late_for_pm: false,
            }
        );
    }

    #[test]
    fn test_second_scan_after_am_end_closes_morning() {
        let mut r = base_record();
        r.am_in = Some(at(7, 58, 0));
        // 12:01 is in the lunch gap, which still closes the open morning.
        let d = decide(at(12, 1, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 42,
                slot: PunchSlot::AmOut,
                new_status: None,
                work_hours: None,
            }
        );
    }

    #[test]
    fn test_open_morning_in_afternoon_skips_to_pm_in() {
        let mut r = base_record();
        r.am_in = Some(at(8, 0, 0));
        let d = decide(at(13, 30, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 42,
                slot: PunchSlot::PmIn,
                new_status: None,
                work_hours: None,
            },
            "a skipped AM out must not block the afternoon in-punch"
        );
    }

    #[test]
    fn test_on_time_pm_return_keeps_status() {
        let mut r = base_record();
        r.am_in = Some(at(7, 58, 0));
        r.am_out = Some(at(12, 1, 0));
        let d = decide(at(13, 5, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 42,
                slot: PunchSlot::PmIn,
                new_status: None,
                work_hours: None,
            }
        );
    }

    #[test]
    fn test_late_pm_return_escalates_to_late() {
        let mut r = base_record();
        r.am_in = Some(at(7, 58, 0));
        r.am_out = Some(at(12, 1, 0));
        let d = decide(at(13, 30, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 42,
                slot: PunchSlot::PmIn,
                new_status: Some(AttendanceStatus::Late),
                work_hours: None,
            }
        );
    }

    #[test]
    fn test_very_late_pm_return_still_caps_at_late() {
        let mut r = base_record();
        r.am_in = Some(at(7, 58, 0));
        r.am_out = Some(at(12, 1, 0));
        // 15:30 is 150 minutes past the 13:00 session start, but a worked
        // morning keeps the day from dropping to half.
        let d = decide(at(15, 30, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 42,
                slot: PunchSlot::PmIn,
                new_status: Some(AttendanceStatus::Late),
                work_hours: None,
            }
        );
    }

    #[test]
    fn test_half_day_status_survives_late_pm_return() {
        let mut r = base_record();
        r.am_in = Some(at(10, 30, 0));
        r.am_out = Some(at(12, 0, 0));
        r.status = AttendanceStatus::HalfDay;
        let d = decide(at(13, 30, 0), &schedule(), Some(&r));
        match d {
            Decision::Punch { new_status, .. } => {
                assert_eq!(new_status, None, "the ratchet must never move down")
            }
            other => panic!("expected a punch, got {:?}", other),
        }
    }

    #[test]
    fn test_closing_punch_sums_both_sessions() {
        let mut r = base_record();
        r.am_in = Some(at(7, 58, 0));
        r.am_out = Some(at(12, 1, 0));
        r.pm_in = Some(at(13, 5, 0));
        // 4h03m in the morning plus 4h05m in the afternoon.
        let d = decide(at(17, 10, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 42,
                slot: PunchSlot::PmOut,
                new_status: None,
                work_hours: Some(8.13),
            }
        );
    }

    #[test]
    fn test_closing_punch_without_morning_pair_counts_afternoon_only() {
        let mut r = base_record();
        r.pm_in = Some(at(12, 30, 0));
        r.status = AttendanceStatus::HalfDay;
        let d = decide(at(17, 0, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 42,
                slot: PunchSlot::PmOut,
                new_status: None,
                work_hours: Some(4.5),
            }
        );
    }

    #[test]
    fn test_fifth_scan_is_already_complete() {
        let mut r = base_record();
        r.am_in = Some(at(7, 58, 0));
        r.am_out = Some(at(12, 1, 0));
        r.pm_in = Some(at(13, 5, 0));
        r.pm_out = Some(at(17, 10, 0));
        let d = decide(at(17, 30, 0), &schedule(), Some(&r));
        assert_eq!(d, Decision::AlreadyComplete);
    }

    #[test]
    fn test_lunch_gap_first_scan_creates_half_day_pm_in() {
        let d = decide(at(12, 30, 0), &schedule(), None);
        assert_eq!(
            d,
            Decision::Create {
                slot: PunchSlot::PmIn,
                status: AttendanceStatus::HalfDay,
                late_for_pm: false,
            },
            "a missed morning is a half day even when the PM arrival is early"
        );
    }

    #[test]
    fn test_afternoon_first_scan_past_grace_flags_pm_lateness() {
        let d = decide(at(13, 20, 0), &schedule(), None);
        assert_eq!(
            d,
            Decision::Create {
                slot: PunchSlot::PmIn,
                status: AttendanceStatus::HalfDay,
                late_for_pm: true,
            }
        );
    }

    #[test]
    fn test_seeded_absent_row_takes_morning_punch_in_place() {
        let mut r = base_record();
        r.status = AttendanceStatus::Absent;
        let d = decide(at(8, 5, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 42,
                slot: PunchSlot::AmIn,
                new_status: Some(AttendanceStatus::Present),
                work_hours: None,
            },
            "the absent placeholder is replaced, not compared"
        );
    }

    #[test]
    fn test_seeded_absent_row_afternoon_punch_is_half_day() {
        let mut r = base_record();
        r.status = AttendanceStatus::Absent;
        let d = decide(at(14, 0, 0), &schedule(), Some(&r));
        assert_eq!(
            d,
            Decision::Punch {
                record_id: 42,
                slot: PunchSlot::PmIn,
                new_status: Some(AttendanceStatus::HalfDay),
                work_hours: None,
            }
        );
    }
}
