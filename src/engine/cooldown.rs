use crate::model::attendance::AttendanceRecord;
use crate::model::shift::ShiftType;
use chrono::NaiveDateTime;

/// Minimum seconds between two accepted scans for the same employee and
/// shift. Soaks up double-fires from the kiosk camera reading one badge
/// several times in a row.
pub const SCAN_COOLDOWN_SECONDS: i64 = 3;

/// Most recent punch on the record for the given shift. Punches land in a
/// fixed order, so the first filled slot walking backwards is the latest.
pub fn last_punch(record: &AttendanceRecord, shift: ShiftType) -> Option<NaiveDateTime> {
    match shift {
        ShiftType::Night => record.night_out.or(record.night_in),
        ShiftType::Day => record
            .pm_out
            .or(record.pm_in)
            .or(record.am_out)
            .or(record.am_in),
    }
}

/// Returns how many whole seconds the caller still has to wait, or `None`
/// when the scan may proceed. Pure wall-clock delta, evaluated before any
/// state machine runs.
pub fn check(record: &AttendanceRecord, shift: ShiftType, now: NaiveDateTime) -> Option<u64> {
    let last = last_punch(record, shift)?;
    let elapsed_ms = (now - last).num_milliseconds();
    if elapsed_ms >= SCAN_COOLDOWN_SECONDS * 1000 {
        return None;
    }

    let wait = ((SCAN_COOLDOWN_SECONDS * 1000 - elapsed_ms) as f64 / 1000.0).ceil() as u64;
    Some(wait)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shift::AttendanceStatus;
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
    fn test_rescan_inside_window_is_rejected() {
        let mut rec = record();
        rec.am_in = Some(at(8, 0, 0));

        let wait = check(&rec, ShiftType::Day, at(8, 0, 1));
        assert_eq!(wait, Some(2), "one elapsed second leaves two to wait");

        let immediate = check(&rec, ShiftType::Day, at(8, 0, 0));
        assert_eq!(immediate, Some(3));
    }

    #[test]
    fn test_scan_after_window_passes() {
        let mut rec = record();
        rec.am_in = Some(at(8, 0, 0));

        assert_eq!(check(&rec, ShiftType::Day, at(8, 0, 3)), None);
        assert_eq!(check(&rec, ShiftType::Day, at(9, 30, 0)), None);
    }

    #[test]
    fn test_latest_punch_wins() {
        let mut rec = record();
        rec.am_in = Some(at(8, 0, 0));
        rec.am_out = Some(at(12, 0, 0));
        rec.pm_in = Some(at(13, 0, 0));

        assert_eq!(last_punch(&rec, ShiftType::Day), Some(at(13, 0, 0)));
        assert_eq!(
            check(&rec, ShiftType::Day, at(13, 0, 2)),
            Some(1),
            "cooldown counts from the pm_in punch, not the morning ones"
        );
    }

    #[test]
    fn test_night_shift_only_looks_at_night_slots() {
        let mut rec = record();
        rec.shift_type = ShiftType::Night;
        rec.night_in = Some(at(22, 0, 0));

        assert_eq!(last_punch(&rec, ShiftType::Night), Some(at(22, 0, 0)));
        assert_eq!(check(&rec, ShiftType::Night, at(22, 0, 1)), Some(2));

        rec.night_out = Some(at(23, 59, 59));
        assert_eq!(last_punch(&rec, ShiftType::Night), Some(at(23, 59, 59)));
    }

    #[test]
    fn test_record_without_punches_has_no_cooldown() {
        let rec = record();
        assert_eq!(check(&rec, ShiftType::Day, at(8, 0, 0)), None);
    }
}
