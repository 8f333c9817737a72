use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

/// Shift family a scan belongs to. DAY runs the AM/PM two-session cycle,
/// NIGHT a single overnight session anchored to its start date.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftType {
    Day,
    Night,
}

impl Default for ShiftType {
    fn default() -> Self {
        ShiftType::Day
    }
}

/// Attendance verdict for one record, ordered by severity.
///
/// ABSENT is last but is not "worse than half-day" in the business sense: it
/// is the placeholder a record carries before any punch lands, so the
/// ratchet below replaces it outright.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
    Display,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Late,
    HalfDay,
    Absent,
}

impl AttendanceStatus {
    /// One-way severity ratchet: a status never improves once a worse one is
    /// on the record. The ABSENT placeholder is replaced by the first
    /// computed status instead of winning the comparison.
    pub fn ratchet(self, candidate: AttendanceStatus) -> AttendanceStatus {
        if self == AttendanceStatus::Absent {
            candidate
        } else {
            self.max(candidate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AttendanceStatus::*;

    #[test]
    fn ratchet_never_improves() {
        assert_eq!(Present.ratchet(Late), Late);
        assert_eq!(Late.ratchet(Present), Late);
        assert_eq!(HalfDay.ratchet(Late), HalfDay);
        assert_eq!(Late.ratchet(Late), Late);
    }

    #[test]
    fn ratchet_replaces_absent_placeholder() {
        assert_eq!(Absent.ratchet(Present), Present);
        assert_eq!(Absent.ratchet(HalfDay), HalfDay);
    }

    #[test]
    fn severity_order() {
        assert!(Present < Late);
        assert!(Late < HalfDay);
    }
}
