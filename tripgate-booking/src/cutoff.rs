use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Default hotel check-in time used for the cut-off calculation.
const CHECKIN_HOUR: u32 = 14;
/// Bookings must be placed at least this many hours before check-in.
const MIN_HOURS_BEFORE_CHECKIN: f64 = 6.0;
/// Cut-off is evaluated against local market time (IST, UTC+5:30).
const IST_OFFSET_MINUTES: i64 = 5 * 60 + 30;

#[derive(Debug, Clone, PartialEq)]
pub enum CutoffCheck {
    Ok,
    /// Too close to check-in; carries the remaining hours, rounded to one
    /// decimal (may be negative once check-in has passed).
    CutoffReached { hours_remaining: f64 },
    /// Unparseable date: validation is skipped rather than blocking the booking.
    Skipped,
}

/// Validate the booking cut-off: at least 6 hours before the 14:00 check-in.
pub fn validate_booking_cutoff(checkin: &str, now_utc: DateTime<Utc>) -> CutoffCheck {
    let Ok(checkin_date) = NaiveDate::parse_from_str(checkin, "%Y-%m-%d") else {
        return CutoffCheck::Skipped;
    };
    let Some(checkin_dt) = checkin_date.and_hms_opt(CHECKIN_HOUR, 0, 0) else {
        return CutoffCheck::Skipped;
    };

    let local_now = now_utc.naive_utc() + Duration::minutes(IST_OFFSET_MINUTES);
    let hours_until_checkin = (checkin_dt - local_now).num_seconds() as f64 / 3600.0;

    if hours_until_checkin < MIN_HOURS_BEFORE_CHECKIN {
        CutoffCheck::CutoffReached {
            hours_remaining: (hours_until_checkin * 10.0).round() / 10.0,
        }
    } else {
        CutoffCheck::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_far_future_checkin_passes() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(validate_booking_cutoff("2026-02-10", now), CutoffCheck::Ok);
    }

    #[test]
    fn test_same_day_late_booking_blocked() {
        // 06:00 UTC = 11:30 IST; check-in at 14:00 IST leaves 2.5h < 6h
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 6, 0, 0).unwrap();
        assert_eq!(
            validate_booking_cutoff("2026-02-10", now),
            CutoffCheck::CutoffReached { hours_remaining: 2.5 }
        );
    }

    #[test]
    fn test_exactly_six_hours_passes() {
        // 02:30 UTC = 08:00 IST; exactly 6h before 14:00 IST
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 2, 30, 0).unwrap();
        assert_eq!(validate_booking_cutoff("2026-02-10", now), CutoffCheck::Ok);
    }

    #[test]
    fn test_past_checkin_reports_negative_hours() {
        let now = Utc.with_ymd_and_hms(2026, 2, 11, 12, 0, 0).unwrap();
        match validate_booking_cutoff("2026-02-10", now) {
            CutoffCheck::CutoffReached { hours_remaining } => assert!(hours_remaining < 0.0),
            other => panic!("expected cutoff, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_date_skips_validation() {
        let now = Utc::now();
        assert_eq!(validate_booking_cutoff("02/10/2026", now), CutoffCheck::Skipped);
        assert_eq!(validate_booking_cutoff("", now), CutoffCheck::Skipped);
    }
}
