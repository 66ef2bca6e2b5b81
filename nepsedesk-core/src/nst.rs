//! Nepal Standard Time — every "today"/"daily" decision on the desk uses
//! NST (UTC+5:45), derived from UTC, never from the machine's local zone.
//!
//! The pure functions take a `DateTime<Utc>` so daily boundaries are
//! testable; `now_*` wrappers read the wall clock for callers.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};

const NST_OFFSET_SECS: i32 = 5 * 3600 + 45 * 60;

/// Market session bounds, minutes after NST midnight (11:00–15:00).
const SESSION_OPEN_MIN: u32 = 11 * 60;
const SESSION_CLOSE_MIN: u32 = 15 * 60;

pub fn nst_offset() -> FixedOffset {
    FixedOffset::east_opt(NST_OFFSET_SECS).expect("NST offset is in range")
}

/// Convert a UTC instant to NST.
pub fn to_nst(utc: DateTime<Utc>) -> DateTime<FixedOffset> {
    nst_offset().from_utc_datetime(&utc.naive_utc())
}

/// The NST calendar date containing a UTC instant.
pub fn today_nst(utc: DateTime<Utc>) -> NaiveDate {
    to_nst(utc).date_naive()
}

/// NST wall-clock time as `HH:MM:SS`.
pub fn nst_time_string(utc: DateTime<Utc>) -> String {
    to_nst(utc).format("%H:%M:%S").to_string()
}

/// NEPSE trades Sunday through Thursday, 11:00–15:00 NST.
pub fn is_market_open(utc: DateTime<Utc>) -> bool {
    let nst = to_nst(utc);
    let is_trading_day = nst.weekday().num_days_from_sunday() <= 4;
    let minutes = nst.hour() * 60 + nst.minute();
    is_trading_day && (SESSION_OPEN_MIN..SESSION_CLOSE_MIN).contains(&minutes)
}

/// Sunday in NST triggers the weekly review.
pub fn is_sunday(utc: DateTime<Utc>) -> bool {
    to_nst(utc).weekday().num_days_from_sunday() == 0
}

// ─── Wall-clock wrappers ─────────────────────────────────────────────

pub fn now_today_nst() -> NaiveDate {
    today_nst(Utc::now())
}

pub fn now_nst_time_string() -> String {
    nst_time_string(Utc::now())
}

pub fn now_market_open() -> bool {
    is_market_open(Utc::now())
}

pub fn now_is_sunday() -> bool {
    is_sunday(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn nst_is_utc_plus_5_45() {
        // 2024-06-02 18:30 UTC = 2024-06-03 00:15 NST
        let t = utc(2024, 6, 2, 18, 30);
        assert_eq!(nst_time_string(t), "00:15:00");
        assert_eq!(today_nst(t), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn date_rolls_at_nst_midnight_not_utc() {
        // 18:14 UTC is still 23:59 NST of the same day
        let before = utc(2024, 6, 2, 18, 14);
        let after = utc(2024, 6, 2, 18, 16);
        assert_eq!(today_nst(before), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(today_nst(after), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn market_open_sunday_session() {
        // 2024-06-02 is a Sunday. 11:00 NST = 05:15 UTC.
        assert!(is_market_open(utc(2024, 6, 2, 5, 15)));
        // 10:59 NST is pre-open
        assert!(!is_market_open(utc(2024, 6, 2, 5, 14)));
        // 15:00 NST = 09:15 UTC is post-close
        assert!(!is_market_open(utc(2024, 6, 2, 9, 15)));
        assert!(is_market_open(utc(2024, 6, 2, 9, 14)));
    }

    #[test]
    fn market_closed_friday_and_saturday() {
        // 2024-06-07 is a Friday, 2024-06-08 a Saturday; mid-session time.
        assert!(!is_market_open(utc(2024, 6, 7, 6, 0)));
        assert!(!is_market_open(utc(2024, 6, 8, 6, 0)));
        // Thursday 2024-06-06 is a trading day
        assert!(is_market_open(utc(2024, 6, 6, 6, 0)));
    }

    #[test]
    fn sunday_detection_in_nst() {
        // Saturday 18:30 UTC is already Sunday 00:15 NST
        assert!(is_sunday(utc(2024, 6, 1, 18, 30)));
        assert!(!is_sunday(utc(2024, 6, 1, 12, 0)));
    }
}
