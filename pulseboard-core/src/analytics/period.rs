//! Period windows for period-over-period comparison.
//!
//! Boundaries are computed on local calendar dates in the anchor's timezone
//! and localized afterwards, so a week is always Monday 00:00 through Sunday
//! 23:59:59.999 wall-clock time and a month always follows calendar length.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone,
    Utc,
};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::PeriodType;

/// A current window and the window it is compared against (inclusive bounds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodWindow {
    pub period_type: PeriodType,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub prev_start: DateTime<FixedOffset>,
    pub prev_end: DateTime<FixedOffset>,
}

impl PeriodWindow {
    /// Whether an instant falls inside the current window.
    pub fn contains_current(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts <= self.end
    }

    /// Get display name for the current window (e.g., "2024-03-11 – 2024-03-17").
    pub fn display_name(&self) -> String {
        match self.period_type {
            PeriodType::Monthly => self.start.format("%B %Y").to_string(),
            _ => format!(
                "{} – {}",
                self.start.format("%Y-%m-%d"),
                self.end.format("%Y-%m-%d")
            ),
        }
    }
}

/// Resolve the canonical window pair for an anchor instant.
///
/// The timezone carried by `anchor` defines the calendar. DAILY has no
/// window of its own and yields [`Error::UnsupportedPeriod`].
pub fn resolve<Tz: TimeZone>(anchor: &DateTime<Tz>, period_type: PeriodType) -> Result<PeriodWindow> {
    resolve_date(anchor.date_naive(), &anchor.timezone(), period_type)
}

/// Resolve the window pair for a calendar date in the given timezone.
pub fn resolve_date<Tz: TimeZone>(
    anchor: NaiveDate,
    tz: &Tz,
    period_type: PeriodType,
) -> Result<PeriodWindow> {
    let (start, next_start, prev_start) = match period_type {
        PeriodType::Weekly => {
            let offset = anchor.weekday().num_days_from_monday() as i64;
            let start = shift_days(anchor, -offset)?;
            (start, shift_days(start, 7)?, shift_days(start, -7)?)
        }
        PeriodType::Monthly => {
            let start = first_of_month(anchor.year(), anchor.month())?;
            let (next_year, next_month) = if anchor.month() == 12 {
                (anchor.year() + 1, 1)
            } else {
                (anchor.year(), anchor.month() + 1)
            };
            let (prev_year, prev_month) = if anchor.month() == 1 {
                (anchor.year() - 1, 12)
            } else {
                (anchor.year(), anchor.month() - 1)
            };
            (
                start,
                first_of_month(next_year, next_month)?,
                first_of_month(prev_year, prev_month)?,
            )
        }
        PeriodType::Daily => return Err(Error::UnsupportedPeriod(period_type)),
    };

    let window = PeriodWindow {
        period_type,
        start: local_midnight(tz, start),
        end: last_instant_before(tz, next_start),
        prev_start: local_midnight(tz, prev_start),
        prev_end: last_instant_before(tz, start),
    };

    tracing::debug!(
        period = %period_type,
        start = %window.start,
        end = %window.end,
        prev_start = %window.prev_start,
        prev_end = %window.prev_end,
        "Resolved period window"
    );

    Ok(window)
}

fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| Error::InvalidAnchor(format!("{} shifted by {} days", date, days)))
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::InvalidAnchor(format!("{}-{:02}", year, month)))
}

/// First valid instant of `date` in `tz`.
///
/// Ambiguous midnights take the earlier instant; midnights skipped by a DST
/// jump fall forward to the first valid hour.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<FixedOffset> {
    let midnight: NaiveDateTime = date.and_time(chrono::NaiveTime::MIN);
    let localized = (0..=3)
        .map(|hours| tz.from_local_datetime(&(midnight + Duration::hours(hours))))
        .find_map(|result| match result {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => None,
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight));
    localized.fixed_offset()
}

fn last_instant_before<Tz: TimeZone>(tz: &Tz, next_date: NaiveDate) -> DateTime<FixedOffset> {
    local_midnight(tz, next_date) - Duration::milliseconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_window_from_thursday() {
        let window = resolve_date(date(2024, 3, 14), &Utc, PeriodType::Weekly).unwrap();
        assert_eq!(window.start.date_naive(), date(2024, 3, 11));
        assert_eq!(window.end.date_naive(), date(2024, 3, 17));
        assert_eq!(window.prev_start.date_naive(), date(2024, 3, 4));
        assert_eq!(window.prev_end.date_naive(), date(2024, 3, 10));

        assert_eq!(window.start.hour(), 0);
        assert_eq!(
            (window.end.hour(), window.end.minute(), window.end.second()),
            (23, 59, 59)
        );
        assert_eq!(window.end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_weekly_window_on_monday_and_sunday() {
        let monday = resolve_date(date(2024, 3, 11), &Utc, PeriodType::Weekly).unwrap();
        let sunday = resolve_date(date(2024, 3, 17), &Utc, PeriodType::Weekly).unwrap();
        assert_eq!(monday, sunday);
    }

    #[test]
    fn test_weekly_window_across_year_boundary() {
        let window = resolve_date(date(2025, 1, 1), &Utc, PeriodType::Weekly).unwrap();
        assert_eq!(window.start.date_naive(), date(2024, 12, 30));
        assert_eq!(window.end.date_naive(), date(2025, 1, 5));
        assert_eq!(window.prev_start.date_naive(), date(2024, 12, 23));
    }

    #[test]
    fn test_monthly_window_respects_month_length() {
        let window = resolve_date(date(2024, 3, 31), &Utc, PeriodType::Monthly).unwrap();
        assert_eq!(window.start.date_naive(), date(2024, 3, 1));
        assert_eq!(window.end.date_naive(), date(2024, 3, 31));
        // Leap-year February
        assert_eq!(window.prev_start.date_naive(), date(2024, 2, 1));
        assert_eq!(window.prev_end.date_naive(), date(2024, 2, 29));
    }

    #[test]
    fn test_monthly_window_in_january() {
        let window = resolve_date(date(2024, 1, 15), &Utc, PeriodType::Monthly).unwrap();
        assert_eq!(window.prev_start.date_naive(), date(2023, 12, 1));
        assert_eq!(window.prev_end.date_naive(), date(2023, 12, 31));
        assert_eq!(window.display_name(), "January 2024");
    }

    #[test]
    fn test_anchor_timezone_is_kept() {
        let anchor = chrono_tz::Asia::Seoul
            .with_ymd_and_hms(2024, 3, 14, 8, 30, 0)
            .unwrap();
        let window = resolve(&anchor, PeriodType::Weekly).unwrap();
        assert_eq!(window.start.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(window.start.date_naive(), date(2024, 3, 11));
        // Seoul midnight is 15:00 UTC the previous day
        let start_utc = window.start.with_timezone(&Utc);
        assert_eq!(start_utc.date_naive(), date(2024, 3, 10));
        assert_eq!(start_utc.hour(), 15);
    }

    #[test]
    fn test_dst_week_keeps_wall_clock_boundaries() {
        // US DST starts Sunday 2024-03-10
        let tz = chrono_tz::America::New_York;
        let window = resolve_date(date(2024, 3, 13), &tz, PeriodType::Weekly).unwrap();
        assert_eq!(window.prev_start.hour(), 0);
        assert_eq!(window.start.hour(), 0);
        assert_ne!(
            window.prev_start.offset().local_minus_utc(),
            window.start.offset().local_minus_utc()
        );
        // Seven calendar days, one hour short of 168
        assert_eq!(window.start - window.prev_start, Duration::hours(167));
    }

    #[test]
    fn test_contains() {
        let window = resolve_date(date(2024, 3, 14), &Utc, PeriodType::Weekly).unwrap();
        let inside = Utc.with_ymd_and_hms(2024, 3, 17, 23, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert!(window.contains_current(&inside));
        assert!(!window.contains_current(&before));
        assert!(before >= window.prev_start && before <= window.prev_end);
    }

    #[test]
    fn test_daily_is_rejected() {
        let err = resolve_date(date(2024, 3, 14), &Utc, PeriodType::Daily).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPeriod(PeriodType::Daily)));
    }
}
