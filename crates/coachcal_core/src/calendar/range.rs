//! Week/month boundary math and day enumeration.
//!
//! # Responsibility
//! - Convert a reference instant into period boundaries.
//! - Enumerate the calendar days a week or month grid displays.
//! - Answer same-day and relative-to-now predicates.
//!
//! # Invariants
//! - Weeks start on Sunday.
//! - Period starts are at 00:00:00.000, ends at 23:59:59.999.
//! - Every function is pure; "now" is always an explicit argument.
//! - Comparisons use local wall-clock fields only.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

const DAYS_PER_WEEK: i64 = 7;
const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Inclusive instant window `[start, end]` produced by period math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Returns whether `instant` lies within both bounds (inclusive).
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Calendar window kind shown by a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    Month,
}

impl Period {
    /// Returns the inclusive boundaries of the period containing `reference`.
    pub fn bounds(self, reference: NaiveDateTime) -> DateRange {
        match self {
            Self::Week => DateRange::new(week_start(reference), week_end(reference)),
            Self::Month => DateRange::new(month_start(reference), month_end(reference)),
        }
    }

    /// Moves `reference` by `steps` periods (negative goes back).
    ///
    /// Month steps keep the day-of-month, clamped to the target month's
    /// length (Jan 31 + 1 month = Feb 28/29).
    pub fn shift(self, reference: NaiveDateTime, steps: i32) -> NaiveDateTime {
        match self {
            Self::Week => reference
                .checked_add_signed(Duration::weeks(i64::from(steps)))
                .unwrap_or(reference),
            Self::Month => {
                let months = Months::new(steps.unsigned_abs());
                let shifted = if steps >= 0 {
                    reference.checked_add_months(months)
                } else {
                    reference.checked_sub_months(months)
                };
                shifted.unwrap_or(reference)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable millisecond of `date` (23:59:59.999).
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::milliseconds(MILLIS_PER_DAY - 1)
}

/// Sunday 00:00:00.000 of the week containing `instant`.
pub fn week_start(instant: NaiveDateTime) -> NaiveDateTime {
    start_of_day(sunday_on_or_before(instant.date()))
}

/// Saturday 23:59:59.999 of the week containing `instant`.
pub fn week_end(instant: NaiveDateTime) -> NaiveDateTime {
    end_of_day(sunday_on_or_before(instant.date()) + Duration::days(DAYS_PER_WEEK - 1))
}

/// First day of the month containing `instant`, at midnight.
pub fn month_start(instant: NaiveDateTime) -> NaiveDateTime {
    start_of_day(first_of_month(instant.date()))
}

/// Last day of the month containing `instant`, at 23:59:59.999.
pub fn month_end(instant: NaiveDateTime) -> NaiveDateTime {
    end_of_day(last_of_month(instant.date()))
}

/// The 7 days of the week containing `instant`, Sunday first.
pub fn week_days(instant: NaiveDateTime) -> Vec<NaiveDate> {
    sunday_on_or_before(instant.date())
        .iter_days()
        .take(DAYS_PER_WEEK as usize)
        .collect()
}

/// Whole weeks covering the month containing `instant`.
///
/// Leading and trailing days belong to the adjacent months; callers tell
/// them apart by comparing `month()` with the reference month.
pub fn month_days(instant: NaiveDateTime) -> Vec<NaiveDate> {
    let first_cell = sunday_on_or_before(first_of_month(instant.date()));
    let last_cell =
        sunday_on_or_before(last_of_month(instant.date())) + Duration::days(DAYS_PER_WEEK - 1);

    first_cell
        .iter_days()
        .take_while(|day| *day <= last_cell)
        .collect()
}

/// Year, month and day-of-month match; time-of-day is ignored.
pub fn is_same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

pub fn is_today(instant: NaiveDateTime, now: NaiveDateTime) -> bool {
    is_same_day(instant, now)
}

pub fn is_past(instant: NaiveDateTime, now: NaiveDateTime) -> bool {
    instant < now
}

pub fn is_future(instant: NaiveDateTime, now: NaiveDateTime) -> bool {
    instant > now
}

/// Half-open `[week_start(now), week_start(now) + 7 days)`.
pub fn is_this_week(instant: NaiveDateTime, now: NaiveDateTime) -> bool {
    let start = week_start(now);
    let end = start + Duration::days(DAYS_PER_WEEK);
    start <= instant && instant < end
}

fn sunday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next_month| next_month.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn every_day_of(year: i32) -> impl Iterator<Item = NaiveDateTime> {
        date(year, 1, 1)
            .iter_days()
            .take_while(move |day| day.year() == year)
            .map(|day| day.and_hms_opt(13, 45, 0).unwrap())
    }

    #[test]
    fn week_bounds_for_mid_week_reference() {
        let reference = at(2024, 12, 11, 15, 20);

        assert_eq!(week_start(reference), at(2024, 12, 8, 0, 0));
        let end = week_end(reference);
        assert_eq!(end.date(), date(2024, 12, 14));
        assert_eq!(
            (end.hour(), end.minute(), end.second()),
            (23, 59, 59)
        );
        assert_eq!(end.and_utc().timestamp_subsec_millis(), 999);
    }

    #[test]
    fn week_start_on_sunday_is_same_day() {
        assert_eq!(week_start(at(2024, 12, 1, 8, 0)), at(2024, 12, 1, 0, 0));
    }

    #[test]
    fn week_start_is_idempotent_and_always_sunday() {
        for day in every_day_of(2024) {
            let start = week_start(day);
            assert_eq!(start.weekday(), Weekday::Sun);
            assert_eq!(week_start(start), start);
            assert!(!is_same_day(start, week_end(day)));
        }
    }

    #[test]
    fn week_days_has_seven_consecutive_days() {
        for day in every_day_of(2025) {
            let days = week_days(day);
            assert_eq!(days.len(), 7);
            assert_eq!(start_of_day(days[0]), week_start(day));
            for pair in days.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
        }
    }

    #[test]
    fn month_days_cover_whole_weeks_and_entire_month() {
        for day in every_day_of(2024) {
            let days = month_days(day);
            assert_eq!(days.len() % 7, 0);
            assert_eq!(days[0].weekday(), Weekday::Sun);
            assert_eq!(days[days.len() - 1].weekday(), Weekday::Sat);

            let mut cursor = month_start(day).date();
            let last = month_end(day).date();
            while cursor <= last {
                assert!(days.contains(&cursor), "{cursor} missing from grid");
                cursor = cursor.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn month_days_without_leading_padding_when_first_is_sunday() {
        let days = month_days(at(2024, 12, 1, 0, 0));

        assert_eq!(days.first(), Some(&date(2024, 12, 1)));
        // Dec 31 2024 is a Tuesday; its week closes on Jan 4 2025.
        assert_eq!(days.last(), Some(&date(2025, 1, 4)));
        assert_eq!(days.len(), 35);
    }

    #[test]
    fn month_bounds_handle_leap_february() {
        let reference = at(2024, 2, 10, 12, 0);

        assert_eq!(month_start(reference), at(2024, 2, 1, 0, 0));
        assert_eq!(month_end(reference).date(), date(2024, 2, 29));
        assert_eq!(month_end(at(2023, 2, 10, 12, 0)).date(), date(2023, 2, 28));
        assert_eq!(month_end(at(2024, 12, 31, 23, 0)).date(), date(2024, 12, 31));
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        assert!(is_same_day(at(2024, 12, 11, 0, 0), at(2024, 12, 11, 23, 59)));
        assert!(!is_same_day(at(2024, 12, 11, 23, 59), at(2024, 12, 12, 0, 0)));
        assert!(is_today(at(2024, 12, 11, 7, 0), at(2024, 12, 11, 18, 0)));
    }

    #[test]
    fn relative_predicates_use_explicit_now() {
        let now = at(2024, 12, 11, 12, 0);

        assert!(is_past(at(2024, 12, 11, 11, 59), now));
        assert!(is_future(at(2024, 12, 11, 12, 1), now));
        assert!(!is_past(now, now));
        assert!(!is_future(now, now));

        assert!(is_this_week(at(2024, 12, 8, 0, 0), now));
        assert!(is_this_week(at(2024, 12, 14, 23, 59), now));
        assert!(!is_this_week(at(2024, 12, 15, 0, 0), now));
        assert!(!is_this_week(at(2024, 12, 7, 23, 59), now));
    }

    #[test]
    fn period_bounds_are_inclusive() {
        let week = Period::Week.bounds(at(2024, 12, 11, 9, 0));
        assert!(week.contains(at(2024, 12, 14, 23, 0)));
        assert!(!week.contains(at(2024, 12, 15, 0, 0)));
        assert!(week.contains(week.end));

        let month = Period::Month.bounds(at(2024, 12, 11, 9, 0));
        assert_eq!(month.start, at(2024, 12, 1, 0, 0));
        assert!(month.contains(at(2024, 12, 31, 23, 59)));
        assert!(!month.contains(at(2025, 1, 1, 0, 0)));
    }

    #[test]
    fn period_shift_moves_by_whole_periods() {
        let reference = at(2024, 1, 31, 10, 0);

        assert_eq!(Period::Week.shift(reference, 1), at(2024, 2, 7, 10, 0));
        assert_eq!(Period::Week.shift(reference, -1), at(2024, 1, 24, 10, 0));
        assert_eq!(Period::Month.shift(reference, 1), at(2024, 2, 29, 10, 0));
        assert_eq!(Period::Month.shift(reference, -2), at(2023, 11, 30, 10, 0));
        assert_eq!(Period::Month.shift(reference, 0), reference);
    }

    #[test]
    fn period_parse_accepts_known_names() {
        assert_eq!(Period::parse(" Week "), Some(Period::Week));
        assert_eq!(Period::parse("month"), Some(Period::Month));
        assert_eq!(Period::parse("day"), None);
        assert_eq!(Period::Month.as_str(), "month");
    }
}
