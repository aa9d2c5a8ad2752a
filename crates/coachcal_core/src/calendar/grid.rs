//! Grid cells for week and month views.

use super::range::{month_days, week_days};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One calendar day rendered as a grid cell.
///
/// Derived from a reference date; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    /// `false` for month-view padding days from adjacent months.
    pub in_current_period: bool,
    pub is_today: bool,
}

/// Seven cells for the week containing `reference`.
pub fn week_cells(reference: NaiveDateTime, now: NaiveDateTime) -> Vec<DayCell> {
    let today = now.date();
    week_days(reference)
        .into_iter()
        .map(|date| DayCell {
            date,
            in_current_period: true,
            is_today: date == today,
        })
        .collect()
}

/// Whole-week cells covering the month containing `reference`.
pub fn month_cells(reference: NaiveDateTime, now: NaiveDateTime) -> Vec<DayCell> {
    let today = now.date();
    let (year, month) = (reference.year(), reference.month());
    month_days(reference)
        .into_iter()
        .map(|date| DayCell {
            date,
            in_current_period: date.year() == year && date.month() == month,
            is_today: date == today,
        })
        .collect()
}
