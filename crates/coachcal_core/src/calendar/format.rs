//! Display strings for calendar headers, blocks and lists.
//!
//! All helpers are pure; relative formatting takes `now` explicitly.

use chrono::{NaiveDate, NaiveDateTime};

/// "45m", "2h" or "1h 30m".
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, mins) => format!("{mins}m"),
        (hours, 0) => format!("{hours}h"),
        (hours, mins) => format!("{hours}h {mins}m"),
    }
}

/// "2:00 PM".
pub fn format_time(instant: NaiveDateTime) -> String {
    instant.format("%-I:%M %p").to_string()
}

/// Hour-row label: "7 AM", "12 PM".
pub fn format_hour(hour: u32) -> String {
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        other => other,
    };
    format!("{display} {suffix}")
}

/// "Dec 10, 2024".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "Dec 10, 2024 at 2:00 PM".
pub fn format_date_time(instant: NaiveDateTime) -> String {
    format!("{} at {}", format_date(instant.date()), format_time(instant))
}

/// "December 2024".
pub fn format_month_year(instant: NaiveDateTime) -> String {
    instant.format("%B %Y").to_string()
}

/// "Wed".
pub fn format_day_of_week(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

/// Coarse relative label such as "in 5 minutes", "yesterday" or "3 weeks ago".
///
/// Each unit is rounded half-up from the unit below it, so thresholds
/// follow the chain minutes -> hours -> days -> weeks -> months.
pub fn format_relative_time(instant: NaiveDateTime, now: NaiveDateTime) -> String {
    let diff_secs = round_half_up((instant - now).num_milliseconds() as f64 / 1000.0);
    let diff_mins = round_half_up(diff_secs as f64 / 60.0);
    let diff_hours = round_half_up(diff_mins as f64 / 60.0);
    let diff_days = round_half_up(diff_hours as f64 / 24.0);
    let diff_weeks = round_half_up(diff_days as f64 / 7.0);
    let diff_months = round_half_up(diff_days as f64 / 30.0);

    if diff_mins.abs() < 1 {
        "just now".to_string()
    } else if diff_mins.abs() < 60 {
        relative_phrase(diff_mins, "minute")
    } else if diff_hours.abs() < 24 {
        relative_phrase(diff_hours, "hour")
    } else if diff_days.abs() < 7 {
        match diff_days {
            1 => "tomorrow".to_string(),
            -1 => "yesterday".to_string(),
            days => relative_phrase(days, "day"),
        }
    } else if diff_weeks.abs() < 4 {
        match diff_weeks {
            1 => "next week".to_string(),
            -1 => "last week".to_string(),
            weeks => relative_phrase(weeks, "week"),
        }
    } else {
        match diff_months {
            0 => "this month".to_string(),
            1 => "next month".to_string(),
            -1 => "last month".to_string(),
            months => relative_phrase(months, "month"),
        }
    }
}

fn relative_phrase(value: i64, unit: &str) -> String {
    let magnitude = value.unsigned_abs();
    let plural = if magnitude == 1 { "" } else { "s" };
    if value > 0 {
        format!("in {magnitude} {unit}{plural}")
    } else {
        format!("{magnitude} {unit}{plural} ago")
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
