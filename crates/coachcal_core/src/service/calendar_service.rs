//! Calendar view service.
//!
//! # Responsibility
//! - Load the sessions a day, week or month view needs from the repository.
//! - Run calendar layout against an injected clock and hour band.
//! - Return owned view models the shell can render directly.
//!
//! # Invariants
//! - Sessions outside the hour band are returned per column, never dropped.
//! - The hour band is validated once at construction.

use crate::calendar::format::{format_date, format_day_of_week, format_month_year};
use crate::calendar::grid::DayCell;
use crate::calendar::placement::{
    layout_day, layout_month, layout_week, DayColumn, HourBand, PlacementError, SlotPosition,
};
use crate::calendar::range::{
    end_of_day, is_today, month_end, month_start, start_of_day, week_end, week_start, DateRange,
    Period,
};
use crate::clock::Clock;
use crate::model::session::Session;
use crate::repo::session_repo::{SessionListQuery, SessionRepository};
use crate::repo::RepoError;
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for calendar use-cases.
#[derive(Debug)]
pub enum CalendarServiceError {
    Placement(PlacementError),
    Repo(RepoError),
}

impl Display for CalendarServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Placement(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CalendarServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Placement(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<PlacementError> for CalendarServiceError {
    fn from(value: PlacementError) -> Self {
        Self::Placement(value)
    }
}

impl From<RepoError> for CalendarServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type CalendarServiceResult<T> = Result<T, CalendarServiceError>;

/// A session positioned inside a week column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionBlock {
    pub session: Session,
    pub slot: SlotPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekColumnView {
    pub cell: DayCell,
    pub blocks: Vec<SessionBlock>,
    /// Sessions that start before or after the displayed hours.
    pub outside_band: Vec<Session>,
    /// Sessions that could not be positioned at all.
    pub rejected: Vec<Session>,
}

/// Single-day agenda in the same column shape as a week view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    /// "Wed, Dec 11, 2024".
    pub title: String,
    pub band: HourBand,
    pub column: WeekColumnView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekView {
    /// "December 2024" for the week's reference month.
    pub title: String,
    pub range: DateRange,
    pub band: HourBand,
    pub columns: Vec<WeekColumnView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCellView {
    pub cell: DayCell,
    pub sessions: Vec<Session>,
    pub hidden_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthView {
    pub title: String,
    pub range: DateRange,
    pub cells: Vec<MonthCellView>,
}

/// Calendar facade over a session repository and a clock.
pub struct CalendarService<R: SessionRepository, C: Clock> {
    repo: R,
    clock: C,
    band: HourBand,
}

impl<R: SessionRepository, C: Clock> CalendarService<R, C> {
    /// Creates a service with the default 7 AM..7 PM band.
    pub fn new(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            band: HourBand::default(),
        }
    }

    /// Creates a service with a custom hour band.
    ///
    /// # Errors
    /// - `Placement` when the band is inverted or has a non-positive scale.
    pub fn with_band(repo: R, clock: C, band: HourBand) -> CalendarServiceResult<Self> {
        band.validate()?;
        Ok(Self { repo, clock, band })
    }

    pub fn band(&self) -> &HourBand {
        &self.band
    }

    /// Sessions whose start falls inside `period` around `reference`.
    pub fn visible_sessions(
        &self,
        period: Period,
        reference: NaiveDateTime,
    ) -> CalendarServiceResult<Vec<Session>> {
        let range = period.bounds(reference);
        Ok(self.repo.list_sessions(&SessionListQuery::in_range(range))?)
    }

    pub fn week_view(&self, reference: NaiveDateTime) -> CalendarServiceResult<WeekView> {
        let now = self.clock.now();
        let range = Period::Week.bounds(reference);
        let sessions = self.repo.list_sessions(&SessionListQuery::in_range(range))?;
        let layout = layout_week(reference, now, &sessions, &self.band)?;

        let outside = layout.outside_band_count();
        let rejected = layout.rejected_count();
        if outside > 0 || rejected > 0 {
            warn!(
                "event=week_view module=service status=partial outside_band={} rejected={}",
                outside, rejected
            );
        }

        let columns = layout.columns.into_iter().map(column_view).collect();

        info!(
            "event=week_view module=service status=ok sessions={}",
            sessions.len()
        );
        Ok(WeekView {
            title: format_month_year(reference),
            range,
            band: self.band,
            columns,
        })
    }

    pub fn day_view(&self, date: NaiveDate) -> CalendarServiceResult<DayView> {
        let now = self.clock.now();
        let range = DateRange::new(start_of_day(date), end_of_day(date));
        let sessions = self.repo.list_sessions(&SessionListQuery::in_range(range))?;
        let cell = DayCell {
            date,
            in_current_period: true,
            is_today: is_today(range.start, now),
        };
        let column = layout_day(cell, &sessions, &self.band)?;

        if !column.outside_band.is_empty() || !column.rejected.is_empty() {
            warn!(
                "event=day_view module=service status=partial outside_band={} rejected={}",
                column.outside_band.len(),
                column.rejected.len()
            );
        }
        info!(
            "event=day_view module=service status=ok date={} sessions={}",
            date,
            sessions.len()
        );
        Ok(DayView {
            title: format!("{}, {}", format_day_of_week(date), format_date(date)),
            band: self.band,
            column: column_view(column),
        })
    }

    /// Month grid including padding days; padding cells list their sessions too.
    pub fn month_view(&self, reference: NaiveDateTime) -> CalendarServiceResult<MonthView> {
        let now = self.clock.now();
        let grid_range = DateRange::new(
            week_start(month_start(reference)),
            week_end(month_end(reference)),
        );
        let sessions = self
            .repo
            .list_sessions(&SessionListQuery::in_range(grid_range))?;

        let cells = layout_month(reference, now, &sessions)
            .into_iter()
            .map(|cell| MonthCellView {
                cell: cell.cell,
                sessions: cell.visible.into_iter().cloned().collect(),
                hidden_count: cell.hidden_count,
            })
            .collect();

        info!(
            "event=month_view module=service status=ok sessions={}",
            sessions.len()
        );
        Ok(MonthView {
            title: format_month_year(reference),
            range: Period::Month.bounds(reference),
            cells,
        })
    }
}

fn column_view(column: DayColumn<'_, Session>) -> WeekColumnView {
    WeekColumnView {
        cell: column.cell,
        blocks: column
            .positioned
            .into_iter()
            .map(|entry| SessionBlock {
                session: entry.entity.clone(),
                slot: entry.slot,
            })
            .collect(),
        outside_band: column.outside_band.into_iter().cloned().collect(),
        rejected: column
            .rejected
            .into_iter()
            .map(|entry| entry.entity.clone())
            .collect(),
    }
}
