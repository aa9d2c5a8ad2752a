//! Visible-range filtering, day bucketing and week-column geometry.
//!
//! # Responsibility
//! - Select the timed entities a period or a day shows.
//! - Compute pixel offsets for entities inside the displayed hour band.
//! - Surface entities that cannot be positioned instead of dropping them.
//!
//! # Invariants
//! - Filters are stable: output keeps input order, no implicit sort.
//! - Range filtering uses inclusive bounds produced by `Period::bounds`.
//! - Entities starting outside `[start_hour, end_hour]` land in
//!   `outside_band`; zero-duration entities land in `rejected`.

use super::grid::{month_cells, week_cells, DayCell};
use super::range::DateRange;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// Max entries a month cell lists before collapsing into "+N more".
pub const MONTH_CELL_VISIBLE_LIMIT: usize = 3;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Any record with a single start instant and a duration.
pub trait TimedEntity {
    fn starts_at(&self) -> NaiveDateTime;
    fn duration_minutes(&self) -> u32;
}

/// Displayed hour range and vertical scale of a week/day column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourBand {
    /// First displayed hour (inclusive).
    pub start_hour: u32,
    /// Last displayed hour (inclusive).
    pub end_hour: u32,
    pub px_per_hour: f64,
    /// Floor for block height so short entries stay clickable.
    pub min_height_px: f64,
}

impl Default for HourBand {
    fn default() -> Self {
        Self {
            start_hour: 7,
            end_hour: 19,
            px_per_hour: 48.0,
            min_height_px: 24.0,
        }
    }
}

impl HourBand {
    pub fn validate(&self) -> Result<(), PlacementError> {
        if self.start_hour > self.end_hour || self.end_hour > 23 {
            return Err(PlacementError::InvalidHourBand {
                start_hour: self.start_hour,
                end_hour: self.end_hour,
            });
        }
        if !self.px_per_hour.is_finite() || self.px_per_hour <= 0.0 {
            return Err(PlacementError::InvalidScale("px_per_hour must be > 0"));
        }
        if !self.min_height_px.is_finite() || self.min_height_px < 0.0 {
            return Err(PlacementError::InvalidScale("min_height_px must be >= 0"));
        }
        Ok(())
    }

    pub fn hours(&self) -> RangeInclusive<u32> {
        self.start_hour..=self.end_hour
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        self.hours().contains(&hour)
    }

    /// Total pixel height of one column (one row per displayed hour).
    pub fn column_height_px(&self) -> f64 {
        f64::from(self.end_hour - self.start_hour + 1) * self.px_per_hour
    }
}

/// Errors raised while positioning entities.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementError {
    NonPositiveDuration { starts_at: NaiveDateTime },
    InvalidHourBand { start_hour: u32, end_hour: u32 },
    InvalidScale(&'static str),
}

impl Display for PlacementError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveDuration { starts_at } => {
                write!(f, "entry at {starts_at} has a non-positive duration")
            }
            Self::InvalidHourBand {
                start_hour,
                end_hour,
            } => write!(
                f,
                "invalid hour band {start_hour}..={end_hour}; expected start <= end <= 23"
            ),
            Self::InvalidScale(message) => write!(f, "invalid hour band scale: {message}"),
        }
    }
}

impl Error for PlacementError {}

/// Vertical geometry of one block inside a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotPosition {
    pub top_px: f64,
    pub height_px: f64,
}

/// Outcome of positioning one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Placement {
    InBand(SlotPosition),
    OutsideBand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEntry<'a, T> {
    pub entity: &'a T,
    pub slot: SlotPosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEntry<'a, T> {
    pub entity: &'a T,
    pub error: PlacementError,
}

/// One day column of a week view.
#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn<'a, T> {
    pub cell: DayCell,
    pub positioned: Vec<PositionedEntry<'a, T>>,
    /// Entries on this day whose start hour is outside the band.
    pub outside_band: Vec<&'a T>,
    pub rejected: Vec<RejectedEntry<'a, T>>,
}

impl<T> DayColumn<'_, T> {
    fn empty(cell: DayCell) -> Self {
        Self {
            cell,
            positioned: Vec::new(),
            outside_band: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekLayout<'a, T> {
    pub band: HourBand,
    pub columns: Vec<DayColumn<'a, T>>,
}

impl<T> WeekLayout<'_, T> {
    pub fn outside_band_count(&self) -> usize {
        self.columns.iter().map(|column| column.outside_band.len()).sum()
    }

    pub fn rejected_count(&self) -> usize {
        self.columns.iter().map(|column| column.rejected.len()).sum()
    }
}

/// One day cell of a month view.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCell<'a, T> {
    pub cell: DayCell,
    /// First `MONTH_CELL_VISIBLE_LIMIT` entries, input order.
    pub visible: Vec<&'a T>,
    /// Entries beyond the visible limit ("+N more").
    pub hidden_count: usize,
}

/// Entities whose start lies within `range` (inclusive), input order kept.
pub fn visible_in<'a, T: TimedEntity>(entities: &'a [T], range: &DateRange) -> Vec<&'a T> {
    entities
        .iter()
        .filter(|entity| range.contains(entity.starts_at()))
        .collect()
}

/// Entities starting on calendar day `day`, input order kept.
pub fn entities_on_day<'a, T: TimedEntity>(entities: &'a [T], day: NaiveDate) -> Vec<&'a T> {
    entities
        .iter()
        .filter(|entity| entity.starts_at().date() == day)
        .collect()
}

/// Positions one entity inside `band`.
///
/// # Errors
/// - `NonPositiveDuration` when the entity lasts zero minutes.
pub fn position<T: TimedEntity>(entity: &T, band: &HourBand) -> Result<Placement, PlacementError> {
    let starts_at = entity.starts_at();
    let duration = entity.duration_minutes();
    if duration == 0 {
        return Err(PlacementError::NonPositiveDuration { starts_at });
    }

    let hour = starts_at.hour();
    if !band.contains_hour(hour) {
        return Ok(Placement::OutsideBand);
    }

    let top_px = f64::from(hour - band.start_hour) * band.px_per_hour
        + (f64::from(starts_at.minute()) / MINUTES_PER_HOUR) * band.px_per_hour;
    let height_px =
        ((f64::from(duration) / MINUTES_PER_HOUR) * band.px_per_hour).max(band.min_height_px);

    Ok(Placement::InBand(SlotPosition { top_px, height_px }))
}

/// Buckets and positions the entities of one day.
pub fn layout_day<'a, T: TimedEntity>(
    cell: DayCell,
    entities: &'a [T],
    band: &HourBand,
) -> Result<DayColumn<'a, T>, PlacementError> {
    band.validate()?;
    Ok(fill_column(cell, entities, band))
}

/// Builds the seven day columns of the week containing `reference`.
pub fn layout_week<'a, T: TimedEntity>(
    reference: NaiveDateTime,
    now: NaiveDateTime,
    entities: &'a [T],
    band: &HourBand,
) -> Result<WeekLayout<'a, T>, PlacementError> {
    band.validate()?;
    let columns = week_cells(reference, now)
        .into_iter()
        .map(|cell| fill_column(cell, entities, band))
        .collect();
    Ok(WeekLayout {
        band: *band,
        columns,
    })
}

/// Builds the month grid with per-day entry lists.
pub fn layout_month<'a, T: TimedEntity>(
    reference: NaiveDateTime,
    now: NaiveDateTime,
    entities: &'a [T],
) -> Vec<MonthCell<'a, T>> {
    month_cells(reference, now)
        .into_iter()
        .map(|cell| {
            let mut visible = entities_on_day(entities, cell.date);
            let hidden_count = visible.len().saturating_sub(MONTH_CELL_VISIBLE_LIMIT);
            visible.truncate(MONTH_CELL_VISIBLE_LIMIT);
            MonthCell {
                cell,
                visible,
                hidden_count,
            }
        })
        .collect()
}

fn fill_column<'a, T: TimedEntity>(
    cell: DayCell,
    entities: &'a [T],
    band: &HourBand,
) -> DayColumn<'a, T> {
    let mut column = DayColumn::empty(cell);
    for entity in entities_on_day(entities, cell.date) {
        match position(entity, band) {
            Ok(Placement::InBand(slot)) => column.positioned.push(PositionedEntry { entity, slot }),
            Ok(Placement::OutsideBand) => column.outside_band.push(entity),
            Err(error) => column.rejected.push(RejectedEntry { entity, error }),
        }
    }
    column
}
