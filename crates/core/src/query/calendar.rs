//! Month calendar aggregation of trips.
//!
//! A month is laid out as six Sunday-first weeks (42 cells). Cells before the
//! first and after the last day of the month belong to the neighbouring
//! months and are flagged as such.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::model::{CarpoolState, DomainError};
use crate::model::validation::DATE_FORMAT;

use super::service::QueryService;

/// Number of cells in a month grid.
pub const CALENDAR_CELLS: usize = 42;

/// One day in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    /// ISO date of the cell.
    pub date: String,
    /// Day of month shown in the cell.
    pub day: u32,
    /// True for leading/trailing days of adjacent months.
    pub other_month: bool,
    /// True if the cell is `today`.
    pub is_today: bool,
    /// Trips recorded on this date.
    pub trip_count: usize,
    /// True if at least one trip is recorded.
    pub has_trip: bool,
}

/// A month of trip activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    /// Calendar year.
    pub year: i32,
    /// Month (1-12).
    pub month: u32,
    /// Label such as "January 2024".
    pub label: String,
    /// Always `CALENDAR_CELLS` days, Sunday first.
    pub days: Vec<CalendarDay>,
}

impl QueryService {
    /// Builds the 42-cell grid for `year`/`month`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMonth` if the month does not exist.
    pub fn calendar_month(
        state: &CarpoolState,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<CalendarMonth, DomainError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(DomainError::InvalidMonth { year, month })?;
        let lead = u64::from(first.weekday().num_days_from_sunday());
        let start = first
            .checked_sub_days(Days::new(lead))
            .ok_or(DomainError::InvalidMonth { year, month })?;

        let counts = Self::trips_by_date(state);
        let days = start
            .iter_days()
            .take(CALENDAR_CELLS)
            .map(|date| {
                let iso = date.format(DATE_FORMAT).to_string();
                let trip_count = counts.get(&iso).copied().unwrap_or(0);
                CalendarDay {
                    day: date.day(),
                    other_month: date.month() != month || date.year() != year,
                    is_today: date == today,
                    trip_count,
                    has_trip: trip_count > 0,
                    date: iso,
                }
            })
            .collect();

        Ok(CalendarMonth {
            year,
            month,
            label: first.format("%B %Y").to_string(),
            days,
        })
    }
}
