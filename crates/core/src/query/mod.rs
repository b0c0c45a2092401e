//! Query and filter layer.
//!
//! Shapes the balance matrix, trips and adjustments into the ordered,
//! filtered lists the UI and HTTP API present.

pub mod calendar;
pub mod filter;
pub mod service;
pub mod views;

#[cfg(test)]
mod service_props;

pub use calendar::{CALENDAR_CELLS, CalendarDay, CalendarMonth};
pub use filter::{BalanceFilter, DEFAULT_ADJUSTMENT_LIMIT, TripFilter};
pub use service::{QueryService, SUPPRESSION_THRESHOLD};
pub use views::{AdjustmentRow, BalanceRow, Direction, TripRow};
