//! Single-day work-order scheduling: conflict checks and block geometry.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Minutes since midnight for an `HH:MM` string.
pub fn parse_minutes(value: &str) -> Result<u32, TypeConstraintError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map(|time| time.hour() * 60 + time.minute())
        .map_err(|_| TypeConstraintError::InvalidTime(value.to_string()))
}

/// Work order placed on the day grid.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkOrder {
    pub id: String,
    pub technician: String,
    /// Arrival time, `HH:MM`.
    pub start: String,
    pub service_minutes: u32,
    #[serde(default)]
    pub travel_minutes: u32,
}

impl WorkOrder {
    /// Occupied half-open interval `[start - travel, start + service)` in minutes.
    pub fn interval(&self) -> Result<(i64, i64), TypeConstraintError> {
        let start = i64::from(parse_minutes(&self.start)?);
        Ok((
            start - i64::from(self.travel_minutes),
            start + i64::from(self.service_minutes),
        ))
    }
}

/// Ids of orders that collide with `candidate` for the same technician.
pub fn find_conflicts(
    orders: &[WorkOrder],
    candidate: &WorkOrder,
) -> Result<Vec<String>, TypeConstraintError> {
    let (start, end) = candidate.interval()?;
    let mut conflicts = Vec::new();

    for order in orders {
        if order.id == candidate.id || order.technician != candidate.technician {
            continue;
        }
        let (other_start, other_end) = order.interval()?;
        if start < other_end && other_start < end {
            conflicts.push(order.id.clone());
        }
    }

    Ok(conflicts)
}

/// Visible window of the day grid.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DayGrid {
    pub start_hour: u32,
    pub end_hour: u32,
    pub pixels_per_hour: f64,
}

impl Default for DayGrid {
    fn default() -> Self {
        Self {
            start_hour: 7,
            end_hour: 20,
            pixels_per_hour: 60.0,
        }
    }
}

impl DayGrid {
    /// Rejects windows that are empty, inverted or past midnight, and
    /// non-positive scales.
    pub fn validate(&self) -> Result<(), TypeConstraintError> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(TypeConstraintError::InvalidValue(format!(
                "grid hours {}..{}",
                self.start_hour, self.end_hour
            )));
        }
        if !self.pixels_per_hour.is_finite() || self.pixels_per_hour <= 0.0 {
            return Err(TypeConstraintError::InvalidValue(format!(
                "pixels per hour {}",
                self.pixels_per_hour
            )));
        }
        Ok(())
    }

    fn px(&self, minutes: i64) -> f64 {
        minutes as f64 * self.pixels_per_hour / 60.0
    }

    fn bounds(&self) -> (i64, i64) {
        (
            i64::from(self.start_hour) * 60,
            i64::from(self.end_hour) * 60,
        )
    }
}

/// Pixel geometry of an order: an outer block with nested travel and service parts.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct BlockLayout {
    pub top: f64,
    pub height: f64,
    pub travel_height: f64,
    pub service_top: f64,
    pub service_height: f64,
}

/// Lays out an order on the grid, clamping it to the visible window.
///
/// Nested offsets are relative to the outer block. Orders entirely outside
/// the window get a zero-height block at the nearest edge.
pub fn layout_block(order: &WorkOrder, grid: &DayGrid) -> Result<BlockLayout, TypeConstraintError> {
    grid.validate()?;
    let (occupied_start, occupied_end) = order.interval()?;
    let arrival = occupied_start + i64::from(order.travel_minutes);
    let (grid_start, grid_end) = grid.bounds();

    let clamp = |minutes: i64| minutes.clamp(grid_start, grid_end);
    let top_minutes = clamp(occupied_start);
    let bottom_minutes = clamp(occupied_end);
    let arrival_minutes = clamp(arrival);

    Ok(BlockLayout {
        top: grid.px(top_minutes - grid_start),
        height: grid.px(bottom_minutes - top_minutes),
        travel_height: grid.px(arrival_minutes - top_minutes),
        service_top: grid.px(arrival_minutes - top_minutes),
        service_height: grid.px(bottom_minutes - arrival_minutes),
    })
}
