//! Dining locations: occupancy counters plus open/closed state driven by
//! a weekly schedule.

use serde::Serialize;
use thiserror::Error;

use crate::schedule::{Schedule, ScheduleError, WeekTime};

/// Why an occupancy change was rejected. A rejected change mutates nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OccupancyError {
    #[error("{0} is closed")]
    Closed(String),
    #[error("cannot admit {requested} to {location}: {available} place(s) left")]
    OverCapacity {
        location: String,
        requested: u32,
        available: u32,
    },
    #[error("cannot release {requested} from {location}: only {present} present")]
    NotEnoughOccupants {
        location: String,
        requested: u32,
        present: u32,
    },
    #[error("count must be positive")]
    ZeroCount,
}

/// Read-only status projection of a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSnapshot {
    pub id: String,
    pub name: String,
    pub building: String,
    pub current_occupancy: u32,
    pub max_capacity: u32,
    pub occupancy_rate: f64,
    pub total_entries: u64,
    pub total_exits: u64,
    pub is_open: bool,
    pub todays_hours: String,
}

/// A dining location with live occupancy counters and weekly hours.
///
/// Occupancy always stays within `0..=max_capacity`; closing resets it to 0
/// but keeps the lifetime entry/exit totals.
#[derive(Debug, Clone)]
pub struct Location {
    id: String,
    name: String,
    building: String,
    max_capacity: u32,
    current_occupancy: u32,
    total_entries: u64,
    total_exits: u64,
    is_open: bool,
    schedule: Schedule,
}

impl Location {
    /// Create a closed, empty location.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        building: impl Into<String>,
        max_capacity: u32,
        schedule: Schedule,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            building: building.into(),
            max_capacity,
            current_occupancy: 0,
            total_entries: 0,
            total_exits: 0,
            is_open: false,
            schedule,
        }
    }

    /// Registry key derived from the name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name as written in the config record.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Building the location is in, `"Unknown"` if not configured.
    pub fn building(&self) -> &str {
        &self.building
    }

    /// Upper bound for the current occupancy.
    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    /// People currently inside.
    pub fn current_occupancy(&self) -> u32 {
        self.current_occupancy
    }

    /// Lifetime count of admitted people. Never decreases.
    pub fn total_entries(&self) -> u64 {
        self.total_entries
    }

    /// Lifetime count of departed people. Never decreases.
    pub fn total_exits(&self) -> u64 {
        self.total_exits
    }

    /// Whether the location currently accepts entries.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Weekly hours, fixed at construction.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Admit `count` people. Rejected while closed or if it would exceed capacity.
    pub fn record_entries(&mut self, count: u32) -> Result<(), OccupancyError> {
        if count == 0 {
            return Err(OccupancyError::ZeroCount);
        }
        if !self.is_open {
            return Err(OccupancyError::Closed(self.name.clone()));
        }

        let available = self.max_capacity - self.current_occupancy;
        if count > available {
            tracing::debug!("{}: rejected {} entries, {} left", self.id, count, available);
            return Err(OccupancyError::OverCapacity {
                location: self.name.clone(),
                requested: count,
                available,
            });
        }

        self.current_occupancy += count;
        self.total_entries += u64::from(count);
        Ok(())
    }

    /// Release `count` people. Rejected if fewer are present.
    pub fn record_exits(&mut self, count: u32) -> Result<(), OccupancyError> {
        if count == 0 {
            return Err(OccupancyError::ZeroCount);
        }
        if count > self.current_occupancy {
            tracing::debug!(
                "{}: rejected {} exits, {} present",
                self.id,
                count,
                self.current_occupancy
            );
            return Err(OccupancyError::NotEnoughOccupants {
                location: self.name.clone(),
                requested: count,
                present: self.current_occupancy,
            });
        }

        self.current_occupancy -= count;
        self.total_exits += u64::from(count);
        Ok(())
    }

    /// Percentage of capacity in use; 0 for a zero-capacity location.
    pub fn occupancy_rate(&self) -> f64 {
        if self.max_capacity == 0 {
            return 0.0;
        }
        f64::from(self.current_occupancy) / f64::from(self.max_capacity) * 100.0
    }

    /// Mark the location open.
    pub fn open(&mut self) {
        self.is_open = true;
        tracing::info!("{} is now open", self.name);
    }

    /// Mark the location closed and empty it. Totals are kept.
    pub fn close(&mut self) {
        self.is_open = false;
        self.current_occupancy = 0;
        tracing::info!("{} is now closed", self.name);
    }

    /// Bring `is_open` in line with the schedule at `now`.
    ///
    /// Transitions only when the schedule disagrees with the current state,
    /// so repeated calls with the same instant are no-ops. Returns whether
    /// the location should be open.
    pub fn auto_update(&mut self, now: WeekTime) -> bool {
        self.apply_schedule(now).0
    }

    /// Like [`Location::auto_update`], also returning the schedule error that
    /// forced a fail-closed answer.
    pub(crate) fn apply_schedule(&mut self, now: WeekTime) -> (bool, Option<ScheduleError>) {
        let (should_be_open, error) = match self.schedule.check(now) {
            Ok(open) => (open, None),
            Err(e) => (false, Some(e)),
        };

        if should_be_open && !self.is_open {
            self.open();
        } else if !should_be_open && self.is_open {
            self.close();
        }

        (should_be_open, error)
    }

    /// Hours text that applies on the day of `now`.
    pub fn todays_hours(&self, now: WeekTime) -> &str {
        self.schedule.todays_hours(now.day)
    }

    /// Read-only status projection; never transitions the location.
    pub fn snapshot(&self, now: WeekTime) -> LocationSnapshot {
        LocationSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            building: self.building.clone(),
            current_occupancy: self.current_occupancy,
            max_capacity: self.max_capacity,
            occupancy_rate: self.occupancy_rate(),
            total_entries: self.total_entries,
            total_exits: self.total_exits,
            is_open: self.is_open,
            todays_hours: self.todays_hours(now).to_string(),
        }
    }
}
