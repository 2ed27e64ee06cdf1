//! Keyed collection of locations built from raw config records.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::location::{Location, LocationSnapshot};
use crate::schedule::{Schedule, ScheduleEntry, WeekTime};
use crate::telemetry::{CrowdLevelUpdate, TelemetryError};
use crate::traits::Clock;

pub const DEFAULT_BUILDING: &str = "Unknown";
pub const DEFAULT_CAPACITY: u32 = 50;

/// One location as it appears in the locations file.
///
/// Every field is optional at decode time; required fields are checked by
/// [`LocationRegistry::build`] so a bad record can be skipped on its own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub name: Option<String>,
    pub building: Option<String>,
    /// Used as the location's maximum capacity.
    pub crowd_level: Option<i64>,
    #[serde(default)]
    pub hours: Vec<HoursRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HoursRecord {
    pub day: Option<String>,
    pub hours: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record has no name")]
    MissingName,
    #[error("invalid capacity {0}")]
    InvalidCapacity(i64),
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("replaced by a later record with id {0}")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the input.
    pub index: usize,
    pub reason: RecordError,
}

/// Outcome of [`LocationRegistry::build`].
///
/// `loaded` always equals the registry's length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub loaded: usize,
    /// Records that failed validation.
    pub skipped: Vec<SkippedRecord>,
    /// Earlier records overwritten by a later record with the same id.
    pub replaced: Vec<SkippedRecord>,
}

impl BuildSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn replaced_count(&self) -> usize {
        self.replaced.len()
    }
}

/// Per-location result of [`LocationRegistry::refresh_all`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshStatus {
    pub id: String,
    pub name: String,
    pub building: String,
    pub is_open: bool,
    pub should_be_open: bool,
    pub current_occupancy: u32,
    pub max_capacity: u32,
    pub todays_hours: String,
    /// Set when the schedule could not be evaluated and the location was
    /// treated as closed.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshReport {
    pub statuses: Vec<RefreshStatus>,
    pub failed: usize,
}

impl RefreshReport {
    pub fn get(&self, id: &str) -> Option<&RefreshStatus> {
        self.statuses.iter().find(|status| status.id == id)
    }

    pub fn open_count(&self) -> usize {
        self.statuses.iter().filter(|status| status.is_open).count()
    }
}

/// Derive a location id from its display name.
///
/// Lower-cases, turns spaces into `_` and `&` into `and`, and drops commas
/// and apostrophes: `"Jo's Cafe & Bar"` becomes `"jos_cafe_and_bar"`.
pub fn derive_location_id(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "_")
        .replace('&', "and")
        .replace([',', '\''], "")
}

impl LocationRecord {
    fn into_location(self) -> Result<Location, RecordError> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or(RecordError::MissingName)?;

        let max_capacity = match self.crowd_level {
            None => DEFAULT_CAPACITY,
            Some(level) => u32::try_from(level).map_err(|_| RecordError::InvalidCapacity(level))?,
        };

        let entries = self
            .hours
            .into_iter()
            .filter_map(|item| match (item.day, item.hours) {
                (Some(day), Some(hours)) if !day.is_empty() && !hours.is_empty() => {
                    Some(ScheduleEntry { day, hours })
                }
                _ => None,
            })
            .collect();

        Ok(Location::new(
            derive_location_id(&name),
            name,
            self.building.unwrap_or_else(|| DEFAULT_BUILDING.to_string()),
            max_capacity,
            Schedule::new(entries),
        ))
    }
}

/// All known locations, in the order they were first declared.
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
}

impl LocationRegistry {
    /// Build a registry, skipping records that fail validation.
    pub fn build<I>(records: I) -> (Self, BuildSummary)
    where
        I: IntoIterator<Item = LocationRecord>,
    {
        Self::build_from(records.into_iter().map(Ok))
    }

    /// Build from a JSON array. Elements that do not decode are skipped like
    /// any other invalid record; a document that is not an array is an error.
    pub fn from_json_str(json: &str) -> Result<(Self, BuildSummary)> {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(json).context("Locations must be a JSON array of records")?;

        Ok(Self::build_from(values.into_iter().map(|value| {
            serde_json::from_value(value).map_err(|e| RecordError::Malformed(e.to_string()))
        })))
    }

    pub fn from_path(path: &Path) -> Result<(Self, BuildSummary)> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read locations file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse locations file {}", path.display()))
    }

    fn build_from<I>(records: I) -> (Self, BuildSummary)
    where
        I: Iterator<Item = Result<LocationRecord, RecordError>>,
    {
        let mut registry = Self::default();
        let mut summary = BuildSummary::default();
        // Input position of the record currently held in each slot
        let mut origins: Vec<usize> = Vec::new();

        for (index, record) in records.enumerate() {
            match record.and_then(LocationRecord::into_location) {
                Ok(location) => match registry.insert(location) {
                    Some(slot) => {
                        let id = registry.locations[slot].id().to_string();
                        tracing::warn!(
                            "Duplicate location id {}, record {} replaces record {}",
                            id,
                            index,
                            origins[slot]
                        );
                        summary.replaced.push(SkippedRecord {
                            index: origins[slot],
                            reason: RecordError::DuplicateId(id),
                        });
                        origins[slot] = index;
                    }
                    None => {
                        origins.push(index);
                        summary.loaded += 1;
                    }
                },
                Err(reason) => {
                    tracing::warn!("Skipping location record {}: {}", index, reason);
                    summary.skipped.push(SkippedRecord { index, reason });
                }
            }
        }

        tracing::info!(
            "Loaded {} locations ({} records skipped, {} replaced)",
            registry.len(),
            summary.skipped_count(),
            summary.replaced_count()
        );
        (registry, summary)
    }

    /// Insert or replace by id. Returns the slot that was overwritten, if any.
    fn insert(&mut self, location: Location) -> Option<usize> {
        match self.index.get(location.id()) {
            Some(&slot) => {
                self.locations[slot] = location;
                Some(slot)
            }
            None => {
                self.index.insert(location.id().to_string(), self.locations.len());
                self.locations.push(location);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Location> {
        self.index.get(id).map(|&slot| &self.locations[slot])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Location> {
        self.index.get(id).map(|&slot| &mut self.locations[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Auto-update every location against `now`, in registry order.
    ///
    /// A location whose schedule cannot be evaluated is closed and reported
    /// with an error marker; the rest of the batch is unaffected.
    pub fn refresh_all(&mut self, now: WeekTime) -> RefreshReport {
        let mut report = RefreshReport::default();

        for location in &mut self.locations {
            let (should_be_open, error) = location.apply_schedule(now);
            if let Some(e) = &error {
                tracing::warn!("{}: {}", location.id(), e);
                report.failed += 1;
            }

            report.statuses.push(RefreshStatus {
                id: location.id().to_string(),
                name: location.name().to_string(),
                building: location.building().to_string(),
                is_open: location.is_open(),
                should_be_open,
                current_occupancy: location.current_occupancy(),
                max_capacity: location.max_capacity(),
                todays_hours: location.todays_hours(now).to_string(),
                error: error.map(|e| e.to_string()),
            });
        }

        report
    }

    pub fn refresh_with_clock(&mut self, clock: &dyn Clock) -> RefreshReport {
        self.refresh_all(clock.now_local().into())
    }

    /// Status of every location without changing any of them.
    pub fn snapshot_all(&self, now: WeekTime) -> Vec<LocationSnapshot> {
        self.locations
            .iter()
            .map(|location| location.snapshot(now))
            .collect()
    }

    /// Move a location's occupancy to the level reported by a sensor.
    ///
    /// The percentage is converted to a head count of the location's capacity
    /// and applied through the regular entry/exit operations. Returns the new
    /// occupancy.
    pub fn apply_crowd_level(&mut self, update: &CrowdLevelUpdate) -> Result<u32, TelemetryError> {
        update.validate()?;

        let location = self
            .get_mut(&update.location_id)
            .ok_or_else(|| TelemetryError::UnknownLocation(update.location_id.clone()))?;

        let target = (update.crowd_level / 100.0 * f64::from(location.max_capacity())).round() as u32;
        let current = location.current_occupancy();
        if target > current {
            location.record_entries(target - current)?;
        } else if target < current {
            location.record_exits(current - target)?;
        }

        Ok(location.current_occupancy())
    }
}
