//! Dining Status Library
//!
//! Decides whether dining locations are open from free-text weekly hours
//! and tracks per-location occupancy counters.

pub mod config;
pub mod location;
pub mod registry;
pub mod schedule;
pub mod telemetry;
pub mod traits;

// Re-export commonly used types
pub use config::AppConfig;
pub use location::{Location, LocationSnapshot, OccupancyError};
pub use registry::{
    BuildSummary, LocationRecord, LocationRegistry, RecordError, RefreshReport, RefreshStatus,
    SkippedRecord, derive_location_id,
};
pub use schedule::{
    HOURS_NOT_SPECIFIED, HoursRange, Schedule, ScheduleEntry, ScheduleError, WeekTime,
    day_matches, parse_time_token,
};
pub use telemetry::{CrowdLevelUpdate, MAX_SEND_ATTEMPTS, RetryPolicy, TelemetryError};
pub use traits::{Clock, MockClock, SystemClock};
