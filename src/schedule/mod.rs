//! Weekly opening hours written as free text.
//!
//! A [`Schedule`] is an ordered list of `(day expression, hours expression)`
//! entries such as `("Monday - Friday", "10:00 a.m. to 9 p.m.")`. The first
//! entry whose day expression covers the queried weekday decides the answer;
//! anything that cannot be parsed resolves to closed.

mod days;
mod time;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use days::{day_matches, parse_weekday, weekday_name};
pub use time::{HoursRange, parse_time_token};

/// Shown when no entry covers the requested day.
pub const HOURS_NOT_SPECIFIED: &str = "Hours not specified";

const CLOSED: &str = "closed";

/// A point in the week at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekTime {
    pub day: Weekday,
    pub time: NaiveTime,
}

impl WeekTime {
    /// Returns `None` if the hour or minute is out of range.
    pub fn new(day: Weekday, hour: u32, minute: u32) -> Option<Self> {
        Some(Self {
            day,
            time: NaiveTime::from_hms_opt(hour, minute, 0)?,
        })
    }
}

impl From<NaiveDateTime> for WeekTime {
    fn from(datetime: NaiveDateTime) -> Self {
        Self {
            day: datetime.weekday(),
            // Seconds and below are dropped
            time: datetime.time() - Duration::nanoseconds(i64::from(datetime.nanosecond()))
                - Duration::seconds(i64::from(datetime.second())),
        }
    }
}

/// One line of a weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: String,
    pub hours: String,
}

impl ScheduleEntry {
    pub fn new(day: impl Into<String>, hours: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            hours: hours.into(),
        }
    }
}

/// The hours text of the entry covering a day could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable hours {hours:?} for {day:?}")]
pub struct ScheduleError {
    pub day: String,
    pub hours: String,
}

/// Ordered weekly schedule. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry covering `day`, in declaration order.
    fn entry_for(&self, day: Weekday) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|entry| day_matches(&entry.day, day))
    }

    /// Evaluate the schedule, reporting unparseable hours as an error.
    ///
    /// `Ok(false)` covers "no entry for this day", "Closed", and instants
    /// outside the window.
    pub fn check(&self, now: WeekTime) -> Result<bool, ScheduleError> {
        let Some(entry) = self.entry_for(now.day) else {
            return Ok(false);
        };

        if entry.hours.to_lowercase().contains(CLOSED) {
            return Ok(false);
        }

        match HoursRange::parse(&entry.hours) {
            Some(range) => Ok(range.contains(now.time)),
            None => Err(ScheduleError {
                day: entry.day.clone(),
                hours: entry.hours.clone(),
            }),
        }
    }

    /// Whether the location should be open at `now`. Fails closed.
    pub fn is_open_at(&self, now: WeekTime) -> bool {
        self.check(now).unwrap_or(false)
    }

    /// Display text for the hours that apply on `day`.
    pub fn todays_hours(&self, day: Weekday) -> &str {
        self.entry_for(day)
            .map_or(HOURS_NOT_SPECIFIED, |entry| entry.hours.as_str())
    }
}

impl From<Vec<ScheduleEntry>> for Schedule {
    fn from(entries: Vec<ScheduleEntry>) -> Self {
        Self::new(entries)
    }
}
