//! Boundary types for sensor crowd-level updates.
//!
//! Transport lives outside this crate; this module validates incoming
//! updates and provides the retry policy senders use.

use std::fmt::Display;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TelemetryConfig;
use crate::location::OccupancyError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TelemetryError {
    #[error("crowd level must be between 0 and 100, got {0}")]
    OutOfRange(f64),
    #[error("unknown location {0}")]
    UnknownLocation(String),
    #[error(transparent)]
    Occupancy(#[from] OccupancyError),
}

/// A crowd level reading for one location, as a percentage of capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrowdLevelUpdate {
    pub location_id: String,
    pub crowd_level: f64,
}

impl CrowdLevelUpdate {
    pub fn new(location_id: impl Into<String>, crowd_level: f64) -> Result<Self, TelemetryError> {
        let update = Self {
            location_id: location_id.into(),
            crowd_level,
        };
        update.validate()?;
        Ok(update)
    }

    pub fn validate(&self) -> Result<(), TelemetryError> {
        if !self.crowd_level.is_finite() || !(0.0..=100.0).contains(&self.crowd_level) {
            return Err(TelemetryError::OutOfRange(self.crowd_level));
        }
        Ok(())
    }
}

/// A send is retried at most once.
pub const MAX_SEND_ATTEMPTS: u32 = 2;

/// Retry a fallible send a bounded number of times with a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    /// One retry after half a second.
    fn default() -> Self {
        Self {
            max_attempts: MAX_SEND_ATTEMPTS,
            delay: Duration::from_millis(500),
        }
    }
}

impl From<&TelemetryConfig> for RetryPolicy {
    fn from(config: &TelemetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.clamp(1, MAX_SEND_ATTEMPTS),
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds or attempts run out, returning the last
    /// error. `op` receives the 1-based attempt number. Attempts are capped
    /// at [`MAX_SEND_ATTEMPTS`] whatever `max_attempts` says.
    pub fn run<T, E, F>(&self, mut op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        let attempts = self.max_attempts.clamp(1, MAX_SEND_ATTEMPTS);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    tracing::warn!("Attempt {}/{} failed: {}, retrying", attempt, attempts, e);
                    std::thread::sleep(self.delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
