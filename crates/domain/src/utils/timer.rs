//! Mission time budgets and countdowns

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{MISSION_TIME_PATTERN, TIMER_WARNING_MINUTES};
use crate::impl_domain_status_conversions;
use crate::{DelegateError, Result};

#[allow(clippy::expect_used)]
static MISSION_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(MISSION_TIME_PATTERN).expect("mission time pattern is valid"));

/// Validated mission duration in the `<1-2 digits>min` form, e.g. `15min`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MissionTime {
    raw: String,
    minutes: u32,
}

impl MissionTime {
    /// Parse a mission time, rejecting anything but `^\d{1,2}min$`.
    pub fn parse(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(DelegateError::Validation("mission time must not be empty".into()));
        }

        let minutes = MISSION_TIME_RE
            .captures(value)
            .and_then(|caps| caps.name("time"))
            .and_then(|time| time.as_str().parse::<u32>().ok())
            .ok_or_else(|| {
                DelegateError::Validation(format!(
                    "mission time '{value}' must look like '15min' (one or two digits)"
                ))
            })?;

        Ok(Self { raw: value.to_string(), minutes })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Countdown for a mission started at `start_ms`, observed at `now_ms`.
    pub fn countdown(&self, start_ms: i64, now_ms: i64) -> Countdown {
        let target_ms = start_ms + i64::from(self.minutes) * 60_000;
        Countdown::until(target_ms, now_ms)
    }
}

impl fmt::Display for MissionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for MissionTime {
    type Error = DelegateError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<MissionTime> for String {
    fn from(value: MissionTime) -> Self {
        value.raw
    }
}

/// Colour band of the mission timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Good,
    Warning,
    Bad,
}

impl_domain_status_conversions!(TimerState {
    Good => "good",
    Warning => "warning",
    Bad => "bad",
});

/// Remaining time split into clock fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub state: TimerState,
}

impl Countdown {
    /// Time left until `target_ms`. Overdue countdowns read `00:00:00`.
    pub fn until(target_ms: i64, now_ms: i64) -> Self {
        let remaining = ((target_ms - now_ms) / 1000).max(0);
        // Days are dropped, the clock only shows hours.
        let within_day = remaining % (60 * 60 * 24);
        let hours = within_day / 3600;
        let minutes = (within_day % 3600) / 60;
        let seconds = within_day % 60;

        let state = if now_ms > target_ms {
            TimerState::Bad
        } else if remaining / 60 <= TIMER_WARNING_MINUTES {
            TimerState::Warning
        } else {
            TimerState::Good
        };

        Self { hours, minutes, seconds, state }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
