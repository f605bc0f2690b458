use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::PairingError;

/// Seat times snap to this grid
const ROUNDING_STEP_MINUTES: u32 = 5;

/// Wall-clock time of day, rendered as `HH:MM` (24-hour, zero padded)
///
/// Carries no timezone: every `ClockTime` is implicitly local to the event it
/// was computed for. Stored as minutes since midnight so window checks are plain
/// integer comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Build a clock time from hour and minute, `None` if out of range
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Unchecked constructor for compile-time constants
    pub(crate) const fn hm(hour: u16, minute: u16) -> Self {
        Self(hour * 60 + minute)
    }

    /// Local wall-clock time of an event-local timestamp (seconds dropped)
    pub fn from_datetime(dt: &DateTime<FixedOffset>) -> Self {
        Self((dt.hour() * 60 + dt.minute()) as u16)
    }

    #[inline]
    pub fn minutes_since_midnight(self) -> u16 {
        self.0
    }

    /// Absolute distance in minutes, without wrapping around midnight
    #[inline]
    pub fn distance_to(self, other: ClockTime) -> u16 {
        self.0.abs_diff(other.0)
    }

    /// Inclusive on both ends
    #[inline]
    pub fn is_within(self, start: ClockTime, end: ClockTime) -> bool {
        start.0 <= self.0 && self.0 <= end.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = PairingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PairingError::InvalidClockTime(s.to_string());

        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
        let well_formed = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !well_formed(hours, 2) || !well_formed(minutes, 2) || minutes.len() != 2 {
            return Err(invalid());
        }

        let hour: u32 = hours.parse().map_err(|_| invalid())?;
        let minute: u32 = minutes.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = PairingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// How far a timestamp sits past the previous 5-minute mark (local time)
fn offset_into_slot(dt: &DateTime<FixedOffset>) -> Duration {
    Duration::minutes(i64::from(dt.minute() % ROUNDING_STEP_MINUTES))
        + Duration::seconds(i64::from(dt.second()))
        + Duration::nanoseconds(i64::from(dt.nanosecond()))
}

/// Round a timestamp down to the previous 5-minute mark
pub fn floor_to_five_minutes(dt: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    dt - offset_into_slot(&dt)
}

/// Round a timestamp up to the next 5-minute mark (unchanged if already on one)
pub fn ceil_to_five_minutes(dt: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let offset = offset_into_slot(&dt);
    if offset.is_zero() {
        dt
    } else {
        dt - offset + Duration::minutes(i64::from(ROUNDING_STEP_MINUTES))
    }
}
