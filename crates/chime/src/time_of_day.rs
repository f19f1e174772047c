// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result, TimeUnit};

/// A validated time of day, used both for the counters' start values and for the alarm threshold.
///
/// Every field is guaranteed to be below its unit's [modulus][TimeUnit::modulus].
///
/// # Examples
///
/// ```
/// use chime::TimeOfDay;
///
/// let alarm: TimeOfDay = "6:0:10".parse()?;
///
/// assert_eq!(alarm, TimeOfDay::new(6, 0, 10)?);
/// assert_eq!(alarm.to_string(), "6:0:10");
///
/// assert!(TimeOfDay::new(24, 0, 0).is_err());
/// # Ok::<(), chime::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimeOfDay {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl TimeOfDay {
    /// Midnight, `0:0:0`.
    pub const MIDNIGHT: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Creates a time of day, rejecting values outside their unit's range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] naming the first offending unit.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Result<Self> {
        Ok(Self {
            hours: check(TimeUnit::Hours, hours)?,
            minutes: check(TimeUnit::Minutes, minutes)?,
            seconds: check(TimeUnit::Seconds, seconds)?,
        })
    }

    /// The hours field, `0..24`.
    #[must_use]
    pub const fn hours(&self) -> u32 {
        self.hours
    }

    /// The minutes field, `0..60`.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    /// The seconds field, `0..60`.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.seconds
    }

    /// The field that belongs to `unit`.
    #[must_use]
    pub const fn field(&self, unit: TimeUnit) -> u32 {
        match unit {
            TimeUnit::Seconds => self.seconds,
            TimeUnit::Minutes => self.minutes,
            TimeUnit::Hours => self.hours,
        }
    }
}

fn check(unit: TimeUnit, value: u32) -> Result<u32> {
    if value < unit.modulus() {
        Ok(value)
    } else {
        Err(Error::OutOfRange { unit, value })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split(':').map(|part| part.parse::<u32>());

        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(hours)), Some(Ok(minutes)), Some(Ok(seconds)), None) => Self::new(hours, minutes, seconds),
            _ => Err(Error::Parse(s.to_owned())),
        }
    }
}
