// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

/// One stage of the counter cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Driven by the tick source, carries into [`TimeUnit::Minutes`].
    Seconds,
    /// Driven by seconds carries, carries into [`TimeUnit::Hours`].
    Minutes,
    /// Driven by minutes carries, wraps without carrying.
    Hours,
}

impl TimeUnit {
    /// All units, from the fastest to the slowest.
    pub const ALL: [Self; 3] = [Self::Seconds, Self::Minutes, Self::Hours];

    /// The number of distinct values the unit counts through before wrapping to zero.
    #[must_use]
    pub const fn modulus(self) -> u32 {
        match self {
            Self::Seconds | Self::Minutes => 60,
            Self::Hours => 24,
        }
    }

    /// The unit that advances when this one wraps, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Seconds => Some(Self::Minutes),
            Self::Minutes => Some(Self::Hours),
            Self::Hours => None,
        }
    }

    pub(crate) const fn alarm_bit(self) -> u8 {
        match self {
            Self::Seconds => 0b001,
            Self::Minutes => 0b010,
            Self::Hours => 0b100,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
        })
    }
}
