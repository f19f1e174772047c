// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::time::Duration;

use crate::metronome::MIN_PERIOD;
use crate::report::MIN_REPORT_CAPACITY;
use crate::{DEFAULT_ALARM_NOTICE, TimeOfDay};

/// The constants an [`AlarmClock`][crate::AlarmClock] is started with.
///
/// Nothing here can change once the clock runs.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use chime::{ClockConfig, TimeOfDay};
///
/// let config = ClockConfig::new(TimeOfDay::new(5, 59, 55)?, TimeOfDay::new(6, 0, 10)?)
///     .with_period(Duration::from_millis(10))
///     .with_report_capacity(8)
///     .with_alarm_notice("wake up");
///
/// assert_eq!(config.alarm().hours(), 6);
/// assert_eq!(config.report_capacity(), 8);
/// # Ok::<(), chime::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    start: TimeOfDay,
    alarm: TimeOfDay,
    period: Duration,
    report_capacity: usize,
    alarm_notice: Cow<'static, str>,
}

impl ClockConfig {
    /// The default tick period: one second.
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    /// Creates a configuration that starts the counters at `start` and raises the alarm at `alarm`.
    #[must_use]
    pub const fn new(start: TimeOfDay, alarm: TimeOfDay) -> Self {
        Self {
            start,
            alarm,
            period: Self::DEFAULT_PERIOD,
            report_capacity: MIN_REPORT_CAPACITY,
            alarm_notice: Cow::Borrowed(DEFAULT_ALARM_NOTICE),
        }
    }

    /// Sets the tick period. Periods shorter than 1ms are raised to 1ms.
    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period.max(MIN_PERIOD);
        self
    }

    /// Sets the report channel capacity. Capacities below 3 are raised to 3.
    #[must_use]
    pub fn with_report_capacity(mut self, capacity: usize) -> Self {
        self.report_capacity = capacity.max(MIN_REPORT_CAPACITY);
        self
    }

    /// Sets the text written when the alarm goes off.
    #[must_use]
    pub fn with_alarm_notice(mut self, notice: impl Into<Cow<'static, str>>) -> Self {
        self.alarm_notice = notice.into();
        self
    }

    /// The counters' start values.
    #[must_use]
    pub const fn start(&self) -> TimeOfDay {
        self.start
    }

    /// The alarm threshold.
    #[must_use]
    pub const fn alarm(&self) -> TimeOfDay {
        self.alarm
    }

    /// The tick period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// The report channel capacity.
    #[must_use]
    pub const fn report_capacity(&self) -> usize {
        self.report_capacity
    }

    /// The alarm notice.
    #[must_use]
    pub fn alarm_notice(&self) -> &str {
        &self.alarm_notice
    }
}
