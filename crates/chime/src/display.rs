// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use tracing::{Level, event};

use crate::{OutputLane, ReportReceiver, TimeOfDay, TimeUnit, TimeUpdate};

/// The time as reconstructed by the display from the updates it has received.
///
/// Hours are tracked twice. [`hours`][Self::hours] is derived locally: it
/// advances whenever a minutes update wraps to zero. [`relayed_hours`][Self::relayed_hours]
/// is the last value the hours counter itself reported. The display shows the
/// derived value. The two agree while the display sees every update from the
/// start, but nothing forces them to: a display that starts observing mid-stream,
/// or a batch that holds the minutes wrap but not yet the hours update, puts
/// them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedTime {
    hours: u32,
    minutes: u32,
    seconds: u32,
    relayed_hours: u32,
}

impl DisplayedTime {
    /// A displayed time that starts out showing `start`.
    #[must_use]
    pub const fn new(start: TimeOfDay) -> Self {
        Self {
            hours: start.hours(),
            minutes: start.minutes(),
            seconds: start.seconds(),
            relayed_hours: start.hours(),
        }
    }

    /// Applies one update.
    ///
    /// A minutes update carrying zero also advances the derived hours.
    pub fn apply(&mut self, update: TimeUpdate) {
        match update.unit() {
            TimeUnit::Seconds => self.seconds = update.value(),
            TimeUnit::Minutes => {
                self.minutes = update.value();
                if update.value() == 0 {
                    self.hours = (self.hours + 1) % TimeUnit::Hours.modulus();
                }
            }
            TimeUnit::Hours => self.relayed_hours = update.value(),
        }
    }

    /// The displayed hours, derived from minute wraps.
    #[must_use]
    pub const fn hours(&self) -> u32 {
        self.hours
    }

    /// The displayed minutes.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    /// The displayed seconds.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.seconds
    }

    /// The hours value most recently reported by the hours counter.
    #[must_use]
    pub const fn relayed_hours(&self) -> u32 {
        self.relayed_hours
    }

    /// Whether the derived and the relayed hours currently agree.
    #[must_use]
    pub const fn hours_agree(&self) -> bool {
        self.hours == self.relayed_hours
    }
}

impl fmt::Display for DisplayedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

/// Drains the report channel and prints the reconstructed time.
///
/// Every wake-up takes all updates queued at that moment as one batch and
/// prints a single line for it, so a burst such as a seconds, minutes, and
/// hours carry landing together shows up as one line with the latest time.
#[derive(Debug)]
pub struct DisplayConsumer {
    time: DisplayedTime,
    reports: ReportReceiver,
    lane: OutputLane,
}

impl DisplayConsumer {
    /// Creates a display showing `start` that reads from `reports` and writes to `lane`.
    #[must_use]
    pub const fn new(start: TimeOfDay, reports: ReportReceiver, lane: OutputLane) -> Self {
        Self {
            time: DisplayedTime::new(start),
            reports,
            lane,
        }
    }

    /// Runs until every counter has stopped and the channel is drained, then returns the final displayed time.
    ///
    /// A failed write is logged and the loop carries on with the next batch.
    pub async fn run(mut self) -> DisplayedTime {
        let mut batch = Vec::with_capacity(self.reports.capacity());

        loop {
            batch.clear();
            if self.reports.recv_batch(&mut batch).await == 0 {
                break;
            }

            for update in &batch {
                event!(Level::TRACE, unit = %update.unit(), value = update.value(), "update received");
                self.time.apply(*update);
            }

            if !self.time.hours_agree() {
                event!(
                    Level::DEBUG,
                    derived = self.time.hours(),
                    relayed = self.time.relayed_hours(),
                    "displayed hours differ from the hours counter"
                );
            }

            if let Err(error) = self.lane.write_line(&self.time.to_string()) {
                event!(Level::WARN, lane = self.lane.name(), %error, "display line was not written");
            }
        }

        self.time
    }
}
