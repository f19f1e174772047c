// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::future::poll_fn;
use std::pin::Pin;
use std::sync::Arc;

use futures_core::Stream;
use tracing::{Level, event};

use crate::{AlarmSignal, CarryOut, Error, ReportSender, Result, TimeOfDay, TimeUnit, TimeUpdate};

/// The outcome of advancing a counter by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// The value after advancing.
    pub value: u32,
    /// Whether the counter wrapped to zero and the next unit must advance.
    pub carried: bool,
}

/// One stage of the seconds, minutes, and hours cascade.
///
/// A counter owns its value outright. The rest of the clock learns about it
/// only through the alarm bit it maintains, the carries it emits, and the
/// [`TimeUpdate`]s it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeCounter {
    unit: TimeUnit,
    value: u32,
}

impl CascadeCounter {
    /// Creates a counter for `unit` starting at `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `value` is not below the unit's modulus.
    pub fn new(unit: TimeUnit, value: u32) -> Result<Self> {
        if value < unit.modulus() {
            Ok(Self { unit, value })
        } else {
            Err(Error::OutOfRange { unit, value })
        }
    }

    /// Creates the counter for `unit`, starting from that field of `start`.
    #[must_use]
    pub const fn starting_at(unit: TimeUnit, start: TimeOfDay) -> Self {
        Self {
            unit,
            value: start.field(unit),
        }
    }

    /// The unit this counter counts.
    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// The current value, always below the unit's modulus.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Whether the current value equals this unit's field of `threshold`.
    #[must_use]
    pub const fn matches(&self, threshold: &TimeOfDay) -> bool {
        self.value == threshold.field(self.unit)
    }

    /// Advances by one, wrapping to zero at the modulus.
    pub const fn advance(&mut self) -> Advance {
        let next = self.value + 1;
        let carried = next == self.unit.modulus();
        self.value = if carried { 0 } else { next };

        Advance {
            value: self.value,
            carried,
        }
    }

    /// Sets this unit's alarm bit if the value matches `threshold` and withdraws it otherwise.
    pub fn check_threshold(&self, threshold: &TimeOfDay, alarm: &AlarmSignal) {
        if self.matches(threshold) {
            alarm.set(self.unit);
        } else {
            alarm.clear(self.unit);
        }
    }

    /// Runs the counter until `trigger` ends, then returns it in its final state.
    ///
    /// The counter checks its starting value against the alarm threshold, then
    /// for every item of `trigger` advances by one and checks again, so the
    /// alarm bit always describes the value the counter currently holds and the
    /// alarm fires for the configured instant.
    ///
    /// On a wrap the counter first withdraws its bit, then carries and waits
    /// until the next unit has settled, and only then checks its new value. A
    /// bit for a new value is never set while a unit above still shows the
    /// time before the carry.
    ///
    /// Each trigger item is held until the new value has been checked and
    /// reported. When the trigger is a [`CarryIn`][crate::CarryIn], dropping
    /// the item releases the counter below.
    pub async fn run<T>(mut self, mut trigger: T, links: CounterLinks) -> Self
    where
        T: Stream + Unpin,
    {
        let CounterLinks {
            threshold,
            alarm,
            mut carry,
            reports,
        } = links;

        event!(Level::DEBUG, unit = %self.unit, value = self.value, "counter started");
        self.check_threshold(&threshold, &alarm);

        while let Some(cause) = poll_fn(|cx| Pin::new(&mut trigger).poll_next(cx)).await {
            let step = self.advance();
            event!(Level::TRACE, unit = %self.unit, value = step.value, "counter advanced");

            if step.carried {
                alarm.clear(self.unit);

                if let Some(out) = &carry {
                    event!(Level::DEBUG, from = %out.from(), to = %out.to(), "carry");

                    if !out.carry().await {
                        event!(
                            Level::WARN,
                            from = %out.from(),
                            to = %out.to(),
                            "downstream counter stopped; carries are no longer delivered"
                        );
                        carry = None;
                    }
                }
            }

            self.check_threshold(&threshold, &alarm);
            let reported = reports.send(TimeUpdate::new(self.unit, step.value)).await;
            drop(cause);

            if !reported {
                event!(Level::WARN, unit = %self.unit, "display stopped; counter stops with it");
                break;
            }
        }

        event!(Level::DEBUG, unit = %self.unit, value = self.value, "counter stopped");
        self
    }
}

/// Everything a running [`CascadeCounter`] talks to.
#[derive(Debug)]
pub struct CounterLinks {
    /// The configured alarm time.
    pub threshold: TimeOfDay,
    /// The shared alarm signal.
    pub alarm: Arc<AlarmSignal>,
    /// The link into the next unit up; `None` for hours.
    pub carry: Option<CarryOut>,
    /// The counter's handle on the report channel.
    pub reports: ReportSender,
}
