// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::pin::pin;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};

use tokio::sync::Notify;
use tracing::{Level, event};

use crate::TimeUnit;

const ALL_BITS: u8 = 0b111;

/// A composite, auto-clearing alarm event with one bit per [`TimeUnit`].
///
/// Each counter sets its bit when its value matches the alarm threshold and
/// clears it again when a later check no longer matches. The [`set`][Self::set]
/// that completes the vector clears all three bits in the same atomic step and
/// records one pending alarm, so the alarm stands even if a counter withdraws
/// its bit before the waiter gets to run. [`wait_all_and_clear`][Self::wait_all_and_clear]
/// takes pending alarms one at a time.
///
/// This is a condition over a bit vector, not a counter: setting a bit that is
/// already set has no additional effect.
///
/// # Examples
///
/// ```
/// use chime::{AlarmSignal, TimeUnit};
///
/// # async fn example(signal: &AlarmSignal) {
/// signal.set(TimeUnit::Hours);
/// signal.set(TimeUnit::Minutes);
/// signal.set(TimeUnit::Minutes);
/// signal.set(TimeUnit::Seconds);
///
/// assert!(signal.wait_all_and_clear().await);
/// assert!(!signal.is_set(TimeUnit::Hours));
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AlarmSignal {
    bits: AtomicU8,
    pending: AtomicU64,
    closed: AtomicBool,
    notify: Notify,
}

impl AlarmSignal {
    /// Creates a signal with all bits cleared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bit for `unit`. Setting an already-set bit is a no-op.
    ///
    /// If this completes the vector, all bits are cleared and one alarm becomes pending.
    pub fn set(&self, unit: TimeUnit) {
        let bit = unit.alarm_bit();
        let (Ok(before) | Err(before)) = self.bits.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
            let next = bits | bit;
            Some(if next == ALL_BITS { 0 } else { next })
        });

        if before & bit == 0 {
            event!(Level::DEBUG, unit = %unit, "alarm bit set");
        }

        if before | bit == ALL_BITS {
            self.pending.fetch_add(1, Ordering::AcqRel);
            event!(Level::DEBUG, "alarm condition met");
            self.notify.notify_one();
        }
    }

    /// Clears the bit for `unit` without affecting the others or any pending alarm.
    pub fn clear(&self, unit: TimeUnit) {
        let bit = unit.alarm_bit();
        let before = self.bits.fetch_and(!bit, Ordering::AcqRel);

        if before & bit != 0 {
            event!(Level::DEBUG, unit = %unit, "alarm bit withdrawn");
        }
    }

    /// Whether the bit for `unit` is currently set.
    #[must_use]
    pub fn is_set(&self, unit: TimeUnit) -> bool {
        self.bits.load(Ordering::Acquire) & unit.alarm_bit() != 0
    }

    /// Takes one pending alarm, returning `false` if there is none.
    pub fn try_take(&self) -> bool {
        self.pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |pending| pending.checked_sub(1))
            .is_ok()
    }

    /// Waits until an alarm is pending, then takes it and returns `true`.
    ///
    /// Returns `false` once the signal has been [closed][Self::close] and no
    /// alarm is pending. Alarms raised before the close are still delivered.
    pub async fn wait_all_and_clear(&self) -> bool {
        loop {
            // Registering before checking means a `set` or `close` that races
            // with the checks below still wakes this waiter.
            let mut notified = pin!(self.notify.notified());
            notified.as_mut().enable();

            if self.try_take() {
                return true;
            }

            if self.closed.load(Ordering::Acquire) {
                return false;
            }

            notified.await;
        }
    }

    /// Marks the signal as closed, releasing waiters once no alarm is pending.
    ///
    /// Called after every counter has stopped, so no further bits can arrive.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }
}
