// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use futures_core::Stream;
use tick::{Clock, Delay};

/// The shortest period a [`Metronome`] ticks at.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A drift-free periodic tick source.
///
/// Unlike a timer that reschedules itself relative to the moment it was last
/// polled, a metronome fixes every deadline up front: tick `n` is due at
/// `origin + n * period`, where `origin` is the clock's instant when the
/// metronome was created. Time spent between ticks, and wake-up jitter, do not
/// push later ticks back. A consumer that falls behind receives the missed
/// ticks back to back until it has caught up.
///
/// `Metronome` implements [`Stream`] and never completes.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use chime::Metronome;
/// use tick::Clock;
///
/// # async fn example(clock: &Clock) {
/// let mut metronome = Metronome::new(clock, Duration::from_secs(1));
///
/// metronome.wait_next_period().await;
/// metronome.wait_next_period().await;
/// assert_eq!(metronome.ticks(), 2);
/// # }
/// ```
#[derive(Debug)]
pub struct Metronome {
    clock: Clock,
    period: Duration,
    // `None` once the next deadline no longer fits in an `Instant`.
    next_deadline: Option<Instant>,
    // Created lazily on the first poll for each deadline.
    current_delay: Option<Pin<Box<Delay>>>,
    ticks: u64,
}

impl Metronome {
    /// Creates a metronome whose first tick is due one `period` from now.
    ///
    /// Periods shorter than [`MIN_PERIOD`] are raised to it.
    #[must_use]
    pub fn new(clock: &Clock, period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);

        Self {
            next_deadline: clock.instant().checked_add(period),
            clock: clock.clone(),
            period,
            current_delay: None,
            ticks: 0,
        }
    }

    /// The tick period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// The number of ticks delivered so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Waits for the next deadline.
    pub async fn wait_next_period(&mut self) {
        std::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await;
    }
}

impl Stream for Metronome {
    type Item = ();

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        let Some(deadline) = this.next_deadline else {
            return Poll::Pending;
        };

        let clock = &this.clock;
        if clock.instant() < deadline {
            let delay = this
                .current_delay
                .get_or_insert_with(|| Box::pin(clock.delay(deadline.saturating_duration_since(clock.instant()))));

            if delay.as_mut().poll(cx).is_pending() {
                return Poll::Pending;
            }
        }

        this.current_delay = None;
        this.next_deadline = deadline.checked_add(this.period);
        this.ticks = this.ticks.saturating_add(1);

        Poll::Ready(Some(()))
    }
}
