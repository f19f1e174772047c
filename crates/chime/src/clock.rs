// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use futures_core::Stream;
use tick::Clock;
use tracing::{Level, event};

use crate::{
    AlarmConsumer, AlarmSignal, CarryEdge, CarryOut, CascadeCounter, ClockConfig, CounterLinks, DisplayConsumer,
    DisplayedTime, Metronome, OutputLane, ReportSender, Result, TextSink, TimeOfDay, TimeUnit, carry_link,
    report_channel,
};

/// The state of a clock whose tick source has run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// The values the three counters stopped at.
    pub counters: TimeOfDay,
    /// The display's final reconstruction, including the hours the hours counter relayed.
    pub displayed: DisplayedTime,
    /// How many times the alarm went off.
    pub alarms_raised: u64,
}

/// Wires the counters, the alarm, and the display into a running clock.
///
/// [`run`][Self::run] spawns five Tokio tasks: one per counter, the display,
/// and the alarm. They share nothing but the handles created for them here: a
/// carry link from seconds to minutes and one from minutes to hours, the report
/// channel, the alarm signal, and one [`OutputLane`] each for the display and
/// the alarm over the same sink.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use chime::{AlarmClock, ClockConfig, MemorySink, TimeOfDay};
///
/// # async fn example() -> chime::Result<()> {
/// let config = ClockConfig::new("5:59:55".parse()?, "6:0:10".parse()?);
/// let sink = MemorySink::new();
///
/// // Fifteen ticks from a finite source, then the clock winds down.
/// let ticks = futures::stream::iter(std::iter::repeat_n((), 15));
/// let summary = AlarmClock::new(config).run(ticks, Arc::new(sink.clone())).await?;
///
/// assert_eq!(summary.counters.to_string(), "6:0:10");
/// assert_eq!(summary.alarms_raised, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AlarmClock {
    config: ClockConfig,
}

impl AlarmClock {
    /// Creates a clock with the given startup configuration.
    #[must_use]
    pub const fn new(config: ClockConfig) -> Self {
        Self { config }
    }

    /// The startup configuration.
    #[must_use]
    pub const fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// A drift-free tick source on `clock` with the configured period.
    #[must_use]
    pub fn metronome(&self, clock: &Clock) -> Metronome {
        Metronome::new(clock, self.config.period())
    }

    /// Runs the clock until `ticks` ends and everything it set in motion has been printed.
    ///
    /// With a [`Metronome`] this never returns. With a finite source the
    /// cascade winds down in order: seconds, minutes, hours, then the display
    /// once it has drained the channel, and finally the alarm, which still
    /// announces an alarm that completed on the last tick.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Task`][crate::Error::Task] if one of the clock's tasks panicked.
    pub async fn run<T>(&self, ticks: T, sink: Arc<dyn TextSink>) -> Result<RunSummary>
    where
        T: Stream<Item = ()> + Unpin + Send + 'static,
    {
        let start = self.config.start();
        let threshold = self.config.alarm();

        event!(Level::INFO, start = %start, alarm = %threshold, "alarm clock starting");

        let alarm = Arc::new(AlarmSignal::new());
        let (reports, receiver) = report_channel(self.config.report_capacity());
        let (seconds_carry, minutes_trigger) = carry_link(CarryEdge::SecondsToMinutes);
        let (minutes_carry, hours_trigger) = carry_link(CarryEdge::MinutesToHours);

        // Every bit reflects the start time before any counter can move.
        let [seconds, minutes, hours] = TimeUnit::ALL.map(|unit| CascadeCounter::starting_at(unit, start));
        for counter in [&seconds, &minutes, &hours] {
            counter.check_threshold(&threshold, &alarm);
        }

        let links = |carry: Option<CarryOut>, reports: ReportSender| CounterLinks {
            threshold,
            alarm: Arc::clone(&alarm),
            carry,
            reports,
        };

        let alarm_task = tokio::spawn(
            AlarmConsumer::new(
                Arc::clone(&alarm),
                OutputLane::new("alarm", Arc::clone(&sink)),
                self.config.alarm_notice().to_owned(),
            )
            .run(),
        );
        let display_task = tokio::spawn(DisplayConsumer::new(start, receiver, OutputLane::new("display", sink)).run());

        let hours = tokio::spawn(hours.run(hours_trigger, links(None, reports.clone())));
        let minutes = tokio::spawn(minutes.run(minutes_trigger, links(Some(minutes_carry), reports.clone())));
        let seconds = tokio::spawn(seconds.run(ticks, links(Some(seconds_carry), reports)));

        let counters = async { Ok::<_, crate::Error>((seconds.await?, minutes.await?, hours.await?)) }.await;
        let displayed = display_task.await;

        // Every counter has stopped, so no bit can be set any more.
        alarm.close();
        let alarms_raised = alarm_task.await?;

        let (seconds, minutes, hours) = counters?;
        let summary = RunSummary {
            counters: TimeOfDay::new(hours.value(), minutes.value(), seconds.value())?,
            displayed: displayed?,
            alarms_raised,
        };

        event!(
            Level::INFO,
            counters = %summary.counters,
            displayed = %summary.displayed,
            alarms_raised,
            "alarm clock stopped"
        );

        Ok(summary)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;
    use futures::stream;
    use tick::ClockControl;

    use super::*;
    use crate::MemorySink;

    fn at(hours: u32, minutes: u32, seconds: u32) -> TimeOfDay {
        TimeOfDay::new(hours, minutes, seconds).unwrap()
    }

    fn ticks(count: usize) -> impl Stream<Item = ()> + Unpin + Send + 'static {
        stream::iter(std::iter::repeat_n((), count))
    }

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(AlarmClock: Send, Sync);
        static_assertions::assert_impl_all!(RunSummary: Send, Sync);
    }

    #[tokio::test]
    async fn no_ticks_keeps_start() {
        let sink = MemorySink::new();
        let clock = AlarmClock::new(ClockConfig::new(at(12, 34, 56), at(0, 0, 0)));

        let summary = clock.run(ticks(0), Arc::new(sink.clone())).await.unwrap();

        assert_eq!(summary.counters, at(12, 34, 56));
        assert_eq!(summary.alarms_raised, 0);
        assert!(sink.lines().is_empty());
    }

    #[tokio::test]
    async fn alarm_at_start_fires_before_first_tick() {
        let sink = MemorySink::new();
        let clock = AlarmClock::new(ClockConfig::new(at(7, 30, 0), at(7, 30, 0)));

        let summary = clock.run(ticks(0), Arc::new(sink.clone())).await.unwrap();

        assert_eq!(summary.alarms_raised, 1);
        assert_eq!(sink.lines(), ["ALARM"]);
    }

    #[tokio::test]
    async fn metronome_drives_the_clock() {
        let control = ClockControl::new().auto_advance_timers(true);
        let time = control.to_clock();
        let config = ClockConfig::new(at(5, 59, 55), at(6, 0, 10)).with_period(Duration::from_millis(250));
        let clock = AlarmClock::new(config);
        let stopwatch = time.stopwatch();

        let summary = clock
            .run(clock.metronome(&time).take(15), Arc::new(MemorySink::new()))
            .await
            .unwrap();

        assert_eq!(summary.counters, at(6, 0, 10));
        assert_eq!(summary.alarms_raised, 1);
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(250 * 15));
    }

    #[tokio::test]
    async fn metronome_raises_alarm_on_a_carry_tick() {
        for _ in 0..20 {
            let time = ClockControl::new().auto_advance_timers(true).to_clock();
            let clock = AlarmClock::new(ClockConfig::new(at(5, 59, 55), at(6, 0, 0)));

            let summary = clock
                .run(clock.metronome(&time).take(10), Arc::new(MemorySink::new()))
                .await
                .unwrap();

            assert_eq!(summary.counters, at(6, 0, 5));
            assert_eq!(summary.alarms_raised, 1);
        }
    }
}
