// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! The concurrency core of an alarm clock: a seconds, minutes, and hours
//! cascade that raises a composite alarm and feeds a display without letting
//! the display hold up the counters.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use chime::{AlarmClock, ClockConfig, StdoutSink, TimeOfDay};
//! use tick::Clock;
//!
//! #[tokio::main]
//! async fn main() -> chime::Result<()> {
//!     let config = ClockConfig::new(TimeOfDay::new(5, 59, 55)?, TimeOfDay::new(6, 0, 10)?);
//!     let alarm_clock = AlarmClock::new(config);
//!
//!     let clock = Clock::new_tokio();
//!     alarm_clock.run(alarm_clock.metronome(&clock), Arc::new(StdoutSink)).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Overview
//!
//! - [`Metronome`] - A drift-free periodic tick source built on [`tick::Clock`].
//! - [`CascadeCounter`] - One unit of the cascade. Checks its value against the
//!   alarm, waits for its trigger, advances, carries on overflow, and reports.
//! - [`carry_link`] - The directed link from one counter to the next. A carry is
//!   a rendezvous: the sender waits until the next unit has settled.
//! - [`AlarmSignal`] - Three alarm bits that release a waiter only when all are set.
//! - [`report_channel`] - The bounded queue of [`TimeUpdate`]s shared by the counters.
//! - [`DisplayConsumer`] - Drains updates in batches and prints `H:M:S`.
//! - [`AlarmConsumer`] - Waits on the alarm signal and prints a notice.
//! - [`OutputLane`] - One consumer's locked path to the shared [`TextSink`].
//! - [`AlarmClock`] - Wires all of the above together from a [`ClockConfig`].
//!
//! # Task Structure
//!
//! ```text
//!  Metronome ─► seconds ─carry─► minutes ─carry─► hours
//!                  │ ╲              │ ╲              │ ╲
//!                  │  alarm bit     │  alarm bit     │  alarm bit ──► alarm signal ─► alarm ──► alarm lane ─┐
//!                  ▼                ▼                ▼                                                     ├─► sink
//!              ──────────────── report channel ───────────► display ──► display lane ─────────────────────┘
//! ```
//!
//! Each box is its own task. The tasks share only the handles drawn here, and
//! each handle synchronizes internally; no caller holds a lock across an
//! operation on the signal or the channel.
//!
//! # When the Alarm Fires
//!
//! Every counter keeps its alarm bit in step with the value it holds: a match
//! sets the bit, a mismatch withdraws it. A wrapping counter withdraws its bit,
//! carries, and waits until the units above it have settled before it checks
//! its new value, so the bits never mix the time before a carry with the time
//! after it. The set that completes all three bits records the alarm, which
//! therefore fires exactly for the configured instant whatever the start time.
//!
//! # Testing
//!
//! A counter is driven by any `Stream<Item = ()>`. Tests feed a finite stream
//! (or a [`Metronome`] on a `tick::ClockControl` clock) and the clock winds
//! down by itself once the stream ends; [`AlarmClock::run`] then returns a
//! [`RunSummary`]. [`MemorySink`] records what was printed.

mod alarm;
mod alarm_signal;
mod carry;
mod clock;
mod config;
mod counter;
mod display;
mod error;
mod metronome;
mod report;
mod sink;
mod time_of_day;
mod unit;

pub use alarm::{AlarmConsumer, DEFAULT_ALARM_NOTICE};
pub use alarm_signal::AlarmSignal;
pub use carry::{Carry, CarryEdge, CarryIn, CarryOut, carry_link};
pub use clock::{AlarmClock, RunSummary};
pub use config::ClockConfig;
pub use counter::{Advance, CascadeCounter, CounterLinks};
pub use display::{DisplayConsumer, DisplayedTime};
pub use error::{Error, Result};
pub use metronome::{MIN_PERIOD, Metronome};
pub use report::{MIN_REPORT_CAPACITY, ReportReceiver, ReportSender, TimeUpdate, report_channel};
pub use sink::{MemorySink, OutputLane, StdoutSink, TextSink};
pub use time_of_day::TimeOfDay;
pub use unit::TimeUnit;
