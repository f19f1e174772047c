// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Runs the alarm clock on the wall clock and prints to stdout.
//!
//! ```text
//! cargo run --example alarm_clock -- [START [ALARM]]
//! ```
//!
//! Both times are `H:M:S`. They default to 5:59:55 and 6:0:10, which raises the
//! alarm fifteen seconds in. Set `RUST_LOG=chime=debug` to watch the carries.

use std::sync::Arc;

use chime::{AlarmClock, ClockConfig, StdoutSink, TimeOfDay};
use tick::Clock;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let start: TimeOfDay = args.next().as_deref().unwrap_or("5:59:55").parse()?;
    let alarm: TimeOfDay = args.next().as_deref().unwrap_or("6:0:10").parse()?;

    let alarm_clock = AlarmClock::new(ClockConfig::new(start, alarm));

    // The metronome never ends, so this runs until the process is interrupted.
    let clock = Clock::new_tokio();
    alarm_clock.run(alarm_clock.metronome(&clock), Arc::new(StdoutSink)).await?;

    Ok(())
}
