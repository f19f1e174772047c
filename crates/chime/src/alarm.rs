// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{Level, event};

use crate::{AlarmSignal, OutputLane};

/// The notice written when the alarm goes off, unless configured otherwise.
pub const DEFAULT_ALARM_NOTICE: &str = "ALARM";

/// Waits for the alarm condition and announces it.
#[derive(Debug)]
pub struct AlarmConsumer {
    signal: Arc<AlarmSignal>,
    lane: OutputLane,
    notice: Cow<'static, str>,
}

impl AlarmConsumer {
    /// Creates a consumer that writes `notice` to `lane` each time `signal` completes.
    #[must_use]
    pub fn new(signal: Arc<AlarmSignal>, lane: OutputLane, notice: impl Into<Cow<'static, str>>) -> Self {
        Self {
            signal,
            lane,
            notice: notice.into(),
        }
    }

    /// Runs until the signal is closed, then returns how many alarms were raised.
    ///
    /// An alarm whose notice could not be written still counts as raised.
    pub async fn run(self) -> u64 {
        let mut raised = 0_u64;

        while self.signal.wait_all_and_clear().await {
            raised = raised.saturating_add(1);
            event!(Level::INFO, raised, "alarm raised");

            if let Err(error) = self.lane.write_line(&self.notice) {
                event!(Level::WARN, lane = self.lane.name(), %error, "alarm notice was not written");
            }
        }

        raised
    }
}
