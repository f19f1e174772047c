// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use tokio::sync::mpsc;

use crate::TimeUnit;

/// The smallest supported report channel capacity: one slack item per producing counter.
pub const MIN_REPORT_CAPACITY: usize = 3;

/// A counter's new value, emitted each time it advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUpdate {
    unit: TimeUnit,
    value: u32,
}

impl TimeUpdate {
    /// Creates an update reporting that `unit` now holds `value`.
    #[must_use]
    pub const fn new(unit: TimeUnit, value: u32) -> Self {
        Self { unit, value }
    }

    /// The unit that advanced.
    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// The unit's value after advancing.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }
}

/// Creates the bounded channel that carries [`TimeUpdate`]s from the counters to the display.
///
/// All senders share one queue, so updates are received in the order they were
/// sent across every producer. Capacities below [`MIN_REPORT_CAPACITY`] are raised to it.
#[must_use]
pub fn report_channel(capacity: usize) -> (ReportSender, ReportReceiver) {
    let capacity = capacity.max(MIN_REPORT_CAPACITY);
    let (sender, receiver) = mpsc::channel(capacity);

    (ReportSender { sender }, ReportReceiver { receiver, capacity })
}

/// The producing end of the report channel. Cloned once per counter.
#[derive(Debug, Clone)]
pub struct ReportSender {
    sender: mpsc::Sender<TimeUpdate>,
}

impl ReportSender {
    /// Enqueues an update, waiting while the channel is full.
    ///
    /// Returns `false` if the display side has gone away.
    pub async fn send(&self, update: TimeUpdate) -> bool {
        self.sender.send(update).await.is_ok()
    }
}

/// The consuming end of the report channel, owned by the display.
#[derive(Debug)]
pub struct ReportReceiver {
    receiver: mpsc::Receiver<TimeUpdate>,
    capacity: usize,
}

impl ReportReceiver {
    /// The channel's capacity after clamping.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Receives the next update, or `None` once every sender is gone and the queue is empty.
    pub async fn recv(&mut self) -> Option<TimeUpdate> {
        self.receiver.recv().await
    }

    /// Waits for at least one update, then appends every update currently queued to `batch`.
    ///
    /// Returns the number of updates appended; zero means every sender is gone
    /// and the queue is drained.
    pub async fn recv_batch(&mut self, batch: &mut Vec<TimeUpdate>) -> usize {
        let mut received = self.receiver.recv_many(batch, self.capacity).await;

        // `recv_many` stops at the limit; anything queued behind it belongs to this batch too.
        while let Ok(update) = self.receiver.try_recv() {
            batch.push(update);
            received += 1;
        }

        received
    }
}
