// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::{mpsc, oneshot};

use crate::TimeUnit;

/// An edge of the cascade along which one unit carries into the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarryEdge {
    /// Seconds wrapping advance minutes.
    SecondsToMinutes,
    /// Minutes wrapping advance hours.
    MinutesToHours,
}

impl CarryEdge {
    /// Both edges, in cascade order.
    pub const ALL: [Self; 2] = [Self::SecondsToMinutes, Self::MinutesToHours];

    /// The unit whose overflow travels along this edge.
    #[must_use]
    pub const fn from(self) -> TimeUnit {
        match self {
            Self::SecondsToMinutes => TimeUnit::Seconds,
            Self::MinutesToHours => TimeUnit::Minutes,
        }
    }

    /// The unit this edge advances.
    #[must_use]
    pub const fn to(self) -> TimeUnit {
        match self {
            Self::SecondsToMinutes => TimeUnit::Minutes,
            Self::MinutesToHours => TimeUnit::Hours,
        }
    }
}

/// Creates the directed link for `edge`.
///
/// A carry is a rendezvous. [`CarryOut::carry`] resolves only once the
/// receiving counter has released the [`Carry`] it was handed, which a
/// [`CascadeCounter`][crate::CascadeCounter] does after it has advanced,
/// passed on its own carry, re-checked its alarm bit, and reported. The
/// carrying counter therefore never looks at its own new value while the
/// units above it are still catching up.
#[must_use]
pub fn carry_link(edge: CarryEdge) -> (CarryOut, CarryIn) {
    let (sender, receiver) = mpsc::channel(1);

    (CarryOut { edge, sender }, CarryIn { edge, receiver })
}

/// One carry in flight.
///
/// Dropping it releases the counter that sent it.
#[derive(Debug)]
pub struct Carry {
    _released: oneshot::Sender<()>,
}

/// The sending end of a carry link, owned by the overflowing counter.
#[derive(Debug)]
pub struct CarryOut {
    edge: CarryEdge,
    sender: mpsc::Sender<Carry>,
}

impl CarryOut {
    /// The edge this link implements.
    #[must_use]
    pub const fn edge(&self) -> CarryEdge {
        self.edge
    }

    /// The unit whose overflow this link reports.
    #[must_use]
    pub const fn from(&self) -> TimeUnit {
        self.edge.from()
    }

    /// The unit this link advances.
    #[must_use]
    pub const fn to(&self) -> TimeUnit {
        self.edge.to()
    }

    /// Delivers one carry and waits until the receiving counter releases it.
    ///
    /// Returns `false` if the receiving counter had already stopped.
    pub async fn carry(&self) -> bool {
        let (released, on_release) = oneshot::channel();

        if self.sender.send(Carry { _released: released }).await.is_err() {
            return false;
        }

        // The sender half never sends; the wait ends when the carry is dropped.
        let _ = on_release.await;
        true
    }
}

/// The receiving end of a carry link; a stream that yields once per carry.
///
/// The stream ends after the sending counter has stopped and every carry it
/// sent has been received.
#[derive(Debug)]
pub struct CarryIn {
    edge: CarryEdge,
    receiver: mpsc::Receiver<Carry>,
}

impl CarryIn {
    /// The edge this link implements.
    #[must_use]
    pub const fn edge(&self) -> CarryEdge {
        self.edge
    }

    /// The unit whose overflow drives this stream.
    #[must_use]
    pub const fn from(&self) -> TimeUnit {
        self.edge.from()
    }

    /// The unit this stream drives.
    #[must_use]
    pub const fn to(&self) -> TimeUnit {
        self.edge.to()
    }
}

impl Stream for CarryIn {
    type Item = Carry;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
