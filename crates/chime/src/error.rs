// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

use crate::TimeUnit;

/// A specialized `Result` type for operations that return a chime [`Error`][enum@Error] on failure.
pub type Result<T> = std::result::Result<T, Error>;

/// An error originating in the clock core.
///
/// Configuration problems are reported when the clock is set up, so a running
/// cascade never observes a value outside its unit's range. Output failures are
/// reported to the caller of [`OutputLane::write_line`][crate::OutputLane::write_line]
/// and never stop a running consumer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A start or alarm value does not fit the unit it was given for.
    #[error("{value} is out of range for {unit} (expected 0..{modulus})", modulus = .unit.modulus())]
    OutOfRange {
        /// The unit the value was supplied for.
        unit: TimeUnit,
        /// The rejected value.
        value: u32,
    },

    /// Text could not be parsed as an `H:M:S` time of day.
    #[error("invalid time of day: {0}")]
    Parse(String),

    /// The text sink rejected a line.
    #[error("text sink rejected a line")]
    Sink(#[from] std::io::Error),

    /// A clock task panicked or was cancelled before it finished.
    #[error(transparent)]
    Task(#[from] tokio::task::JoinError),
}
