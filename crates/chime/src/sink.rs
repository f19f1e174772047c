// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// A destination that writes whole lines of text.
///
/// Implementations write each line atomically with respect to themselves.
/// Ordering between the display and the alarm is arranged by [`OutputLane`].
pub trait TextSink: Send + Sync {
    /// Writes `text` followed by a line terminator.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the line could not be written.
    fn write_line(&self, text: &str) -> io::Result<()>;
}

/// Writes lines to the process's standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl TextSink for StdoutSink {
    fn write_line(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()
    }
}

/// Records lines in memory.
///
/// Clones share the same record, so one handle can be given to a clock while
/// another is kept to read what was written.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every line written so far, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl TextSink for MemorySink {
    fn write_line(&self, text: &str) -> io::Result<()> {
        self.lines.lock().push(text.to_owned());
        Ok(())
    }
}

/// One consumer's serialized path to a shared [`TextSink`].
///
/// Each lane owns its own lock. Lines written through one lane never
/// interleave with each other, and a slow writer on one lane never holds up
/// the other lane.
#[derive(Clone)]
pub struct OutputLane {
    name: Cow<'static, str>,
    sink: Arc<dyn TextSink>,
    lock: Arc<Mutex<()>>,
}

impl OutputLane {
    /// Creates a lane over `sink` with its own lock.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, sink: Arc<dyn TextSink>) -> Self {
        Self {
            name: name.into(),
            sink,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// The lane's name, used in log events.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes one line while holding this lane's lock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sink`][crate::Error::Sink] if the sink rejected the line.
    pub fn write_line(&self, text: &str) -> crate::Result<()> {
        let _guard = self.lock.lock();
        self.sink.write_line(text)?;
        Ok(())
    }
}

impl std::fmt::Debug for OutputLane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputLane").field("name", &self.name).finish_non_exhaustive()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::Error;

    /// Fails every write and counts the attempts that reached it.
    #[derive(Debug, Default)]
    struct BrokenSink(AtomicUsize);

    impl TextSink for BrokenSink {
        fn write_line(&self, _text: &str) -> io::Result<()> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Err(io::Error::other("unplugged"))
        }
    }

    /// Records whether two writes were ever inside the sink at the same time.
    #[derive(Debug, Default)]
    struct OverlapRecorder {
        inside: AtomicUsize,
        overlapped: AtomicUsize,
    }

    impl TextSink for OverlapRecorder {
        fn write_line(&self, _text: &str) -> io::Result<()> {
            if self.inside.fetch_add(1, Ordering::SeqCst) > 0 {
                self.overlapped.fetch_add(1, Ordering::SeqCst);
            }
            thread::yield_now();
            self.inside.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(OutputLane: Send, Sync, Clone);
        static_assertions::assert_impl_all!(MemorySink: Send, Sync, Clone);
        static_assertions::assert_impl_all!(StdoutSink: Send, Sync);
    }

    #[test]
    fn memory_sink_clones_share_lines() {
        let sink = MemorySink::new();
        let lane = OutputLane::new("display", Arc::new(sink.clone()));

        lane.write_line("5:59:56").unwrap();
        lane.write_line("5:59:57").unwrap();

        assert_eq!(sink.lines(), ["5:59:56", "5:59:57"]);
    }

    #[test]
    fn lane_reports_sink_failure() {
        let sink = Arc::new(BrokenSink::default());
        let lane = OutputLane::new("alarm", Arc::clone(&sink) as Arc<dyn TextSink>);

        assert!(matches!(lane.write_line("ALARM"), Err(Error::Sink(_))));
        assert!(matches!(lane.write_line("ALARM"), Err(Error::Sink(_))));
        assert_eq!(sink.0.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn one_lane_serializes_its_writers() {
        let recorder = Arc::new(OverlapRecorder::default());
        let lane = OutputLane::new("display", Arc::clone(&recorder) as Arc<dyn TextSink>);

        thread::scope(|scope| {
            for _ in 0..4 {
                let lane = lane.clone();
                scope.spawn(move || {
                    for _ in 0..200 {
                        lane.write_line("tick").unwrap();
                    }
                });
            }
        });

        assert_eq!(recorder.overlapped.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn lanes_do_not_share_a_lock() {
        let sink: Arc<dyn TextSink> = Arc::new(MemorySink::new());
        let display = OutputLane::new("display", Arc::clone(&sink));
        let alarm = OutputLane::new("alarm", sink);

        let _held = display.lock.lock();

        // Would deadlock if both lanes used the same lock.
        alarm.write_line("ALARM").unwrap();
        assert_eq!(alarm.name(), "alarm");
    }
}
