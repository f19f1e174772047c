// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! End-to-end runs of the whole clock on finite tick sources.

use std::sync::Arc;

use chime::{AlarmClock, ClockConfig, MemorySink, RunSummary, TimeOfDay};
use futures::stream;

const RUNS: usize = 50;

fn at(hours: u32, minutes: u32, seconds: u32) -> TimeOfDay {
    TimeOfDay::new(hours, minutes, seconds).unwrap()
}

async fn run_clock(config: ClockConfig, ticks: usize) -> (RunSummary, Vec<String>) {
    let sink = MemorySink::new();
    let summary = AlarmClock::new(config)
        .run(stream::iter(std::iter::repeat_n((), ticks)), Arc::new(sink.clone()))
        .await
        .unwrap();

    (summary, sink.lines())
}

fn alarm_lines(lines: &[String], notice: &str) -> usize {
    lines.iter().filter(|line| *line == notice).count()
}

/// Runs the same clock repeatedly and checks every run raised `expected` alarms.
async fn assert_alarms(start: TimeOfDay, alarm: TimeOfDay, ticks: usize, expected: u64) {
    for run in 0..RUNS {
        let (summary, lines) = run_clock(ClockConfig::new(start, alarm), ticks).await;

        assert_eq!(summary.alarms_raised, expected, "run {run} from {start} with the alarm at {alarm}");
        assert_eq!(u64::try_from(alarm_lines(&lines, "ALARM")).unwrap(), expected);
    }
}

#[tokio::test]
async fn alarm_fires_once_fifteen_seconds_in() {
    let (summary, lines) = run_clock(ClockConfig::new(at(5, 59, 55), at(6, 0, 10)), 15).await;

    assert_eq!(summary.counters, at(6, 0, 10));
    assert_eq!(summary.displayed.to_string(), "6:0:10");
    assert!(summary.displayed.hours_agree());
    assert_eq!(summary.alarms_raised, 1);
    assert_eq!(alarm_lines(&lines, "ALARM"), 1);

    let last_display = lines.iter().rev().find(|line| *line != "ALARM").unwrap();
    assert_eq!(last_display, "6:0:10");
}

#[tokio::test]
async fn fifth_tick_moves_minutes_and_hours() {
    let (summary, lines) = run_clock(ClockConfig::new(at(5, 59, 55), at(6, 0, 10)), 5).await;

    assert_eq!(summary.counters, at(6, 0, 0));
    assert_eq!(summary.displayed.to_string(), "6:0:0");
    assert_eq!(summary.displayed.relayed_hours(), 6);
    assert_eq!(lines.last().map(String::as_str), Some("6:0:0"));
    assert_eq!(summary.alarms_raised, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn alarm_fires_once_on_many_threads() {
    assert_alarms(at(5, 59, 55), at(6, 0, 10), 15, 1).await;
}

#[tokio::test]
async fn alarm_on_a_carry_tick() {
    assert_alarms(at(5, 59, 55), at(6, 0, 0), 10, 1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn alarm_on_a_carry_tick_on_many_threads() {
    assert_alarms(at(5, 59, 55), at(6, 0, 0), 10, 1).await;
}

#[tokio::test]
async fn start_past_the_alarm_in_the_same_minute() {
    // Minutes and hours match from the start; 5:31:0 must not complete the alarm.
    assert_alarms(at(5, 30, 30), at(5, 30, 0), 30, 0).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn start_past_the_alarm_in_the_same_minute_on_many_threads() {
    assert_alarms(at(5, 30, 30), at(5, 30, 0), 30, 0).await;
}

#[tokio::test]
async fn start_past_the_alarm_in_the_same_hour() {
    // Hours matches from the start; 6:0:0 must not complete the 5:0:0 alarm.
    assert_alarms(at(5, 59, 55), at(5, 0, 0), 5, 0).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn start_past_the_alarm_in_the_same_hour_on_many_threads() {
    assert_alarms(at(5, 59, 55), at(5, 0, 0), 5, 0).await;
}

#[tokio::test]
async fn one_tick_short_of_the_alarm_stays_quiet() {
    let (summary, lines) = run_clock(ClockConfig::new(at(5, 59, 55), at(6, 0, 10)), 14).await;

    assert_eq!(summary.counters, at(6, 0, 9));
    assert_eq!(summary.alarms_raised, 0);
    assert_eq!(alarm_lines(&lines, "ALARM"), 0);
}

#[tokio::test]
async fn alarm_does_not_refire_in_the_following_hours() {
    // Two hours and a bit past 6:30:10; 7:30:10 and 8:30:10 must stay quiet.
    let (summary, _) = run_clock(ClockConfig::new(at(6, 29, 0), at(6, 30, 10)), 2 * 3600 + 600).await;

    assert_eq!(summary.counters, at(8, 39, 0));
    assert_eq!(summary.alarms_raised, 1);
}

#[tokio::test]
async fn alarm_fires_again_the_next_day() {
    let (summary, _) = run_clock(ClockConfig::new(at(23, 59, 58), at(0, 0, 0)), 86_400 + 2).await;

    assert_eq!(summary.counters, at(0, 0, 0));
    assert_eq!(summary.alarms_raised, 2);
}

#[tokio::test]
async fn custom_notice_is_printed() {
    let config = ClockConfig::new(at(23, 59, 59), at(0, 0, 0)).with_alarm_notice("wake up");

    let (summary, lines) = run_clock(config, 1).await;

    assert_eq!(summary.counters, TimeOfDay::MIDNIGHT);
    assert_eq!(summary.alarms_raised, 1);
    assert_eq!(alarm_lines(&lines, "wake up"), 1);
    assert_eq!(alarm_lines(&lines, "ALARM"), 0);
}

#[tokio::test]
async fn larger_report_queue_changes_nothing_visible() {
    let config = ClockConfig::new(at(5, 59, 55), at(6, 0, 10)).with_report_capacity(64);

    let (summary, lines) = run_clock(config, 15).await;

    assert_eq!(summary.displayed.to_string(), "6:0:10");
    assert_eq!(alarm_lines(&lines, "ALARM"), 1);
}
