// src/readers/summary.rs

//! Implements the periodic [`Snapshot`] and the end-of-run
//! [`SummaryGapProcessor`] statistics tracking structs.

#![allow(non_snake_case)]

use crate::common::Count;
use crate::data::datetime::DateTimeLOpt;

use std::time::{Duration, Instant};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Snapshot
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Progress of a [`GapProcessor`] at one moment. For CLI option
/// `--report-interval`.
///
/// [`GapProcessor`]: crate::readers::gapprocessor::GapProcessor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    /// datetime of the most recent record
    pub dt_last: DateTimeLOpt,
    /// count of lines processed so far
    pub lines: Count,
    /// window mean
    pub mean: f64,
    /// window population standard deviation
    pub stddev: f64,
}

/// Decides when a [`Snapshot`] is due; every `interval` of wall-clock time.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotTimer {
    interval: Duration,
    last: Instant,
}

impl SnapshotTimer {
    pub fn new(interval: Duration, start: Instant) -> SnapshotTimer {
        SnapshotTimer {
            interval,
            last: start,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` if at least `interval` has passed since the last time
    /// this returned `true` (or since `start`). Resets the timer when `true`.
    pub fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) < self.interval {
            return false;
        }
        defñ!("due; interval {:?}", self.interval);
        self.last = now;

        true
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SummaryGapProcessor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Accumulated statistics about processing by a [`GapProcessor`].
///
/// For CLI option `--summary`.
///
/// [`GapProcessor`]: crate::readers::gapprocessor::GapProcessor
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SummaryGapProcessor {
    /// lines passed to `process_line`
    pub GapProcessor_lines: Count,
    /// records skipped (pattern did not match and `--stop-caring`)
    pub GapProcessor_skipped: Count,
    /// gaps pushed into the window
    pub GapProcessor_gaps_pushed: Count,
    /// gaps given a normal or aberrant verdict
    pub GapProcessor_gaps_evaluated: Count,
    /// gaps given an aberrant verdict
    pub GapProcessor_gaps_aberrant: Count,
    /// records marked for output
    pub GapProcessor_emitted: Count,
    /// datetime of the first record
    pub GapProcessor_dt_first: DateTimeLOpt,
    /// datetime of the last record
    pub GapProcessor_dt_last: DateTimeLOpt,
    /// window capacity
    pub GapProcessor_window: usize,
    /// has the window ever been full?
    pub GapProcessor_window_filled: bool,
    /// final window mean
    pub GapProcessor_mean: f64,
    /// final window population standard deviation
    pub GapProcessor_stddev: f64,
}
