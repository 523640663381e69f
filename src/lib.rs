// src/lib.rs

//! _loggaplib_ finds service gaps in log files.
//!
//! Each line of a log is a record. A datetime is extracted from each record,
//! see [`DateTimeExtractor`]. The gap in seconds between consecutive
//! records is classified against a sliding window of recent gaps, see
//! [`GapWindow`]. Processing of the stream of records is driven by a
//! [`GapProcessor`].
//!
//! [`DateTimeExtractor`]: crate::data::datetime::DateTimeExtractor
//! [`GapWindow`]: crate::data::gapwindow::GapWindow
//! [`GapProcessor`]: crate::readers::gapprocessor::GapProcessor

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
