// src/readers/mod.rs

//! "Readers" for processing a stream of log messages.
//!
//! A [`GapProcessor`] is passed one line at a time. It extracts a
//! datetime from each line, computes the gap from the prior line, and
//! classifies that gap against a [`GapWindow`] of recent gaps.
//!
//! _The "Readers" are not rust "Readers"; "_Reader_" structs do not
//! implement the trait [`Read`]. These are "readers" in an informal sense._
//!
//! [`GapProcessor`]: crate::readers::gapprocessor::GapProcessor
//! [`GapWindow`]: crate::data::gapwindow::GapWindow
//! [`Read`]: std::io::Read

pub mod gapprocessor;
pub mod helpers;
pub mod summary;
