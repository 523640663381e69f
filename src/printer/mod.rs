// src/printer/mod.rs

//! Printing functions and helpers.
//!
//! Includes printing of [`GapRecord`s] and the `--summary` and
//! `--report-interval` output.
//!
//! [`GapRecord`s]: crate::readers::gapprocessor::GapRecord

pub mod printers;
pub mod summary;
