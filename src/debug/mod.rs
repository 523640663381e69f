// src/debug/mod.rs

//! The `debug` module is macros for printing user-facing errors and
//! functions for printing in debug builds and test builds.

#[cfg(test)]
pub mod helpers;

pub mod printers;
