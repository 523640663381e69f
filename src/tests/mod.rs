// src/tests/mod.rs

//! Tests for _loggaplib_.
//!
//! Tests are placed at `src/tests/`, inside the `loggaplib`. The author
//! concluded this is a reasonable trade-off of separation and access.
//!
//! Tests placed at top-level path `tests/` do not have crate-internal
//! visibility. While it is recommended to not require internal visibility for
//! testing, in practice that often makes tests difficult or impossible to
//! implement.

pub mod common;
pub mod datetime_tests;
pub mod fieldselect_tests;
pub mod record_tests;
