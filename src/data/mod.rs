// src/data/mod.rs

//! The `data` module is specialized data containers and the operations on
//! them: [`Record`]s, [`FieldSelection`]s, datetimes, and the
//! [`GapWindow`].
//!
//! ## Definitions of data
//!
//! ### Record
//!
//! A "record" is one line of input, without the line ending. A record is
//! split into "fields" by a [`Delimiter`].
//!
//! A `Record` represents a "log message".
//!
//! ### Field selection
//!
//! A "field selection" is a `cut`-style expression like `1,3-4` that picks
//! the fields of a record holding the datetime. The picked fields, joined
//! by a single space, are the "datetime substring".
//!
//! ### Gap
//!
//! A "gap" is the signed count of whole seconds between the datetimes of
//! two consecutive records. Recent gaps are held in a [`GapWindow`].
//!
//! [`Record`]: crate::data::record::Record
//! [`Delimiter`]: crate::data::record::Delimiter
//! [`FieldSelection`]: crate::data::fieldselect::FieldSelection
//! [`GapWindow`]: crate::data::gapwindow::GapWindow

pub mod datetime;
pub mod fieldselect;
pub mod gapwindow;
pub mod record;
