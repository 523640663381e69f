// src/data/fieldselect.rs

//! Parse and apply a _cut_-style field selection expression, e.g. `"1,3-4,6-"`.
//!
//! A [`FieldSelection`] is parsed once from the user-passed expression then
//! resolved against each log message [`Record`] to a deduplicated, ascending
//! list of 1-based field indexes. The selected fields are joined with
//! [`FIELD_JOIN_SEP`] to become the datetime substring of that log message.
//!
//! [`Record`]: crate::data::record::Record

use crate::common::{FieldIndex, FieldIndexes};

use std::fmt;

use ::itertools::Itertools; // for `sorted_unstable`, `dedup`
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Separator placed between selected fields when joined into a datetime
/// substring.
pub const FIELD_JOIN_SEP: &str = " ";

/// Separator of range tokens in a field selection expression.
pub const FIELD_RANGE_SEP: char = ',';

const CGN_BEGIN: &str = "begin";
const CGN_DASH: &str = "dash";
const CGN_END: &str = "end";

lazy_static! {
    /// One comma-separated token of a field selection expression;
    /// `N`, `M-`, `-N`, or `M-N`.
    static ref REGEX_FIELD_RANGE: Regex = {
        defñ!("lazy_static! REGEX_FIELD_RANGE");

        Regex::new(r"^(?P<begin>[0-9]+)?(?P<dash>-)?(?P<end>[0-9]+)?$").unwrap()
    };
}

/// One range of fields within a [`FieldSelection`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldRange {
    /// `N`; a single field
    Index(FieldIndex),
    /// `M-`; field `M` through the last field
    From(FieldIndex),
    /// `-N`; the first field through field `N`
    To(FieldIndex),
    /// `M-N`; field `M` through field `N`, `M ≤ N`
    Between(FieldIndex, FieldIndex),
}

impl FieldRange {
    /// Iterate the 1-based field indexes of this range for a log message
    /// with `field_count` fields.
    ///
    /// Only `From` is bounded by `field_count`.
    pub fn indexes(&self, field_count: usize) -> std::ops::RangeInclusive<FieldIndex> {
        match *self {
            FieldRange::Index(n) => n..=n,
            FieldRange::From(m) => m..=field_count,
            FieldRange::To(n) => 1..=n,
            FieldRange::Between(m, n) => m..=n,
        }
    }

    /// Like [`indexes`] but no index exceeds `field_count`.
    ///
    /// [`indexes`]: FieldRange::indexes
    pub fn indexes_bounded(&self, field_count: usize) -> std::ops::RangeInclusive<FieldIndex> {
        match *self {
            FieldRange::Index(n) if n > field_count => 1..=0,
            FieldRange::Index(n) => n..=n,
            FieldRange::From(m) => m..=field_count,
            FieldRange::To(n) => 1..=n.min(field_count),
            FieldRange::Between(m, n) => m..=n.min(field_count),
        }
    }
}

/// Errors from parsing a field selection expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldParseError {
    /// the expression was empty
    Empty,
    /// a token was not one of `N`, `M-`, `-N`, `M-N`
    BadToken(String),
    /// field indexes are 1-based, `0` was passed
    ZeroIndex(String),
    /// a `M-N` token where `M > N`
    RangeOrder(FieldIndex, FieldIndex),
}

impl fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldParseError::Empty => write!(f, "field expression is empty"),
            FieldParseError::BadToken(token) => {
                write!(f, "unrecognized field range {:?}; expected N, M-, -N, or M-N", token)
            }
            FieldParseError::ZeroIndex(token) => {
                write!(f, "field range {:?} has index 0; fields are numbered from 1", token)
            }
            FieldParseError::RangeOrder(m, n) => {
                write!(f, "field range \"{}-{}\" is decreasing; {} must be ≤ {}", m, n, m, n)
            }
        }
    }
}

impl std::error::Error for FieldParseError {}

/// Parse one token, e.g. `"3-5"`, into a `FieldRange`.
fn token_to_fieldrange(token: &str) -> Result<FieldRange, FieldParseError> {
    defn!("({:?})", token);
    let captures = match REGEX_FIELD_RANGE.captures(token) {
        Some(captures) => captures,
        None => {
            defx!("no match");
            return Err(FieldParseError::BadToken(token.to_string()));
        }
    };
    let to_index = |name: &str| -> Result<Option<FieldIndex>, FieldParseError> {
        match captures.name(name) {
            Some(match_) => match match_.as_str().parse::<FieldIndex>() {
                Ok(0) => Err(FieldParseError::ZeroIndex(token.to_string())),
                Ok(val) => Ok(Some(val)),
                // too many digits
                Err(_) => Err(FieldParseError::BadToken(token.to_string())),
            },
            None => Ok(None),
        }
    };
    let begin = to_index(CGN_BEGIN)?;
    let end = to_index(CGN_END)?;
    let dash = captures.name(CGN_DASH).is_some();
    let fieldrange = match (begin, dash, end) {
        (Some(n), false, None) => FieldRange::Index(n),
        (Some(m), true, None) => FieldRange::From(m),
        (None, true, Some(n)) => FieldRange::To(n),
        (Some(m), true, Some(n)) => {
            if m > n {
                defx!("RangeOrder({}, {})", m, n);
                return Err(FieldParseError::RangeOrder(m, n));
            }
            FieldRange::Between(m, n)
        }
        // `"-"`, `""`, or `"12"` matched as `begin` then `end`
        _ => {
            defx!("bad token");
            return Err(FieldParseError::BadToken(token.to_string()));
        }
    };
    defx!("return {:?}", fieldrange);

    Ok(fieldrange)
}

/// A parsed field selection expression; a set of [`FieldRange`].
///
/// Immutable after creation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldSelection {
    ranges: Vec<FieldRange>,
}

impl FieldSelection {
    /// Parse a comma-separated field selection expression, e.g.
    /// `"1,3-4,6-"`.
    pub fn new(expression: &str) -> Result<FieldSelection, FieldParseError> {
        defn!("({:?})", expression);
        if expression.trim().is_empty() {
            defx!("Empty");
            return Err(FieldParseError::Empty);
        }
        let mut ranges: Vec<FieldRange> = Vec::with_capacity(expression.len() / 2 + 1);
        for token in expression.split(FIELD_RANGE_SEP) {
            ranges.push(token_to_fieldrange(token.trim())?);
        }
        defx!("ranges {:?}", ranges);

        Ok(FieldSelection { ranges })
    }

    pub fn ranges(&self) -> &[FieldRange] {
        &self.ranges
    }

    /// Resolve to a deduplicated, ascending list of 1-based field indexes for
    /// a log message with `field_count` fields.
    ///
    /// Indexes are not checked against `field_count`, so the result may
    /// refer to fields that do not exist; see [`apply_indexes`].
    pub fn resolve(&self, field_count: usize) -> FieldIndexes {
        self.ranges
            .iter()
            .flat_map(|fieldrange| fieldrange.indexes(field_count))
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Like [`resolve`] but only indexes of existing fields, so the cost
    /// follows `field_count` and not the width of the ranges.
    ///
    /// [`resolve`]: FieldSelection::resolve
    pub fn resolve_bounded(&self, field_count: usize) -> FieldIndexes {
        self.ranges
            .iter()
            .flat_map(|fieldrange| fieldrange.indexes_bounded(field_count))
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Resolve then apply this selection to the `fields` of one log message.
    ///
    /// Returns `None` if no selected field exists, in which case the caller
    /// uses the entire log message.
    pub fn apply(&self, fields: &[&str]) -> Option<String> {
        let indexes = self.resolve_bounded(fields.len());

        apply_indexes(fields, &indexes)
    }
}

/// Parse `expression` and resolve it for a log message with `field_count`
/// fields. See [`FieldSelection::resolve`].
pub fn resolve(expression: &str, field_count: usize) -> Result<FieldIndexes, FieldParseError> {
    let selection = FieldSelection::new(expression)?;

    Ok(selection.resolve(field_count))
}

/// Join the `fields` at the 1-based `indexes` with [`FIELD_JOIN_SEP`].
///
/// Indexes beyond the end of `fields` are ignored. If no index refers to an
/// existing field then return `None`.
pub fn apply_indexes(
    fields: &[&str],
    indexes: &[FieldIndex],
) -> Option<String> {
    defn!("(fields {:?}, indexes {:?})", fields, indexes);
    let selected: Vec<&str> = indexes
        .iter()
        .filter(|index| **index <= fields.len())
        .map(|index| fields[*index - 1])
        .collect();
    if selected.is_empty() {
        defx!("return None");
        return None;
    }
    let joined = selected.join(FIELD_JOIN_SEP);
    defx!("return {:?}", joined);

    Some(joined)
}
