// src/data/record.rs

//! Implement [`Record`], one log message (one line of text), and the
//! [`Delimiter`] that splits it into fields.

#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;

use std::fmt;
use std::ops::Range;

use ::once_cell::unsync::OnceCell;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Delimiter value that means "split on runs of whitespace", like `awk`.
pub const DELIMITER_WHITESPACE: &str = " ";

/// How a [`Record`] is split into fields.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Delimiter {
    /// Split on runs of whitespace; leading and trailing whitespace does not
    /// create empty fields.
    Whitespace,
    /// Split on each occurrence of the string; adjacent delimiters create
    /// empty fields, like `cut`.
    Str(String),
}

impl Delimiter {
    /// Create a `Delimiter` from the user-passed string.
    ///
    /// Returns `None` for an empty string.
    pub fn new(delimiter: &str) -> Option<Delimiter> {
        match delimiter {
            "" => None,
            DELIMITER_WHITESPACE => Some(Delimiter::Whitespace),
            _ => Some(Delimiter::Str(String::from(delimiter))),
        }
    }

    /// Byte ranges of each field within `line`.
    fn split(&self, line: &str) -> Vec<Range<usize>> {
        // offsets are found from the pointer of each sub-slice
        let base = line.as_ptr() as usize;
        let to_range = |field: &str| -> Range<usize> {
            let start = field.as_ptr() as usize - base;
            start..start + field.len()
        };
        match self {
            Delimiter::Whitespace => line.split_whitespace().map(to_range).collect(),
            Delimiter::Str(delim) => line.split(delim.as_str()).map(to_range).collect(),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Whitespace => write!(f, "whitespace"),
            Delimiter::Str(delim) => write!(f, "{:?}", delim),
        }
    }
}

/// One log message. The line of text is immutable; the fields are split
/// once, on first request.
pub struct Record<'a> {
    line: String,
    delimiter: &'a Delimiter,
    fields: OnceCell<Vec<Range<usize>>>,
}

impl<'a> Record<'a> {
    /// Create a new `Record`. A trailing newline (`"\n"` or `"\r\n"`) is
    /// removed.
    pub fn new(mut line: String, delimiter: &'a Delimiter) -> Record<'a> {
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Record {
            line,
            delimiter,
            fields: OnceCell::new(),
        }
    }

    /// The entire line of text.
    pub fn line(&self) -> &str {
        self.line.as_str()
    }

    pub fn into_line(self) -> String {
        self.line
    }

    fn field_ranges(&self) -> &Vec<Range<usize>> {
        self.fields.get_or_init(|| {
            defñ!("split {:?} by {}", str_to_String_noraw(&self.line), self.delimiter);
            self.delimiter.split(&self.line)
        })
    }

    /// The fields of this line split by the `Delimiter`.
    pub fn fields(&self) -> Vec<&str> {
        self.field_ranges()
            .iter()
            .map(|range| &self.line[range.clone()])
            .collect()
    }

    pub fn field_count(&self) -> usize {
        self.field_ranges().len()
    }
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Record")
            .field("line", &self.line)
            .field("delimiter", &self.delimiter)
            .field("fields", &self.fields.get())
            .finish()
    }
}
