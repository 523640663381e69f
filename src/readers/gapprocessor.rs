// src/readers/gapprocessor.rs

//! Implements a [`GapProcessor`], the driver of gap detection over a
//! stream of lines.
//!
//! For each line passed to [`GapProcessor::process_line`]:
//!
//! 1. the line is split into fields by the [`Delimiter`]
//! 2. the [`FieldSelection`] picks the datetime substring; the whole line
//!    when there is no selection or the selection is out of range
//! 3. the [`DateTimeExtractor`] transforms the substring into a datetime;
//!    a skipped record ends processing of this line
//! 4. the gap is the whole seconds since the previous record, or `0` for
//!    the first record
//! 5. the gap is classified against the [`GapWindow`], then pushed into it
//! 6. the record is marked for output per the date range and
//!    `only_outliers`
//! 7. the previous state is advanced to this record
//!
//! [`Delimiter`]: crate::data::record::Delimiter
//! [`FieldSelection`]: crate::data::fieldselect::FieldSelection
//! [`DateTimeExtractor`]: crate::data::datetime::DateTimeExtractor
//! [`GapWindow`]: crate::data::gapwindow::GapWindow

use crate::common::{Count, Gap, ResultS3, WindowSz};
use crate::data::datetime::{
    dt_pass_filters,
    DateTime,
    DateTimeExtractor,
    DateTimeL,
    DateTimeLOpt,
    DateTimeStrategy,
    ExtractError,
    FixedOffset,
    PatternConfigError,
    Utc,
    fixedoffset_utc,
};
use crate::data::fieldselect::{FieldParseError, FieldSelection};
use crate::data::gapwindow::{GapBounds, GapVerdict, GapWindow, NotEvaluated};
use crate::data::record::{Delimiter, Record, DELIMITER_WHITESPACE};
use crate::readers::summary::{Snapshot, SummaryGapProcessor};

use std::fmt;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Default `k`; a gap is aberrant when outside `mean ± k·σ`.
pub const WITHIN_DEFAULT: f64 = 3.0;

/// Least allowed `k`.
pub const WITHIN_MIN: f64 = 1.0;

/// Default window capacity.
pub const WINDOW_DEFAULT: WindowSz = 10;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Resolved configuration of a [`GapProcessor`].
#[derive(Clone, Debug, PartialEq)]
pub struct GapProcessorConfig {
    /// field delimiter; `" "` splits on runs of whitespace
    pub delimiter: String,
    /// `cut`-style field selection, e.g. `"1-3"`
    pub field_expression: Option<String>,
    /// `k`
    pub within: f64,
    /// window capacity `W`
    pub window: WindowSz,
    /// gaps less than this are not classified
    pub minimum: Option<Gap>,
    /// gaps more than this are not classified
    pub maximum: Option<Gap>,
    pub strategy: DateTimeStrategy,
    /// a pattern non-match skips the record instead of failing
    pub stop_caring: bool,
    /// timezone offset for datetimes without one
    pub tz_offset: FixedOffset,
    /// emit records at or after this datetime
    pub dt_filter_after: DateTimeLOpt,
    /// emit records at or before this datetime
    pub dt_filter_before: DateTimeLOpt,
    /// emit only aberrant records
    pub only_outliers: bool,
}

impl Default for GapProcessorConfig {
    fn default() -> Self {
        GapProcessorConfig {
            delimiter: String::from(DELIMITER_WHITESPACE),
            field_expression: None,
            within: WITHIN_DEFAULT,
            window: WINDOW_DEFAULT,
            minimum: None,
            maximum: None,
            strategy: DateTimeStrategy::Raw,
            stop_caring: false,
            tz_offset: fixedoffset_utc(),
            dt_filter_after: None,
            dt_filter_before: None,
            only_outliers: false,
        }
    }
}

/// Errors in a [`GapProcessorConfig`]. Fatal before any line is processed.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    EmptyDelimiter,
    FieldExpression(FieldParseError),
    Pattern(PatternConfigError),
    /// `k` is less than [`WITHIN_MIN`] or is not a number
    Within(f64),
    ZeroWindow,
    NegativeBound(Gap),
    BoundsOrder { minimum: Gap, maximum: Gap },
    DateOrder { after: DateTimeL, before: DateTimeL },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyDelimiter => write!(f, "delimiter is empty"),
            ConfigError::FieldExpression(err) => write!(f, "bad field selection: {}", err),
            ConfigError::Pattern(err) => write!(f, "bad pattern: {}", err),
            ConfigError::Within(within) => {
                write!(f, "within {} must be a number no less than {}", within, WITHIN_MIN)
            }
            ConfigError::ZeroWindow => write!(f, "window must be at least 1"),
            ConfigError::NegativeBound(gap) => write!(f, "gap bound {} is negative", gap),
            ConfigError::BoundsOrder { minimum, maximum } => {
                write!(f, "minimum {} is more than maximum {}", minimum, maximum)
            }
            ConfigError::DateOrder { after, before } => {
                write!(f, "begin datetime {} is after end datetime {}", after, before)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FieldExpression(err) => Some(err),
            ConfigError::Pattern(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldParseError> for ConfigError {
    fn from(err: FieldParseError) -> Self {
        ConfigError::FieldExpression(err)
    }
}

impl From<PatternConfigError> for ConfigError {
    fn from(err: PatternConfigError) -> Self {
        ConfigError::Pattern(err)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// results
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A fatal failure processing one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessError {
    /// 1-based count of the failing line
    pub line_number: Count,
    pub error: ExtractError,
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.error)
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A failure of the entire run, known only after the last line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    /// the window never held `window` gaps
    InsufficientData { window: WindowSz, pushed: Count },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InsufficientData { window, pushed } => write!(
                f,
                "insufficient data; the window of {} gaps was never filled ({} gaps)",
                window, pushed
            ),
        }
    }
}

impl std::error::Error for RunError {}

/// The result of processing one record.
#[derive(Clone, Debug, PartialEq)]
pub struct GapRecord {
    /// whole seconds since the previous record
    pub gap: Gap,
    pub verdict: GapVerdict,
    /// the line, without line ending
    pub line: String,
    /// the datetime extracted from `line`
    pub datetime: DateTimeL,
    /// should this record be printed?
    pub emit: bool,
}

/// The last processed (not skipped) record.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviousState {
    pub datetime: DateTimeL,
    pub line: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GapProcessor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Drives gap detection over a stream of lines. Owns the [`GapWindow`] and
/// the [`PreviousState`].
///
/// Strictly sequential; lines must be passed in stream order.
pub struct GapProcessor {
    delimiter: Delimiter,
    field_selection: Option<FieldSelection>,
    extractor: DateTimeExtractor,
    window: GapWindow,
    within: f64,
    bounds: GapBounds,
    dt_filter_after: DateTimeLOpt,
    dt_filter_before: DateTimeLOpt,
    only_outliers: bool,
    previous: Option<PreviousState>,
    dt_first: DateTimeLOpt,
    // statistics for `--summary`
    lines: Count,
    skipped: Count,
    gaps_evaluated: Count,
    gaps_aberrant: Count,
    emitted: Count,
}

impl fmt::Debug for GapProcessor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GapProcessor")
            .field("delimiter", &self.delimiter)
            .field("field_selection", &self.field_selection)
            .field("extractor", &self.extractor)
            .field("window", &self.window)
            .field("within", &self.within)
            .field("bounds", &self.bounds)
            .field("lines", &self.lines)
            .finish()
    }
}

impl GapProcessor {
    /// Validate `config` and create a `GapProcessor`.
    pub fn new(config: GapProcessorConfig) -> Result<GapProcessor, ConfigError> {
        defn!("({:?})", config);
        let delimiter = match Delimiter::new(config.delimiter.as_str()) {
            Some(val) => val,
            None => {
                defx!("EmptyDelimiter");
                return Err(ConfigError::EmptyDelimiter);
            }
        };
        let field_selection: Option<FieldSelection> = match config.field_expression {
            Some(ref expression) => Some(FieldSelection::new(expression)?),
            None => None,
        };
        // `!(a >= b)` also rejects NaN
        if !(config.within >= WITHIN_MIN) || !config.within.is_finite() {
            defx!("Within {}", config.within);
            return Err(ConfigError::Within(config.within));
        }
        let window = match GapWindow::new(config.window) {
            Some(val) => val,
            None => {
                defx!("ZeroWindow");
                return Err(ConfigError::ZeroWindow);
            }
        };
        for bound in [config.minimum, config.maximum].iter().flatten() {
            if *bound < 0 {
                defx!("NegativeBound {}", bound);
                return Err(ConfigError::NegativeBound(*bound));
            }
        }
        if let (Some(minimum), Some(maximum)) = (config.minimum, config.maximum) {
            if minimum > maximum {
                defx!("BoundsOrder");
                return Err(ConfigError::BoundsOrder { minimum, maximum });
            }
        }
        if let (Some(after), Some(before)) = (config.dt_filter_after, config.dt_filter_before) {
            if after > before {
                defx!("DateOrder");
                return Err(ConfigError::DateOrder { after, before });
            }
        }
        let extractor = DateTimeExtractor::new(&config.strategy, config.tz_offset, config.stop_caring)?;
        defx!("extractor {:?}", extractor);

        Ok(GapProcessor {
            delimiter,
            field_selection,
            extractor,
            window,
            within: config.within,
            bounds: GapBounds {
                minimum: config.minimum,
                maximum: config.maximum,
            },
            dt_filter_after: config.dt_filter_after,
            dt_filter_before: config.dt_filter_before,
            only_outliers: config.only_outliers,
            previous: None,
            dt_first: None,
            lines: 0,
            skipped: 0,
            gaps_evaluated: 0,
            gaps_aberrant: 0,
            emitted: 0,
        })
    }

    pub fn window(&self) -> &GapWindow {
        &self.window
    }

    /// The last processed record, if any.
    pub fn previous(&self) -> Option<&PreviousState> {
        self.previous.as_ref()
    }

    /// Count of lines passed to `process_line`.
    pub fn lines(&self) -> Count {
        self.lines
    }

    /// The datetime substring of `record`.
    fn datetime_substring(&self, record: &Record) -> String {
        if let Some(field_selection) = self.field_selection.as_ref() {
            let fields = record.fields();
            if let Some(substring) = field_selection.apply(&fields) {
                return substring;
            }
            defo!("selection {:?} out of range of {} fields; use whole line", field_selection, fields.len());
        }

        String::from(record.line())
    }

    /// Process the next `line` of the stream.
    ///
    /// Returns `Skip` if the record was skipped; the previous state is
    /// unchanged.
    pub fn process_line(&mut self, line: String) -> ResultS3<GapRecord, ProcessError> {
        self.process_line_at(line, &Utc::now())
    }

    /// Process the next `line` of the stream. Datetime components missing
    /// from the line are taken from `now`.
    pub fn process_line_at(
        &mut self,
        line: String,
        now: &DateTime<Utc>,
    ) -> ResultS3<GapRecord, ProcessError> {
        defn!("({:?})", line);
        self.lines += 1;
        let record = Record::new(line, &self.delimiter);
        let substring = self.datetime_substring(&record);
        let line: String = record.into_line();
        let dt: DateTimeL = match self.extractor.extract_at(substring.as_str(), now) {
            ResultS3::Found(dt) => dt,
            ResultS3::Skip => {
                self.skipped += 1;
                defx!("Skip {:?}", substring);
                return ResultS3::Skip;
            }
            ResultS3::Err(error) => {
                defx!("Err {}", error);
                return ResultS3::Err(ProcessError {
                    line_number: self.lines,
                    error,
                });
            }
        };
        let (gap, verdict): (Gap, GapVerdict) = match self.previous.as_ref() {
            None => (0, GapVerdict::NotEvaluated(NotEvaluated::FirstRecord)),
            Some(previous) => {
                let gap: Gap = (dt - previous.datetime).num_seconds();
                (gap, self.window.classify(gap, self.within, &self.bounds))
            }
        };
        self.window.push(gap);
        if verdict.is_evaluated() {
            self.gaps_evaluated += 1;
        }
        if verdict.is_aberrant() {
            self.gaps_aberrant += 1;
        }
        let emit: bool = dt_pass_filters(&dt, &self.dt_filter_after, &self.dt_filter_before).is_pass()
            && (!self.only_outliers || verdict.is_aberrant());
        if emit {
            self.emitted += 1;
        }
        if self.dt_first.is_none() {
            self.dt_first = Some(dt);
        }
        self.previous = Some(PreviousState {
            datetime: dt,
            line: line.clone(),
        });
        defx!("gap {}, verdict {:?}, emit {}", gap, verdict, emit);

        ResultS3::Found(GapRecord {
            gap,
            verdict,
            line,
            datetime: dt,
            emit,
        })
    }

    /// Progress at this moment.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            dt_last: self.previous.as_ref().map(|p| p.datetime),
            lines: self.lines,
            mean: self.window.mean(),
            stddev: self.window.stddev(),
        }
    }

    pub fn summary(&self) -> SummaryGapProcessor {
        SummaryGapProcessor {
            GapProcessor_lines: self.lines,
            GapProcessor_skipped: self.skipped,
            GapProcessor_gaps_pushed: self.window.pushed(),
            GapProcessor_gaps_evaluated: self.gaps_evaluated,
            GapProcessor_gaps_aberrant: self.gaps_aberrant,
            GapProcessor_emitted: self.emitted,
            GapProcessor_dt_first: self.dt_first,
            GapProcessor_dt_last: self.previous.as_ref().map(|p| p.datetime),
            GapProcessor_window: self.window.capacity(),
            GapProcessor_window_filled: self.window.has_filled(),
            GapProcessor_mean: self.window.mean(),
            GapProcessor_stddev: self.window.stddev(),
        }
    }

    /// Call after the last line. The run fails if the window never held
    /// `window` gaps.
    pub fn finish(&self) -> Result<SummaryGapProcessor, RunError> {
        defñ!("pushed {}, filled {}", self.window.pushed(), self.window.has_filled());
        if !self.window.has_filled() {
            return Err(RunError::InsufficientData {
                window: self.window.capacity(),
                pushed: self.window.pushed(),
            });
        }

        Ok(self.summary())
    }
}
