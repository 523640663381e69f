// src/data/datetime.rs

//! Functions and types to transform the datetime substring of a log message
//! into a chrono [`DateTime`].
//!
//! Three strategies are available, see [`DateTimeStrategy`]:
//! 1. _raw_; a free-form parse that tries RFC 3339, RFC 2822, then the
//!    common strftime layouts in [`RAW_PARSE_PATTERNS`]
//! 2. _epoch_; the leading integer is seconds since the Unix epoch
//! 3. _pattern_; a user-passed template like `"%Y-%m-%d %H:%M:%S"` is
//!    compiled to a regular expression with named capture groups, see
//!    [`PatternParser`]
//!
//! The most relevant documents to understand this file are:
//! - `chrono` crate [`strftime`] format.
//! - `regex` crate [Regular Expression syntax].
//!
//! [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
//! [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
//! [Regular Expression syntax]: https://docs.rs/regex/1.11.1/regex/index.html#syntax

#![allow(non_camel_case_types)]

use crate::common::ResultS3;
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;

use std::fmt;

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    Datelike, // adds method `.year()` onto `DateTime`
    FixedOffset,
    Local,
    NaiveDate,
    NaiveDateTime,
    Offset, // adds method `.fix()` onto `Utc`
    TimeZone,
    Timelike, // adds method `.hour()` onto `DateTime`
    Utc,
};
use ::const_format::concatcp;
use ::phf::phf_map;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime types and helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A _Year_ in a date
pub type Year = i32;

/// Crate `chrono` [`strftime`] formatting pattern, passed to
/// chrono [`DateTime::parse_from_str`].
///
/// [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
/// [`DateTime::parse_from_str`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html#method.parse_from_str
pub type DateTimePattern_str = str;

/// Regular expression capture group name, used within the regular expression
/// and for later retreival via [`regex::Captures::name`].
///
/// [`regex::Captures::name`]: https://docs.rs/regex/1.11.1/regex/struct.Captures.html#method.name
pub type CaptureGroupName = str;

/// Regular expression capture group pattern, used within a
/// [`PatternParser`] regular expression.
pub type CaptureGroupPattern = str;

/// A chrono [`DateTime`] type used in _loggaplib_.
///
/// [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
pub type DateTimeL = DateTime<FixedOffset>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// The UTC [`FixedOffset`], used for epoch datetimes.
pub fn fixedoffset_utc() -> FixedOffset {
    Utc.fix()
}

/// The local system [`FixedOffset`] at this moment.
pub fn fixedoffset_local() -> FixedOffset {
    *Local::now().offset()
}

/// Convert a [`&str`] to a chrono [`Option<DateTime<FixedOffset>>`]
/// instance.
///
/// Compensate for a missing timezone.
///
/// - `data` to parse that has a datetime string
/// - strftime `pattern` to use for parsing
/// - `has_tz`, the `pattern` has a timezone (`%Z`, `%z`, etc.)?
/// - `tz_offset` fallback timezone offset when `!has_tz`
///
/// [`&str`]: str
/// [`Option<DateTime<FixedOffset>>`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html#impl-DateTime%3CFixedOffset%3E
pub fn datetime_parse_from_str(
    data: &str,
    pattern: &DateTimePattern_str,
    has_tz: bool,
    tz_offset: &FixedOffset,
) -> DateTimeLOpt {
    defn!("(pattern {:?}, tz_offset {:?}, data {:?})", pattern, tz_offset, str_to_String_noraw(data));

    // if `has_tz` then create a `DateTime`.
    // else if `!has_tz` then create a `NaiveDateTime`, then convert that to
    // `DateTime` using `tz_offset`.
    if has_tz {
        match DateTime::parse_from_str(data, pattern) {
            Ok(val) => {
                defx!("DateTime::parse_from_str({:?}, {:?}) return Some({:?})", data, pattern, val);

                Some(val)
            }
            Err(_err) => {
                defx!("DateTime::parse_from_str({:?}, {:?}) failed ParseError: {}", data, pattern, _err);

                None
            }
        }
    } else {
        let dt_naive = match NaiveDateTime::parse_from_str(data, pattern) {
            Ok(val) => val,
            Err(_err) => {
                defx!("NaiveDateTime.parse_from_str({:?}, {:?}) failed ParseError: {}", data, pattern, _err);
                return None;
            }
        };
        let dt = tz_offset
            .from_local_datetime(&dt_naive)
            .earliest();
        defx!("tz_offset.from_local_datetime({:?}).earliest() return {:?}", dt_naive, dt);

        dt
    }
}

/// Call [`datetime_parse_from_str`] with a `pattern` containing a timezone.
pub fn datetime_parse_from_str_w_tz(
    data: &str,
    pattern: &DateTimePattern_str,
) -> DateTimeLOpt {
    datetime_parse_from_str(data, pattern, true, &fixedoffset_utc())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// free-form ("raw") datetime parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An entry of [`RAW_PARSE_PATTERNS`].
///
/// (DateTimePattern_str, has_tz, has_year, has_date, has_time)
pub type RawParsePattern<'a> = (&'a DateTimePattern_str, bool, bool, bool, bool);

pub const RAW_PARSE_PATTERNS_COUNT: usize = 26;

/// strftime layouts tried, in order, by [`datetime_parse_free`].
// XXX: a brute-force approach but in ad-hoc experiments it didn't add any
//      significant run-time compared to reading the log messages.
pub const RAW_PARSE_PATTERNS: [RawParsePattern; RAW_PARSE_PATTERNS_COUNT] = [
    // YYYY-mm-ddTHH:MM:SS*
    ("%Y-%m-%dT%H:%M:%S%z", true, true, true, true),
    ("%Y-%m-%dT%H:%M:%S%.f%z", true, true, true, true),
    ("%Y-%m-%dT%H:%M:%S", false, true, true, true),
    ("%Y-%m-%dT%H:%M:%S%.f", false, true, true, true),
    // YYYY-mm-dd HH:MM:SS*
    ("%Y-%m-%d %H:%M:%S %z", true, true, true, true),
    ("%Y-%m-%d %H:%M:%S%.f %z", true, true, true, true),
    ("%Y-%m-%d %H:%M:%S", false, true, true, true),
    ("%Y-%m-%d %H:%M:%S%.f", false, true, true, true),
    ("%Y-%m-%d %H:%M", false, true, true, true),
    // YYYY/mm/dd HH:MM:SS*
    ("%Y/%m/%d %H:%M:%S", false, true, true, true),
    ("%Y/%m/%d %H:%M:%S%.f", false, true, true, true),
    // YYYYmmddTHHMMSS*
    ("%Y%m%dT%H%M%S%z", true, true, true, true),
    ("%Y%m%dT%H%M%S", false, true, true, true),
    // Apache Common Log Format, e.g. "10/Oct/2000:13:55:36 -0700"
    ("%d/%b/%Y:%H:%M:%S %z", true, true, true, true),
    // ctime, e.g. "Tue Nov 14 22:13:20 2023"
    ("%a %b %e %H:%M:%S %Y", false, true, true, true),
    // e.g. "Tue, 14 Nov 2023 22:13:20"
    ("%a, %d %b %Y %H:%M:%S", false, true, true, true),
    // e.g. "Nov 14 2023 22:13:20"
    ("%b %d %Y %H:%M:%S", false, true, true, true),
    // RFC 3164 syslog, e.g. "Nov 14 22:13:20"
    ("%b %d %H:%M:%S", false, false, true, true),
    ("%b %e %H:%M:%S", false, false, true, true),
    // dates only
    ("%Y-%m-%d", false, true, true, false),
    ("%Y/%m/%d", false, true, true, false),
    ("%Y%m%d", false, true, true, false),
    ("%d %b %Y", false, true, true, false),
    ("%b %d %Y", false, true, true, false),
    // clock times only
    ("%H:%M:%S", false, true, false, true),
    ("%H:%M", false, true, false, true),
];

/// Prefix of a [`datetime_parse_free`] value that is Unix epoch seconds,
/// e.g. `"@1700000000"`.
pub const RAW_EPOCH_PREFIX: char = '@';

/// strftime pattern prepended when a [`RawParsePattern`] has no year
const RAW_FILL_YEAR_PATTERN: &str = "%Y ";
/// strftime pattern prepended when a [`RawParsePattern`] has no date
const RAW_FILL_DATE_PATTERN: &str = "%Y-%m-%d ";
/// strftime pattern appended when a [`RawParsePattern`] has no time
const RAW_FILL_TIME_PATTERN: &str = " %H:%M:%S";
/// value appended when a [`RawParsePattern`] has no time
const RAW_FILL_TIME_VALUE: &str = " 00:00:00";

/// Free-form parse of a datetime string, e.g. `"2000-01-02 03:04:05"`,
/// `"Jan  2 03:04:05"`, `"@946782245"`.
///
/// Tries, in order:
/// 1. `@` followed by Unix epoch seconds
/// 2. RFC 3339
/// 3. RFC 2822
/// 4. each of [`RAW_PARSE_PATTERNS`]
///
/// Datetimes without a timezone are in `tz_offset`. A missing year or date
/// is filled from `now`. A missing time is midnight.
pub fn datetime_parse_free(
    data: &str,
    tz_offset: &FixedOffset,
    now: &DateTime<Utc>,
) -> DateTimeLOpt {
    defn!("({:?}, {:?}, {:?})", data, tz_offset, now);
    let data = data.trim();
    if data.is_empty() {
        defx!("empty; return None");
        return None;
    }
    if let Some(epoch) = data.strip_prefix(RAW_EPOCH_PREFIX) {
        let dt = datetime_from_epoch_str(epoch);
        defx!("epoch; return {:?}", dt);
        return dt;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(data) {
        defx!("rfc3339; return {:?}", dt);
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(data) {
        defx!("rfc2822; return {:?}", dt);
        return Some(dt);
    }
    let now_l: DateTimeL = now.with_timezone(tz_offset);
    for (pattern_, has_tz, has_year, has_date, has_time) in RAW_PARSE_PATTERNS.iter() {
        let mut pattern: String = String::from(*pattern_);
        let mut data_: String = String::from(data);
        if !has_year {
            data_.insert_str(0, &format!("{:04} ", now_l.year()));
            pattern.insert_str(0, RAW_FILL_YEAR_PATTERN);
        }
        if !has_date {
            data_.insert_str(0, &format!("{:04}-{:02}-{:02} ", now_l.year(), now_l.month(), now_l.day()));
            pattern.insert_str(0, RAW_FILL_DATE_PATTERN);
        }
        if !has_time {
            data_.push_str(RAW_FILL_TIME_VALUE);
            pattern.push_str(RAW_FILL_TIME_PATTERN);
        }
        if let Some(dt) = datetime_parse_from_str(data_.as_str(), pattern.as_str(), *has_tz, tz_offset) {
            defx!("pattern {:?}; return {:?}", pattern, dt);
            return Some(dt);
        }
    }
    defx!("return None");

    None
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// epoch datetime parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The leading integer of `data`, e.g. `"1700000000.25 UTC"` is
/// `1700000000`. Leading whitespace and one sign character are allowed.
pub fn leading_integer(data: &str) -> Option<i64> {
    let data = data.trim_start();
    let sign_len: usize = match data.chars().next() {
        Some('-') | Some('+') => 1,
        _ => 0,
    };
    let digits_len: usize = data[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return None;
    }

    data[..sign_len + digits_len].parse::<i64>().ok()
}

/// Unix epoch seconds in `data` to a UTC [`DateTimeL`].
/// Only the leading integer is used, see [`leading_integer`].
pub fn datetime_from_epoch_str(data: &str) -> DateTimeLOpt {
    defn!("({:?})", data);
    let seconds = match leading_integer(data) {
        Some(val) => val,
        None => {
            defx!("no leading integer; return None");
            return None;
        }
    };
    let dt = DateTime::from_timestamp(seconds, 0).map(|dt| dt.with_timezone(&fixedoffset_utc()));
    defx!("return {:?}", dt);

    dt
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// user-passed pattern templates
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// Regular expression capture group names used in a compiled pattern
// template.

pub const CGN_YEAR: &CaptureGroupName = "full_year";
pub const CGN_MONTH: &CaptureGroupName = "full_month";
pub const CGN_MONTH_ABBR: &CaptureGroupName = "abbrev_month";
pub const CGN_DAY: &CaptureGroupName = "full_day_of_month";
pub const CGN_HOUR: &CaptureGroupName = "full_hour";
pub const CGN_MINUTE: &CaptureGroupName = "full_minute";
pub const CGN_SECOND: &CaptureGroupName = "full_second";

// Regular expression capture group patterns substituted for strftime
// specifiers in a pattern template.

/// `%Y`
pub const CGP_YEAR: &CaptureGroupPattern = concatcp!("(?P<", CGN_YEAR, ">[0-9]{4})");
/// `%m`
pub const CGP_MONTH: &CaptureGroupPattern = concatcp!("(?P<", CGN_MONTH, ">[0-9]{2})");
/// `%b`
pub const CGP_MONTH_ABBR: &CaptureGroupPattern = concatcp!("(?P<", CGN_MONTH_ABBR, ">[[:alpha:]]{3})");
/// `%d`
pub const CGP_DAY: &CaptureGroupPattern = concatcp!("(?P<", CGN_DAY, ">[0-9]{2})");
/// `%H`
pub const CGP_HOUR: &CaptureGroupPattern = concatcp!("(?P<", CGN_HOUR, ">[0-9]{2})");
/// `%M`
pub const CGP_MINUTE: &CaptureGroupPattern = concatcp!("(?P<", CGN_MINUTE, ">[0-9]{2})");
/// `%S`
pub const CGP_SECOND: &CaptureGroupPattern = concatcp!("(?P<", CGN_SECOND, ">[0-9]{2})");

/// Abbreviated month name (lowercase) to month number.
static MONTH_ABBR_TO_MONTH: phf::Map<&'static str, u32> = phf_map! {
    "jan" => 1,
    "feb" => 2,
    "mar" => 3,
    "apr" => 4,
    "may" => 5,
    "jun" => 6,
    "jul" => 7,
    "aug" => 8,
    "sep" => 9,
    "oct" => 10,
    "nov" => 11,
    "dec" => 12,
};

/// Case-insensitive lookup of an abbreviated month name, e.g. `"Jan"` is
/// `1`.
pub fn month_abbr_to_month(abbr: &str) -> Option<u32> {
    MONTH_ABBR_TO_MONTH
        .get(abbr.to_ascii_lowercase().as_str())
        .copied()
}

/// A datetime component of a pattern template; one strftime specifier.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PatternComponent {
    /// `%Y`
    Year,
    /// `%m`
    Month,
    /// `%b`
    MonthAbbr,
    /// `%d`
    Day,
    /// `%H`
    Hour,
    /// `%M`
    Minute,
    /// `%S`
    Second,
}

impl PatternComponent {
    pub const fn from_specifier(c: char) -> Option<PatternComponent> {
        match c {
            'Y' => Some(PatternComponent::Year),
            'm' => Some(PatternComponent::Month),
            'b' => Some(PatternComponent::MonthAbbr),
            'd' => Some(PatternComponent::Day),
            'H' => Some(PatternComponent::Hour),
            'M' => Some(PatternComponent::Minute),
            'S' => Some(PatternComponent::Second),
            _ => None,
        }
    }

    pub const fn specifier(&self) -> char {
        match self {
            PatternComponent::Year => 'Y',
            PatternComponent::Month => 'm',
            PatternComponent::MonthAbbr => 'b',
            PatternComponent::Day => 'd',
            PatternComponent::Hour => 'H',
            PatternComponent::Minute => 'M',
            PatternComponent::Second => 'S',
        }
    }

    pub const fn capture_group_name(&self) -> &'static CaptureGroupName {
        match self {
            PatternComponent::Year => CGN_YEAR,
            PatternComponent::Month => CGN_MONTH,
            PatternComponent::MonthAbbr => CGN_MONTH_ABBR,
            PatternComponent::Day => CGN_DAY,
            PatternComponent::Hour => CGN_HOUR,
            PatternComponent::Minute => CGN_MINUTE,
            PatternComponent::Second => CGN_SECOND,
        }
    }

    pub const fn capture_group_pattern(&self) -> &'static CaptureGroupPattern {
        match self {
            PatternComponent::Year => CGP_YEAR,
            PatternComponent::Month => CGP_MONTH,
            PatternComponent::MonthAbbr => CGP_MONTH_ABBR,
            PatternComponent::Day => CGP_DAY,
            PatternComponent::Hour => CGP_HOUR,
            PatternComponent::Minute => CGP_MINUTE,
            PatternComponent::Second => CGP_SECOND,
        }
    }
}

/// Errors from compiling a pattern template. Fatal before any log message
/// is processed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PatternConfigError {
    /// a `%` specifier other than `%Y %m %b %d %H %M %S %%`
    UnknownSpecifier(char),
    /// the template ends with a lone `%`
    DanglingPercent,
    /// a specifier was used more than once
    DuplicateSpecifier(char),
    /// both `%m` and `%b`
    ConflictingMonth,
    /// the resulting regular expression failed to compile
    Regex(String),
}

impl fmt::Display for PatternConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternConfigError::UnknownSpecifier(c) => {
                write!(f, "unknown specifier \"%{}\"; allowed are %Y %m %b %d %H %M %S %%", c)
            }
            PatternConfigError::DanglingPercent => write!(f, "pattern ends with a lone \"%\""),
            PatternConfigError::DuplicateSpecifier(c) => write!(f, "specifier \"%{}\" is used more than once", c),
            PatternConfigError::ConflictingMonth => write!(f, "cannot use both \"%m\" and \"%b\""),
            PatternConfigError::Regex(err) => write!(f, "bad regular expression: {}", err),
        }
    }
}

impl std::error::Error for PatternConfigError {}

/// The datetime components captured from one log message.
/// Components absent from the pattern template are `None`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CapturedComponents {
    pub year: Option<Year>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
}

impl CapturedComponents {
    /// Combine with `now` where a component was not captured, then create a
    /// `DateTimeL` in `tz_offset`.
    ///
    /// Returns `None` if the combined date or time does not exist, e.g.
    /// month `13` or February 30.
    pub fn to_datetime(
        &self,
        now: &DateTimeL,
        tz_offset: &FixedOffset,
    ) -> DateTimeLOpt {
        let date = NaiveDate::from_ymd_opt(
            self.year.unwrap_or(now.year()),
            self.month.unwrap_or(now.month()),
            self.day.unwrap_or(now.day()),
        )?;
        let dt_naive = date.and_hms_opt(
            self.hour.unwrap_or(now.hour()),
            self.minute.unwrap_or(now.minute()),
            self.second.unwrap_or(now.second()),
        )?;

        tz_offset.from_local_datetime(&dt_naive).earliest()
    }
}

/// A user-passed pattern template, e.g. `"%Y-%m-%d %H:%M:%S"`, compiled to
/// a case-insensitive regular expression with a named capture group per
/// strftime specifier.
///
/// Text of the template other than `%` specifiers is regular expression
/// syntax. The match is a search anywhere within the datetime substring.
#[derive(Clone)]
pub struct PatternParser {
    template: String,
    regex: Regex,
    components: Vec<PatternComponent>,
    tz_offset: FixedOffset,
    stop_caring: bool,
}

impl fmt::Debug for PatternParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PatternParser")
            .field("template", &self.template)
            .field("regex", &self.regex.as_str())
            .field("components", &self.components)
            .field("tz_offset", &self.tz_offset)
            .field("stop_caring", &self.stop_caring)
            .finish()
    }
}

impl PatternParser {
    /// Compile the pattern `template`.
    ///
    /// If `stop_caring` then a log message that does not match is skipped,
    /// otherwise a non-match is an error.
    pub fn new(
        template: &str,
        tz_offset: FixedOffset,
        stop_caring: bool,
    ) -> Result<PatternParser, PatternConfigError> {
        defn!("({:?}, {:?}, {:?})", template, tz_offset, stop_caring);
        let (regex_pattern, components) = pattern_template_to_regex(template)?;
        let regex = match Regex::new(regex_pattern.as_str()) {
            Ok(val) => val,
            Err(err) => {
                defx!("Regex::new({:?}) error {}", regex_pattern, err);
                return Err(PatternConfigError::Regex(err.to_string()));
            }
        };
        defx!("regex {:?}, components {:?}", regex.as_str(), components);

        Ok(PatternParser {
            template: String::from(template),
            regex,
            components,
            tz_offset,
            stop_caring,
        })
    }

    pub fn template(&self) -> &str {
        self.template.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn components(&self) -> &[PatternComponent] {
        &self.components
    }

    /// Match `data` and return the captured components.
    ///
    /// Returns `Skip` or `Err(NoMatch)` for no match, depending on
    /// `stop_caring`.
    pub fn captures(&self, data: &str) -> ResultS3<CapturedComponents, ExtractError> {
        defn!("({:?})", data);
        let captures = match self.regex.captures(data) {
            Some(val) => val,
            None => {
                if self.stop_caring {
                    defx!("no match; Skip");
                    return ResultS3::Skip;
                }
                defx!("no match; Err");
                return ResultS3::Err(ExtractError::NoMatch {
                    pattern: self.template.clone(),
                    data: String::from(data),
                });
            }
        };
        let mut cc = CapturedComponents::default();
        for component in self.components.iter() {
            let value: &str = match captures.name(component.capture_group_name()) {
                Some(match_) => match_.as_str(),
                // possible within an alternation, e.g. "(%H|x)"
                None => continue,
            };
            defo!("{:?} matched {:?}", component, value);
            let number = match component {
                PatternComponent::MonthAbbr => match month_abbr_to_month(value) {
                    Some(month) => month,
                    None => {
                        defx!("unknown month {:?}", value);
                        return ResultS3::Err(ExtractError::InvalidMonth {
                            month: String::from(value),
                            data: String::from(data),
                        });
                    }
                },
                _ => match value.parse::<u32>() {
                    Ok(val) => val,
                    Err(_) => {
                        defx!("bad number {:?}", value);
                        return ResultS3::Err(ExtractError::InvalidDateTime {
                            data: String::from(data),
                        });
                    }
                },
            };
            match component {
                PatternComponent::Year => cc.year = Some(number as Year),
                PatternComponent::Month | PatternComponent::MonthAbbr => cc.month = Some(number),
                PatternComponent::Day => cc.day = Some(number),
                PatternComponent::Hour => cc.hour = Some(number),
                PatternComponent::Minute => cc.minute = Some(number),
                PatternComponent::Second => cc.second = Some(number),
            }
        }
        defx!("return {:?}", cc);

        ResultS3::Found(cc)
    }

    /// Match `data` and create a `DateTimeL`; components not in the template
    /// are taken from `now`.
    pub fn extract_at(
        &self,
        data: &str,
        now: &DateTime<Utc>,
    ) -> ResultS3<DateTimeL, ExtractError> {
        let cc = match self.captures(data) {
            ResultS3::Found(cc) => cc,
            ResultS3::Skip => return ResultS3::Skip,
            ResultS3::Err(err) => return ResultS3::Err(err),
        };
        let now_l: DateTimeL = now.with_timezone(&self.tz_offset);
        match cc.to_datetime(&now_l, &self.tz_offset) {
            Some(dt) => ResultS3::Found(dt),
            None => ResultS3::Err(ExtractError::InvalidDateTime {
                data: String::from(data),
            }),
        }
    }
}

/// Transform a pattern `template` into a case-insensitive regular expression
/// string, and the list of components in order of appearance.
pub fn pattern_template_to_regex(template: &str) -> Result<(String, Vec<PatternComponent>), PatternConfigError> {
    let mut regex_pattern: String = String::with_capacity(template.len() * 4 + 4);
    regex_pattern.push_str("(?i)");
    let mut components: Vec<PatternComponent> = Vec::with_capacity(7);
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            regex_pattern.push(c);
            continue;
        }
        let specifier = match chars.next() {
            Some(val) => val,
            None => return Err(PatternConfigError::DanglingPercent),
        };
        if specifier == '%' {
            regex_pattern.push('%');
            continue;
        }
        let component = match PatternComponent::from_specifier(specifier) {
            Some(val) => val,
            None => return Err(PatternConfigError::UnknownSpecifier(specifier)),
        };
        if components.contains(&component) {
            return Err(PatternConfigError::DuplicateSpecifier(specifier));
        }
        components.push(component);
        regex_pattern.push_str(component.capture_group_pattern());
    }
    if components.contains(&PatternComponent::Month) && components.contains(&PatternComponent::MonthAbbr) {
        return Err(PatternConfigError::ConflictingMonth);
    }

    Ok((regex_pattern, components))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// datetime extraction strategies
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// User-chosen way to transform a datetime substring to a datetime.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DateTimeStrategy {
    /// free-form parse, see [`datetime_parse_free`]
    Raw,
    /// Unix epoch seconds, see [`datetime_from_epoch_str`]
    Epoch,
    /// a pattern template, see [`PatternParser`]
    Pattern(String),
}

/// Errors from extracting a datetime from one log message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExtractError {
    /// the pattern template did not match (and not `--stop-caring`)
    NoMatch { pattern: String, data: String },
    /// the raw or epoch strategy could not parse the datetime substring
    ParseFailure { strategy: &'static str, data: String },
    /// `%b` matched something that is not an abbreviated month name
    InvalidMonth { month: String, data: String },
    /// the matched components are not a real date or time
    InvalidDateTime { data: String },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::NoMatch { pattern, data } => {
                write!(f, "pattern {:?} did not match {:?}", pattern, data)
            }
            ExtractError::ParseFailure { strategy, data } => {
                write!(f, "unable to parse a {} datetime from {:?}", strategy, data)
            }
            ExtractError::InvalidMonth { month, data } => {
                write!(f, "unknown month abbreviation {:?} in {:?}", month, data)
            }
            ExtractError::InvalidDateTime { data } => {
                write!(f, "matched datetime components of {:?} are not a valid datetime", data)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extract a [`DateTimeL`] from the datetime substring of a log message
/// using one [`DateTimeStrategy`]. Created once, immutable after.
#[derive(Clone, Debug)]
pub enum DateTimeExtractor {
    Raw(FixedOffset),
    Epoch,
    Pattern(PatternParser),
}

impl DateTimeExtractor {
    /// Create the extractor for `strategy`.
    ///
    /// `tz_offset` applies to datetimes without a timezone.
    /// `stop_caring` only applies to `DateTimeStrategy::Pattern`.
    pub fn new(
        strategy: &DateTimeStrategy,
        tz_offset: FixedOffset,
        stop_caring: bool,
    ) -> Result<DateTimeExtractor, PatternConfigError> {
        match strategy {
            DateTimeStrategy::Raw => Ok(DateTimeExtractor::Raw(tz_offset)),
            DateTimeStrategy::Epoch => Ok(DateTimeExtractor::Epoch),
            DateTimeStrategy::Pattern(template) => Ok(DateTimeExtractor::Pattern(PatternParser::new(
                template,
                tz_offset,
                stop_caring,
            )?)),
        }
    }

    /// Extract a datetime from `data` relative to the current time.
    pub fn extract(&self, data: &str) -> ResultS3<DateTimeL, ExtractError> {
        self.extract_at(data, &Utc::now())
    }

    /// Extract a datetime from `data`. Missing components are taken from
    /// `now`.
    pub fn extract_at(
        &self,
        data: &str,
        now: &DateTime<Utc>,
    ) -> ResultS3<DateTimeL, ExtractError> {
        defn!("({:?})", data);
        let result = match self {
            DateTimeExtractor::Raw(tz_offset) => match datetime_parse_free(data, tz_offset, now) {
                Some(dt) => ResultS3::Found(dt),
                None => ResultS3::Err(ExtractError::ParseFailure {
                    strategy: "raw",
                    data: String::from(data),
                }),
            },
            DateTimeExtractor::Epoch => match datetime_from_epoch_str(data) {
                Some(dt) => ResultS3::Found(dt),
                None => ResultS3::Err(ExtractError::ParseFailure {
                    strategy: "epoch",
                    data: String::from(data),
                }),
            },
            DateTimeExtractor::Pattern(parser) => parser.extract_at(data, now),
        };
        defx!("return {}", result);

        result
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime comparisons
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Describe the result of comparing one [`DateTimeL`] to two filters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Result_Filter_DateTime2 {
    /// like Skip
    BeforeRange,
    /// like Found
    InRange,
    /// like Skip
    AfterRange,
}

impl Result_Filter_DateTime2 {
    /// Returns `true` if the result is [`InRange`].
    ///
    /// [`InRange`]: self::Result_Filter_DateTime2#variant.InRange
    #[inline(always)]
    pub const fn is_pass(&self) -> bool {
        matches!(*self, Result_Filter_DateTime2::InRange)
    }
}

/// How does the passed [`DateTimeL`], `dt`, pass the optional filters
/// `dt_filter_after` and `dt_filter_before`?  Is `dt` before
/// ([`BeforeRange`]), after ([`AfterRange`]), or in between ([`InRange`])?
///
/// A `None` filter always passes.
///
/// Comparisons are "inclusive" i.e. `dt` == `dt_filter_after` will return
/// `InRange`.
///
/// [`AfterRange`]: self::Result_Filter_DateTime2#variant.AfterRange
/// [`BeforeRange`]: self::Result_Filter_DateTime2#variant.BeforeRange
/// [`InRange`]: self::Result_Filter_DateTime2#variant.InRange
pub fn dt_pass_filters(
    dt: &DateTimeL,
    dt_filter_after: &DateTimeLOpt,
    dt_filter_before: &DateTimeLOpt,
) -> Result_Filter_DateTime2 {
    defn!("({:?}, {:?}, {:?})", dt, dt_filter_after, dt_filter_before);
    if let Some(da) = dt_filter_after {
        if dt < da {
            defx!("return {:?}", Result_Filter_DateTime2::BeforeRange);
            return Result_Filter_DateTime2::BeforeRange;
        }
    }
    if let Some(db) = dt_filter_before {
        if db < dt {
            defx!("return {:?}", Result_Filter_DateTime2::AfterRange);
            return Result_Filter_DateTime2::AfterRange;
        }
    }
    defx!("return {:?}", Result_Filter_DateTime2::InRange);

    Result_Filter_DateTime2::InRange
}
