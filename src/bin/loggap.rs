// src/bin/loggap.rs

//! Driver program _loggap_ drives the [_loggaplib_].
//!
//! Processes user-passed command-line arguments into a
//! [`GapProcessorConfig`]. Then reads the passed paths, in order, as one
//! stream of lines. Each line is passed to a [`GapProcessor`]. Each
//! resulting [`GapRecord`] marked for output is printed by a
//! [`PrinterGapRecord`].
//!
//! If passed CLI option `--report-interval` then a [`Snapshot`] is printed
//! to stderr periodically. If passed CLI option `--summary` then a
//! [`SummaryGapProcessor`] is printed to stderr after processing.
//!
//! The program fails if any line fails processing, or if the
//! [`GapWindow`] was never filled.
//!
//! [_loggaplib_]: loggaplib
//! [`GapProcessorConfig`]: loggaplib::readers::gapprocessor::GapProcessorConfig
//! [`GapProcessor`]: loggaplib::readers::gapprocessor::GapProcessor
//! [`GapRecord`]: loggaplib::readers::gapprocessor::GapRecord
//! [`PrinterGapRecord`]: loggaplib::printer::printers::PrinterGapRecord
//! [`Snapshot`]: loggaplib::readers::summary::Snapshot
//! [`SummaryGapProcessor`]: loggaplib::readers::summary::SummaryGapProcessor
//! [`GapWindow`]: loggaplib::data::gapwindow::GapWindow

#![allow(non_camel_case_types)]

use std::io::ErrorKind;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use ::anyhow::Context;
use ::clap::{Parser, ValueEnum};
use ::const_format::concatcp;
use ::lazy_static::lazy_static;

use ::loggaplib::common::{Count, FPath, FPaths, Gap, ResultS3, WindowSz, PATH_STDIN};
use ::loggaplib::data::datetime::{
    datetime_parse_free,
    datetime_parse_from_str_w_tz,
    fixedoffset_local,
    fixedoffset_utc,
    DateTime,
    DateTimeLOpt,
    DateTimeStrategy,
    FixedOffset,
    Utc,
    RAW_PARSE_PATTERNS,
};
use ::loggaplib::data::record::DELIMITER_WHITESPACE;
use ::loggaplib::debug::printers::e_err;
use ::loggaplib::printer::printers::{ColorChoice, PrinterGapRecord, PREPEND_DT_FORMAT};
use ::loggaplib::printer::summary::{print_snapshot, print_summary};
use ::loggaplib::readers::gapprocessor::{
    GapProcessor,
    GapProcessorConfig,
    WINDOW_DEFAULT,
    WITHIN_DEFAULT,
    WITHIN_MIN,
};
use ::loggaplib::readers::helpers::{open_bufread, read_line_lossy};
use ::loggaplib::readers::summary::SnapshotTimer;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};
use ::si_trace_print::stack::stack_offset_set;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

lazy_static! {
    /// the local system timezone offset at program start
    static ref LOCAL_NOW_OFFSET: FixedOffset = {
        defñ!("lazy_static! LOCAL_NOW_OFFSET");

        fixedoffset_local()
    };
}

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.ColorChoice.html
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

#[cfg(test)]
const CLI_HELP_AFTER_NOTE_TEST: &str = "\nTEST BUILD";
#[cfg(not(test))]
const CLI_HELP_AFTER_NOTE_TEST: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Each printed record is preceded by the gap, in seconds, from the prior record.
A gap is aberrant when outside the band mean ± WITHIN·stddev of the prior
WINDOW gaps. The band is not applied until WINDOW gaps have been seen.

Without --epoch or --pattern the datetime is parsed free-form, e.g.
    \"",
    RAW_PARSE_PATTERNS[0].0,
    "\"
    \"",
    RAW_PARSE_PATTERNS[6].0,
    "\"
    \"",
    RAW_PARSE_PATTERNS[13].0,
    "\"
    \"",
    RAW_PARSE_PATTERNS[17].0,
    "\"
    \"@1700000000\"

A --pattern may use specifiers %Y %m %b %d %H %M %S and %% for a literal \"%\".
Other text of the pattern is a regular expression.
Components missing from the pattern are taken from the current datetime.

DateTime Filters --begin and --end are parsed free-form.
Records outside the filters are not printed but are still measured.

PATHS of \"",
    PATH_STDIN,
    "\" or no PATHS reads from STDIN.
",
    CLI_HELP_AFTER_NOTE_DEBUG,
    CLI_HELP_AFTER_NOTE_TEST,
);

// clap derive reference <https://docs.rs/clap/4.2.1/clap/_derive/index.html>
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "loggap",
    // write expanded information for the `--version` output
    version = concatcp!(
        "\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Author: ", env!("CARGO_PKG_AUTHORS"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path(s) of log files, read in order as one stream.
    /// No paths, or "-", reads STDIN.
    #[clap(verbatim_doc_comment)]
    paths: Vec<String>,

    /// Field delimiter. The default " " splits on runs of whitespace.
    /// Escapes "\t" and "\\" are allowed.
    #[clap(
        short = 'd',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_delimiter,
        default_value = DELIMITER_WHITESPACE,
    )]
    delimiter: String,

    /// Fields holding the datetime, in the manner of `cut -f`.
    /// For example, "1", "1-3", "2,4", "3-". Fields are numbered from 1.
    /// Selected fields are joined by a single space.
    /// If not passed, or no selected field exists, the entire line is used.
    #[clap(short = 'f', long, verbatim_doc_comment)]
    field: Option<String>,

    /// A gap is aberrant when outside mean ± WITHIN·stddev.
    #[clap(
        short = 'k',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_within,
        default_value_t = WITHIN_DEFAULT,
    )]
    within: f64,

    /// Count of prior gaps for the mean and stddev.
    #[clap(
        short = 'w',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_window,
        default_value_t = WINDOW_DEFAULT,
    )]
    window: WindowSz,

    /// Gaps less than this many seconds are never aberrant.
    #[clap(
        long,
        verbatim_doc_comment,
        value_parser = clap::value_parser!(i64).range(0..),
    )]
    minimum: Option<Gap>,

    /// Gaps more than this many seconds are never aberrant.
    #[clap(
        long,
        verbatim_doc_comment,
        value_parser = clap::value_parser!(i64).range(0..),
    )]
    maximum: Option<Gap>,

    /// The datetime is Unix epoch seconds, e.g. "1700000000".
    #[clap(
        short = 'e',
        long,
        verbatim_doc_comment,
        conflicts_with = "pattern",
    )]
    epoch: bool,

    /// The datetime matches this pattern, e.g. "%Y-%m-%d %H:%M:%S".
    #[clap(short = 'p', long, verbatim_doc_comment)]
    pattern: Option<String>,

    /// Skip lines that do not match the --pattern instead of failing.
    #[clap(long, verbatim_doc_comment, requires = "pattern")]
    stop_caring: bool,

    /// DateTime Filter Begin: print records with a datetime at or after
    /// this datetime. For example, "2020-01-02 12:00:00".
    #[clap(short = 'a', long, verbatim_doc_comment)]
    begin: Option<String>,

    /// DateTime Filter End: print records with a datetime at or before
    /// this datetime. For example, "2020-01-03T23:00:00-05:30".
    #[clap(short = 'b', long, verbatim_doc_comment)]
    end: Option<String>,

    /// Print only records with an aberrant gap.
    #[clap(short = 'o', long, verbatim_doc_comment)]
    only_outliers: bool,

    /// Print a snapshot of progress to STDERR every this many seconds.
    #[clap(
        short = 'r',
        long,
        verbatim_doc_comment,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    report_interval: Option<u64>,

    /// Default timezone offset for datetimes without a timezone.
    /// Example values, "+12", "-0800", "+02:00", or "UTC".
    /// To pass a value with leading "-" use "=" notation, e.g. "-t=-0800".
    /// If not passed then the local system timezone offset is used.
    #[clap(
        short = 't',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_tz_offset,
        default_value_t = *LOCAL_NOW_OFFSET,
    )]
    tz_offset: FixedOffset,

    /// Prepend the datetime of the record to every printed line.
    #[clap(short = 'u', long, verbatim_doc_comment)]
    prepend_dt: bool,

    /// Choose to print to terminal using colors.
    #[clap(
        required = false,
        short = 'c',
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,

    /// Print a summary of processing to STDERR after processing.
    #[clap(short = 's', long, verbatim_doc_comment)]
    summary: bool,
}

/// `clap` argument validator for `--delimiter`.
fn cli_process_delimiter(delimiter: &str) -> std::result::Result<String, String> {
    if delimiter.is_empty() {
        return Err(String::from("delimiter may not be empty"));
    }
    let mut unescaped = String::with_capacity(delimiter.len());
    let mut chars = delimiter.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => unescaped.push('\t'),
            Some('\\') => unescaped.push('\\'),
            Some(c_) => return Err(format!("unknown escape \"\\{}\" in delimiter {:?}", c_, delimiter)),
            None => return Err(format!("delimiter {:?} ends with a lone \"\\\"", delimiter)),
        }
    }

    Ok(unescaped)
}

/// `clap` argument validator for `--within`.
fn cli_process_within(within: &str) -> std::result::Result<f64, String> {
    let value: f64 = match within.parse::<f64>() {
        Ok(val) => val,
        Err(err) => return Err(format!("Unable to parse a number for --within {:?}; {}", within, err)),
    };
    if !(value >= WITHIN_MIN) || !value.is_finite() {
        return Err(format!("--within {:?} must be a number no less than {}", within, WITHIN_MIN));
    }

    Ok(value)
}

/// `clap` argument validator for `--window`.
fn cli_process_window(window: &str) -> std::result::Result<WindowSz, String> {
    match window.parse::<WindowSz>() {
        Ok(0) => Err(String::from("--window must be at least 1")),
        Ok(val) => Ok(val),
        Err(err) => Err(format!("Unable to parse a number for --window {:?}; {}", window, err)),
    }
}

/// `clap` argument validator for `--tz-offset`.
fn cli_process_tz_offset(tzo: &str) -> std::result::Result<FixedOffset, String> {
    defn!("({:?})", tzo);
    match tzo.to_ascii_uppercase().as_str() {
        "Z" | "UTC" | "GMT" => {
            defx!("return UTC");
            return Ok(fixedoffset_utc());
        }
        _ => {}
    }
    // transform the timezone string to a `FixedOffset` instance
    // using a dummy datetime
    let mut data: String = String::from("2000-01-02 03:04:05 ");
    data.push_str(tzo);
    for pattern in [
        "%Y-%m-%d %H:%M:%S %:z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S %#z",
    ] {
        let dt = datetime_parse_from_str_w_tz(data.as_str(), pattern);
        defo!("datetime_parse_from_str_w_tz({:?}, {:?}) returned {:?}", data, pattern, dt);
        if let Some(dt_) = dt {
            defx!("return {:?}", dt_.offset());
            return Ok(*dt_.offset());
        }
    }
    defx!("return Err");

    Err(format!("Unable to parse a timezone offset for --tz-offset {:?}", tzo))
}

/// Transform a user-passed datetime filter string into a `DateTimeL`.
fn process_dt(
    dt_opt: &Option<String>,
    tz_offset: &FixedOffset,
    utc_now: &DateTime<Utc>,
) -> std::result::Result<DateTimeLOpt, String> {
    defn!("({:?}, {:?})", dt_opt, tz_offset);
    let dts = match dt_opt {
        Some(val) => val,
        None => {
            defx!("return None");
            return Ok(None);
        }
    };
    match datetime_parse_free(dts.as_str(), tz_offset, utc_now) {
        Some(dt) => {
            defx!("return {:?}", dt);
            Ok(Some(dt))
        }
        None => {
            defx!("return Err");
            Err(format!("Unable to parse a datetime from {:?}", dts))
        }
    }
}

/// Settings of the driver program that are not part of the
/// `GapProcessorConfig`.
#[derive(Debug)]
struct CLI_Output {
    paths: FPaths,
    color_choice: ColorChoice,
    prepend_dt_format: Option<String>,
    report_interval: Option<Duration>,
    summary: bool,
}

/// Process user-passed CLI argument strings into expected types.
///
/// Returns an error message for the user on failure.
fn cli_process_args(args: CLI_Args) -> std::result::Result<(GapProcessorConfig, CLI_Output), String> {
    defn!("args {:?}", args);

    let utc_now = Utc::now();
    let dt_filter_after = process_dt(&args.begin, &args.tz_offset, &utc_now)?;
    let dt_filter_before = process_dt(&args.end, &args.tz_offset, &utc_now)?;

    let strategy: DateTimeStrategy = match (args.epoch, args.pattern) {
        (true, _) => DateTimeStrategy::Epoch,
        (false, Some(pattern)) => DateTimeStrategy::Pattern(pattern),
        (false, None) => DateTimeStrategy::Raw,
    };

    let color_choice: ColorChoice = match args.color_choice {
        CLI_Color_Choice::always => ColorChoice::Always,
        CLI_Color_Choice::auto => ColorChoice::Auto,
        CLI_Color_Choice::never => ColorChoice::Never,
    };

    let mut paths: FPaths = args.paths;
    if paths.is_empty() {
        paths.push(FPath::from(PATH_STDIN));
    }

    let config = GapProcessorConfig {
        delimiter: args.delimiter,
        field_expression: args.field,
        within: args.within,
        window: args.window,
        minimum: args.minimum,
        maximum: args.maximum,
        strategy,
        stop_caring: args.stop_caring,
        tz_offset: args.tz_offset,
        dt_filter_after,
        dt_filter_before,
        only_outliers: args.only_outliers,
    };
    let output = CLI_Output {
        paths,
        color_choice,
        prepend_dt_format: match args.prepend_dt {
            true => Some(String::from(PREPEND_DT_FORMAT)),
            false => None,
        },
        report_interval: args.report_interval.map(Duration::from_secs),
        summary: args.summary,
    };
    defx!("config {:?}, output {:?}", config, output);

    Ok((config, output))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// processing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Read every line of every path and pass it to the `gapprocessor`.
/// Print each emitted record.
///
/// Returns the count of records printed.
fn processing_loop(
    gapprocessor: &mut GapProcessor,
    output: &CLI_Output,
) -> anyhow::Result<Count> {
    defn!();
    let mut printer = PrinterGapRecord::new(output.color_choice, output.prepend_dt_format.clone());
    let mut timer: Option<SnapshotTimer> = output
        .report_interval
        .map(|interval| SnapshotTimer::new(interval, Instant::now()));
    let mut printed: Count = 0;

    for path in output.paths.iter() {
        defo!("path {:?}", path);
        let mut reader = open_bufread(path).with_context(|| format!("Failed to open {:?}", path))?;
        let mut buffer: Vec<u8> = Vec::with_capacity(1024);
        while let Some(line) =
            read_line_lossy(reader.as_mut(), &mut buffer).with_context(|| format!("Failed to read {:?}", path))?
        {
            match gapprocessor.process_line(line) {
                ResultS3::Found(gaprecord) => {
                    if gaprecord.emit {
                        match printer.print_gaprecord(&gaprecord) {
                            Ok(_) => printed += 1,
                            Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                                // reader of stdout went away, e.g. `loggap file.log | head`
                                defx!("BrokenPipe; return {}", printed);
                                return Ok(printed);
                            }
                            Err(err) => {
                                return Err(err).context("Failed to write to STDOUT");
                            }
                        }
                    }
                }
                ResultS3::Skip => {}
                ResultS3::Err(err) => {
                    defx!("Err {}", err);
                    return Err(err).with_context(|| format!("Failed processing {:?}", path));
                }
            }
            if let Some(timer_) = timer.as_mut() {
                if timer_.due(Instant::now()) {
                    print_snapshot(&gapprocessor.snapshot(), output.color_choice);
                }
            }
        }
    }
    defx!("return {}", printed);

    Ok(printed)
}

pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();

    let (config, output) = match cli_process_args(CLI_Args::parse()) {
        Ok(val) => val,
        Err(err) => {
            e_err!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let mut gapprocessor = match GapProcessor::new(config) {
        Ok(val) => val,
        Err(err) => {
            e_err!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let result = processing_loop(&mut gapprocessor, &output);
    if output.summary {
        print_summary(&gapprocessor.summary());
    }
    if let Err(err) = result {
        e_err!("{:#}", err);
        defx!("processing_loop failed");
        return ExitCode::FAILURE;
    }
    if let Err(err) = gapprocessor.finish() {
        e_err!("{}", err);
        defx!("finish failed");
        return ExitCode::FAILURE;
    }
    defx!("SUCCESS");

    ExitCode::SUCCESS
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
