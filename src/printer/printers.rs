// src/printer/printers.rs

//! Specialized printer struct [`PrinterGapRecord`] and helper functions
//! for printing [`GapRecord`s].
//!
//! [`GapRecord`s]: crate::readers::gapprocessor::GapRecord

use crate::debug::printers::de_err;
use crate::readers::gapprocessor::GapRecord;

use std::io::{
    Result,
    Write, // for `std::io::Stdout.flush`
};

#[doc(hidden)]
pub use ::termcolor::{Color, ColorChoice, ColorSpec, WriteColor};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`Color`] for printing aberrant records.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_ABERRANT: Color = Color::Red;

/// [`Color`] for printing secondary information, e.g. snapshots.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_DIMMED: Color = Color::Rgb(127, 127, 127);

/// Default strftime format of a prepended datetime.
pub const PREPEND_DT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Separates the printed gap, datetime, and record.
const PRINT_SEP: &str = " ";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PrinterGapRecord
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A printer specialized for [`GapRecord`s]. Each record is printed as
/// `<gap> <line>`, optionally preceded by the record datetime. Aberrant
/// records are printed in [`COLOR_ABERRANT`].
///
/// [`GapRecord`s]: crate::readers::gapprocessor::GapRecord
pub struct PrinterGapRecord {
    /// termcolor handle to stdout
    stdout_color: termcolor::StandardStream,
    /// color settings for normal records
    color_spec_default: ColorSpec,
    /// color settings for aberrant records
    color_spec_aberrant: ColorSpec,
    /// last value passed to `self.stdout_color.set_color()`
    ///
    /// used by macro `setcolor_or_return`
    color_spec_last: ColorSpec,
    /// format string for printed date, if a date is printed
    prepend_date_format: Option<String>,
}

/// Macro to write to given stdout. If there is an error then
/// `return PrinterGapRecordResult::Err`.
macro_rules! write_or_return {
    ($stdout:expr, $slice_:expr, $printed:expr) => {
        match $stdout.write_all($slice_) {
            Ok(_) => {
                $printed += $slice_.len();
            }
            Err(err) => {
                // XXX: this will print when this program stdout is truncated, like when piping
                //      to `head`, e.g. `loggap file.log | head`
                //          Broken pipe (os error 32)
                de_err!(
                    "{}.write({}@{:p}) (len {})) error {}",
                    stringify!($stdout),
                    stringify!($slice_),
                    $slice_,
                    $slice_.len(),
                    err
                );
                let _ = $stdout.flush();
                return PrinterGapRecordResult::Err(err);
            }
        }
    };
}

/// Macro that sets output color, only changed if needed.
///
/// Unnecessary changes to `set_color` may cause errant formatting bytes to
/// print to the terminal.
macro_rules! setcolor_or_return {
    ($stdout:expr, $color_spec:expr, $color_spec_last:expr) => {
        if $color_spec != $color_spec_last {
            if let Err(err) = $stdout.set_color(&$color_spec) {
                de_err!("{}.set_color({:?}) returned error {}", stringify!($stdout), $color_spec, err);
                return PrinterGapRecordResult::Err(err);
            };
            $color_spec_last = $color_spec.clone();
        }
    };
}

/// Aliased [`Result`] returned by [`PrinterGapRecord`] functions; the count
/// of bytes printed.
///
/// [`Result`]: std::io::Result
pub type PrinterGapRecordResult = Result<usize>;

impl PrinterGapRecord {
    /// Create a new `PrinterGapRecord`.
    ///
    /// If `prepend_date_format` is `Some` then the record datetime is
    /// printed first, in the record's own offset.
    pub fn new(
        color_choice: ColorChoice,
        prepend_date_format: Option<String>,
    ) -> PrinterGapRecord {
        let stdout_color = termcolor::StandardStream::stdout(color_choice);
        let color_spec_default: ColorSpec = ColorSpec::new();
        let mut color_spec_aberrant: ColorSpec = ColorSpec::new();
        color_spec_aberrant.set_fg(Some(COLOR_ABERRANT));
        color_spec_aberrant.set_bold(true);
        let color_spec_last = color_spec_default.clone();

        PrinterGapRecord {
            stdout_color,
            color_spec_default,
            color_spec_aberrant,
            color_spec_last,
            prepend_date_format,
        }
    }

    /// The text printed for `gaprecord`, without color and without line
    /// ending.
    pub fn format_gaprecord(&self, gaprecord: &GapRecord) -> String {
        format_gaprecord(gaprecord, self.prepend_date_format.as_deref())
    }

    /// Print the [`GapRecord`] based on `PrinterGapRecord` settings.
    pub fn print_gaprecord(
        &mut self,
        gaprecord: &GapRecord,
    ) -> PrinterGapRecordResult {
        let mut printed: usize = 0;
        let text: String = self.format_gaprecord(gaprecord);
        if gaprecord.verdict.is_aberrant() {
            setcolor_or_return!(self.stdout_color, self.color_spec_aberrant, self.color_spec_last);
        } else {
            setcolor_or_return!(self.stdout_color, self.color_spec_default, self.color_spec_last);
        }
        write_or_return!(self.stdout_color, text.as_bytes(), printed);
        // reset before the newline so a colored background does not bleed
        setcolor_or_return!(self.stdout_color, self.color_spec_default, self.color_spec_last);
        write_or_return!(self.stdout_color, b"\n", printed);
        if let Err(err) = self.stdout_color.flush() {
            return PrinterGapRecordResult::Err(err);
        }

        PrinterGapRecordResult::Ok(printed)
    }
}

/// Format `gaprecord` as `[<datetime> ]<gap> <line>`.
pub fn format_gaprecord(
    gaprecord: &GapRecord,
    prepend_date_format: Option<&str>,
) -> String {
    let mut text = String::with_capacity(gaprecord.line.len() + 40);
    if let Some(format_) = prepend_date_format {
        text.push_str(gaprecord.datetime.format(format_).to_string().as_str());
        text.push_str(PRINT_SEP);
    }
    text.push_str(gaprecord.gap.to_string().as_str());
    text.push_str(PRINT_SEP);
    text.push_str(gaprecord.line.as_str());

    text
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// other printer functions (no use of PrinterGapRecord)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Print colored output to terminal if possible using passed stream,
/// otherwise, print plain output.
///
/// See an example <https://docs.rs/termcolor/1.4.1/termcolor/#detecting-presence-of-a-terminal>.
pub fn print_colored(
    color: Color,
    value: &[u8],
    out: &mut termcolor::StandardStream,
) -> std::io::Result<()> {
    if let Err(err) = out.set_color(ColorSpec::new().set_fg(Some(color))) {
        de_err!("print_colored: std.set_color({:?}) returned error {}", color, err);
        return Err(err);
    }
    if let Err(err) = out.write_all(value) {
        de_err!("print_colored: out.write_all(…) returned error {}", err);
        return Err(err);
    }
    if let Err(err) = out.reset() {
        de_err!("print_colored: out.reset() returned error {}", err);
        return Err(err);
    }
    out.flush()?;

    Ok(())
}

/// Print colored output to terminal on stderr.
pub fn print_colored_stderr(
    color: Color,
    color_choice_opt: Option<ColorChoice>,
    value: &[u8],
) -> std::io::Result<()> {
    let choice: ColorChoice = color_choice_opt.unwrap_or(ColorChoice::Auto);
    let mut stderr = termcolor::StandardStream::stderr(choice);
    let _stdout_lock = std::io::stdout().lock();

    print_colored(color, value, &mut stderr)
}

/// Safely write the `buffer` to stderr with help of [`StderrLock`].
///
/// [`StderrLock`]: std::io::StderrLock
pub fn write_stderr(buffer: &[u8]) {
    let mut stderr_lock = std::io::stderr().lock();
    if let Err(_err) = stderr_lock.write_all(buffer) {
        de_err!("stderr_lock.write(buffer@{:p} (len {})) error {}", buffer, buffer.len(), _err);
    }
    if let Err(_err) = stderr_lock.flush() {
        de_err!("stderr flushing error {}", _err);
    }
}
