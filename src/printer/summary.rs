// src/printer/summary.rs

//! CLI options `--summary` and `--report-interval` printing functions.
//! Only used by `loggap.rs`.

use crate::data::datetime::DateTimeLOpt;
use crate::printer::printers::{
    print_colored_stderr,
    write_stderr,
    ColorChoice,
    COLOR_DIMMED,
};
use crate::readers::summary::{Snapshot, SummaryGapProcessor};

use ::si_trace_print::defñ;

/// datetime format for printing of datetime
const DATETIMEFMT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// For printing a level of indentation.
const OPT_SUMMARY_PRINT_INDENT1: &str = "  ";

fn datetime_to_string(dt_opt: &DateTimeLOpt) -> String {
    match dt_opt {
        Some(dt) => dt.format(DATETIMEFMT).to_string(),
        None => String::from("None"),
    }
}

/// The one-line text of a [`Snapshot`].
pub fn snapshot_to_string(snapshot: &Snapshot) -> String {
    format!(
        "Snapshot: last datetime {}, lines {}, mean {:.3}, stddev {:.3}",
        datetime_to_string(&snapshot.dt_last),
        snapshot.lines,
        snapshot.mean,
        snapshot.stddev,
    )
}

/// Print a [`Snapshot`] to stderr in a dimmed color.
pub fn print_snapshot(
    snapshot: &Snapshot,
    color_choice: ColorChoice,
) {
    defñ!("{:?}", snapshot);
    let mut s = snapshot_to_string(snapshot);
    s.push('\n');
    if print_colored_stderr(COLOR_DIMMED, Some(color_choice), s.as_bytes()).is_err() {
        write_stderr(s.as_bytes());
    }
}

/// The multi-line text of a [`SummaryGapProcessor`].
pub fn summary_to_string(summary: &SummaryGapProcessor) -> String {
    let i = OPT_SUMMARY_PRINT_INDENT1;
    let mut s = String::from("Summary:\n");
    s.push_str(&format!("{}Lines read      : {}\n", i, summary.GapProcessor_lines));
    s.push_str(&format!("{}Records skipped : {}\n", i, summary.GapProcessor_skipped));
    s.push_str(&format!("{}Gaps pushed     : {}\n", i, summary.GapProcessor_gaps_pushed));
    s.push_str(&format!("{}Gaps evaluated  : {}\n", i, summary.GapProcessor_gaps_evaluated));
    s.push_str(&format!("{}Gaps aberrant   : {}\n", i, summary.GapProcessor_gaps_aberrant));
    s.push_str(&format!("{}Records printed : {}\n", i, summary.GapProcessor_emitted));
    s.push_str(&format!("{}Datetime first  : {}\n", i, datetime_to_string(&summary.GapProcessor_dt_first)));
    s.push_str(&format!("{}Datetime last   : {}\n", i, datetime_to_string(&summary.GapProcessor_dt_last)));
    s.push_str(&format!(
        "{}Window          : {} (filled {})\n",
        i, summary.GapProcessor_window, summary.GapProcessor_window_filled
    ));
    s.push_str(&format!("{}Window mean     : {:.3}\n", i, summary.GapProcessor_mean));
    s.push_str(&format!("{}Window stddev   : {:.3}\n", i, summary.GapProcessor_stddev));

    s
}

/// Print a [`SummaryGapProcessor`] to stderr.
pub fn print_summary(summary: &SummaryGapProcessor) {
    defñ!();
    let s = summary_to_string(summary);
    write_stderr(s.as_bytes());
}
