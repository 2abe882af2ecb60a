use std::io::{self, Write};

use serde::Serialize;

use crate::core::{ProcessRecord, Slice};
use crate::metrics::{Averages, ProcessRow, Report, RunStats};

pub const HEADER: &str = "# label; BT; AT; Q; Pr; WT; CT; RT; TAT";

/// Write the text report: source header, one row per process, averages trailer.
pub fn write_all<W: Write>(
    mut sink: W,
    source: &str,
    rows: &[ProcessRow],
    averages: &Averages,
) -> io::Result<()> {
    writeln!(sink, "# file: {source}")?;
    writeln!(sink, "{HEADER}")?;
    for row in rows {
        writeln!(
            sink,
            "{};{};{};{};{};{};{};{};{}",
            row.label,
            row.burst,
            row.arrival,
            row.queue,
            row.priority,
            row.waiting,
            row.completion,
            row.response,
            row.turnaround
        )?;
    }
    writeln!(sink, "{}", averages_line(averages))?;
    sink.flush()
}

// `{:?}` keeps the fractional part on whole numbers: 4.0, 4.5
pub fn averages_line(averages: &Averages) -> String {
    format!(
        "WT={:?}; CT={:?}; RT={:?}; TAT={:?};",
        averages.waiting, averages.completion, averages.response, averages.turnaround
    )
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    processes: &'a [ProcessRow],
    averages: &'a Averages,
    stats: &'a RunStats,
}

pub fn write_json<W: Write>(
    mut sink: W,
    source: &str,
    report: &Report,
    stats: &RunStats,
) -> io::Result<()> {
    let json = JsonReport {
        source,
        processes: &report.rows,
        averages: &report.averages,
        stats,
    };
    serde_json::to_writer_pretty(&mut sink, &json)?;
    writeln!(sink)?;
    sink.flush()
}

/// `label: WT=.., CT=.., RT=.., TAT=..` per row.
pub fn format_summary(rows: &[ProcessRow]) -> String {
    rows.iter()
        .map(|r| {
            format!(
                "{}: WT={}, CT={}, RT={}, TAT={}\n",
                r.label, r.waiting, r.completion, r.response, r.turnaround
            )
        })
        .collect()
}

/// One `[start-end) label L<level>` line per applied slice.
pub fn format_timeline(timeline: &[Slice], processes: &[ProcessRecord]) -> String {
    timeline
        .iter()
        .map(|s| {
            format!(
                "[{:>4}-{:>4}) {} L{}\n",
                s.start,
                s.end(),
                processes[s.process].label,
                s.level
            )
        })
        .collect()
}
