use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::warn;

use crate::core::{Level, ProcessRecord, Ticks};
use crate::error::{RecordError, RecordErrorKind};

const COMMENT: char = '#';
const DELIMITER: char = ';';
const FIELDS: usize = 5;

/// Records read from a source, plus the lines that were dropped.
#[derive(Debug, Default)]
pub struct ParsedInput {
    pub records: Vec<ProcessRecord>,
    pub skipped: Vec<RecordError>,
}

/// Parse one `label; burst; arrival; queue; priority` line. Blank lines and
/// comments give `Ok(None)`. `line` is 1-based and only used for errors.
pub fn parse_line(line: usize, text: &str) -> Result<Option<ProcessRecord>, RecordError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with(COMMENT) {
        return Ok(None);
    }

    let err = |kind| RecordError { line, kind };
    let fields: Vec<&str> = text.split(DELIMITER).map(str::trim).collect();
    if fields.len() != FIELDS {
        return Err(err(RecordErrorKind::FieldCount(fields.len())));
    }

    let label = fields[0];
    if label.is_empty() {
        return Err(err(RecordErrorKind::EmptyLabel));
    }
    let burst: Ticks = parse_field(fields[1], "burst time").map_err(err)?;
    let arrival: Ticks = parse_field(fields[2], "arrival time").map_err(err)?;
    let queue: Level = parse_field(fields[3], "queue level").map_err(err)?;
    let priority: i32 = parse_field(fields[4], "priority").map_err(err)?;
    if burst == 0 {
        return Err(err(RecordErrorKind::ZeroBurst));
    }

    Ok(Some(ProcessRecord::new(label, burst, arrival, queue, priority)))
}

fn parse_field<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, RecordErrorKind> {
    value.parse().map_err(|_| RecordErrorKind::BadInteger {
        field,
        value: value.to_string(),
    })
}

/// Read every record from `reader`, skipping malformed lines.
pub fn parse_records(reader: impl BufRead) -> io::Result<ParsedInput> {
    let mut parsed = ParsedInput::default();
    for (idx, line) in reader.lines().enumerate() {
        match parse_line(idx + 1, &line?) {
            Ok(Some(record)) => parsed.records.push(record),
            Ok(None) => {}
            Err(e) => {
                warn!("skipping malformed record: {e}");
                parsed.skipped.push(e);
            }
        }
    }
    Ok(parsed)
}

/// Read the process file at `path`. Fails only if it cannot be opened or read.
pub fn read_all(path: impl AsRef<Path>) -> io::Result<ParsedInput> {
    let file = File::open(path)?;
    parse_records(BufReader::new(file))
}
