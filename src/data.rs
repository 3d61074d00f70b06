//! Row Data - CSV Parsing Shared by Bundler Checks and the Label Sheet
//!
//! The format is deliberately naive: split on newline, split on comma,
//! strip double quotes. A comma inside a quoted field is not supported
//! and misparses; `validation` can point such lines out.

use serde::{Deserialize, Serialize};

/// Column values compared against this, case-sensitively, to set a flag.
pub const FLAG_SENTINEL: &str = "Yes";

/// Field delimiter.
pub const DELIMITER: char = ',';

/// One label's worth of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub url: String,
    /// General arrangement drawing available
    pub has_ga1: bool,
    /// Operator manual available
    pub has_manual: bool,
}

impl Row {
    /// Build a row from split columns. `None` when fewer than 2 columns.
    pub fn from_columns(cols: &[&str]) -> Option<Self> {
        if cols.len() < 2 {
            return None;
        }
        Some(Self {
            id: strip_quotes(cols[0]),
            url: strip_quotes(cols[1]),
            has_ga1: cols.get(2).is_some_and(|c| is_flag_set(c)),
            has_manual: cols.get(3).is_some_and(|c| is_flag_set(c)),
        })
    }

    /// Whether any supporting document exists for this row.
    pub fn has_docs(&self) -> bool {
        self.has_ga1 || self.has_manual
    }
}

fn strip_quotes(col: &str) -> String {
    col.replace('"', "")
}

fn is_flag_set(col: &str) -> bool {
    strip_quotes(col) == FLAG_SENTINEL
}

/// Split a data blob into record lines, header excluded.
///
/// A trailing `\r` is dropped so CRLF files parse like LF files.
pub fn record_lines(blob: &str) -> impl Iterator<Item = (usize, &str)> {
    blob.trim()
        .split('\n')
        .enumerate()
        .skip(1)
        .map(|(i, line)| (i + 1, line.strip_suffix('\r').unwrap_or(line)))
}

/// Header line of a data blob, if any.
pub fn header_line(blob: &str) -> Option<&str> {
    let trimmed = blob.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.split('\n').next().map(|l| l.strip_suffix('\r').unwrap_or(l))
}

pub fn split_record(line: &str) -> Vec<&str> {
    line.split(DELIMITER).collect()
}

/// Parse every well-formed row. Short rows are skipped without a trace.
pub fn parse_rows(blob: &str) -> Vec<Row> {
    record_lines(blob)
        .filter_map(|(_, line)| Row::from_columns(&split_record(line)))
        .collect()
}
