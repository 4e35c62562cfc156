//! Minimal roster CSV reader.
//!
//! Rules per data line: a `"` toggles quoted mode and is dropped from the
//! output; a `,` outside quotes ends the field. There is no `""` escape, so
//! unbalanced quotes just swallow the rest of the line into one field. That
//! output is lossy but never an error.
//!
//! The header line is split on every comma without quote handling.

use std::collections::HashMap;

/// One parsed row, keyed by trimmed header name.
pub type FieldMap = HashMap<String, String>;

/// Parse `text` (LF or CRLF) into one [`FieldMap`] per data line.
///
/// Blank lines between data lines still produce a row (all fields empty).
/// A leading UTF-8 byte-order mark is dropped.
pub fn parse(text: &str) -> Vec<FieldMap> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut lines = text.trim().split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let headers: Vec<&str> = match lines.next() {
        Some(head) if !head.trim().is_empty() => head.split(',').map(str::trim).collect(),
        _ => return Vec::new(),
    };

    lines
        .map(|line| {
            let cells = split_line(line);
            let mut row = FieldMap::with_capacity(headers.len());
            for (i, header) in headers.iter().enumerate() {
                let value = cells.get(i).map(|c| c.trim()).unwrap_or("");
                row.insert(header.to_string(), value.to_string());
            }
            row
        })
        .collect()
}

/// Split one data line into raw (untrimmed) cells.
pub fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;

    for c in line.chars() {
        match c {
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells
}
