//! Spreadsheet upload parsing and duplicate-row removal.
//!
//! Uploaded files are CSV text with a header row. Rows are kept as plain
//! text cells; two rows are duplicates when every compared cell matches
//! exactly.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A parsed spreadsheet: column headers plus rows aligned with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Which occurrence of a duplicated row survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepPolicy {
    /// Keep the first occurrence.
    #[default]
    First,
    /// Keep the last occurrence.
    Last,
    /// Drop every row that has a duplicate.
    None,
}

/// Options for [`drop_duplicates`].
#[derive(Debug, Clone, Default)]
pub struct DedupOptions {
    /// Columns to compare. `None` compares whole rows.
    pub subset: Option<Vec<String>>,
    pub keep: KeepPolicy,
}

/// Outcome of a duplicate-removal pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    pub sheet: Sheet,
    pub original_rows: usize,
    pub kept_rows: usize,
    pub removed_rows: usize,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse CSV bytes into a [`Sheet`].
///
/// The first non-blank record is the header. Quoted cells may span line
/// breaks. Blank lines are skipped, short rows are padded with empty cells,
/// and rows wider than the header or an unterminated quote are rejected.
pub fn parse_csv(data: &[u8]) -> Result<Sheet, String> {
    let text = std::str::from_utf8(data).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = parse_csv_records(text)?.into_iter();

    let columns = records.next().ok_or("CSV is empty")?;

    if columns.iter().all(|c| c.trim().is_empty()) {
        return Err("CSV header row is empty".into());
    }

    let width = columns.len();
    let mut rows = Vec::new();

    for (idx, mut values) in records.enumerate() {
        if values.len() > width {
            return Err(format!(
                "Row {} has {} fields, expected at most {width}",
                idx + 1,
                values.len()
            ));
        }
        values.resize(width, String::new());
        rows.push(values);
    }

    Ok(Sheet { columns, rows })
}

/// Split CSV text into records of cells.
///
/// Quotes are tracked across the whole text, so a quoted cell keeps any
/// embedded newlines. Unquoted blank lines produce no record.
fn parse_csv_records(text: &str) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1usize;
    let mut quote_opened_on = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\n' {
            line += 1;
        }

        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
            continue;
        }

        match ch {
            '"' => {
                in_quotes = true;
                quoted = true;
                quote_opened_on = line;
            }
            ',' => record.push(std::mem::take(&mut current)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut current));
                finish_record(&mut records, std::mem::take(&mut record), quoted);
                quoted = false;
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return Err(format!(
            "Unterminated quoted field starting on line {quote_opened_on}"
        ));
    }

    if !current.is_empty() || !record.is_empty() || quoted {
        record.push(current);
        finish_record(&mut records, record, quoted);
    }

    Ok(records)
}

fn finish_record(records: &mut Vec<Vec<String>>, record: Vec<String>, quoted: bool) {
    let blank = !quoted && record.len() == 1 && record[0].trim().is_empty();
    if !blank {
        records.push(record);
    }
}

/// Serialise a [`Sheet`] back to CSV text with a trailing newline.
pub fn build_csv(sheet: &Sheet) -> String {
    let mut out = String::new();
    push_csv_row(&mut out, &sheet.columns);
    for row in &sheet.rows {
        push_csv_row(&mut out, row);
    }
    out
}

fn push_csv_row(out: &mut String, cells: &[String]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_csv(cell));
    }
    out.push('\n');
}

fn escape_csv(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

// ---------------------------------------------------------------------------
// Duplicate removal
// ---------------------------------------------------------------------------

/// Remove duplicate rows from `sheet`.
///
/// Surviving rows keep their original relative order. Applying this twice
/// gives the same sheet as applying it once.
pub fn drop_duplicates(sheet: &Sheet, options: &DedupOptions) -> Result<DedupReport, CoreError> {
    let key_columns = resolve_subset(&sheet.columns, options.subset.as_deref())?;
    let key_of = |row: &Vec<String>| -> Vec<String> {
        key_columns
            .iter()
            .map(|&i| row.get(i).cloned().unwrap_or_default())
            .collect()
    };

    let keep: Vec<bool> = match options.keep {
        KeepPolicy::First => {
            let mut seen = HashSet::new();
            sheet.rows.iter().map(|row| seen.insert(key_of(row))).collect()
        }
        KeepPolicy::Last => {
            let mut seen = HashSet::new();
            let mut flags: Vec<bool> = sheet
                .rows
                .iter()
                .rev()
                .map(|row| seen.insert(key_of(row)))
                .collect();
            flags.reverse();
            flags
        }
        KeepPolicy::None => {
            let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
            for row in &sheet.rows {
                *counts.entry(key_of(row)).or_default() += 1;
            }
            sheet
                .rows
                .iter()
                .map(|row| counts.get(&key_of(row)) == Some(&1))
                .collect()
        }
    };

    let rows: Vec<Vec<String>> = sheet
        .rows
        .iter()
        .zip(&keep)
        .filter(|(_, keep)| **keep)
        .map(|(row, _)| row.clone())
        .collect();

    let original_rows = sheet.rows.len();
    let kept_rows = rows.len();

    Ok(DedupReport {
        sheet: Sheet {
            columns: sheet.columns.clone(),
            rows,
        },
        original_rows,
        kept_rows,
        removed_rows: original_rows - kept_rows,
    })
}

/// Map subset column names to indices. `None` or an empty list selects all
/// columns.
fn resolve_subset(columns: &[String], subset: Option<&[String]>) -> Result<Vec<usize>, CoreError> {
    let Some(names) = subset.filter(|s| !s.is_empty()) else {
        return Ok((0..columns.len()).collect());
    };

    names
        .iter()
        .map(|name| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| CoreError::Validation(format!("Unknown column '{name}'")))
        })
        .collect()
}
