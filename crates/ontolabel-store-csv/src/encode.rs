//! Row codec for `terms.csv` tables.
//!
//! RFC 4180-style quoting: a field containing the delimiter, a double
//! quote, or a line break is wrapped in quotes, with internal quotes
//! doubled. Parsing is tolerant: the loader skips rows this module
//! rejects instead of failing the run.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use ontolabel_core::{CacheEntry, Curie, entry::TIMESTAMP_FORMAT};

pub(crate) const HEADER: &str = "curie,label,retrieved_at";

/// Why a persisted row was rejected. Rejected rows are counted and
/// skipped by the loader, never fatal.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RowError {
  /// Wrong number of fields (expected three).
  ColumnCount(usize),
  /// A quoted field was opened but never closed.
  UnterminatedQuote,
  /// `retrieved_at` did not match the second-precision ISO-8601 format.
  Timestamp(String),
}

// ─── Encoding ────────────────────────────────────────────────────────────────

/// Encode one entry as a single row (no trailing newline).
pub(crate) fn encode_row(entry: &CacheEntry) -> String {
  format!(
    "{},{},{}",
    quote_field(entry.curie.as_str()),
    quote_field(&entry.label),
    entry.retrieved_at.format(TIMESTAMP_FORMAT),
  )
}

/// Quote a field when it contains a delimiter-significant character.
fn quote_field(s: &str) -> Cow<'_, str> {
  if s.contains([',', '"', '\n', '\r']) {
    Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
  } else {
    Cow::Borrowed(s)
  }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Split file content into records, honouring line breaks inside quoted
/// fields. Records are contiguous slices of the input with any trailing
/// `\r` stripped.
pub(crate) fn split_records(content: &str) -> Vec<&str> {
  let mut records = Vec::new();
  let mut start = 0usize;
  let mut in_quotes = false;

  for (i, c) in content.char_indices() {
    match c {
      '"' => in_quotes = !in_quotes,
      '\n' if !in_quotes => {
        let record = &content[start..i];
        records.push(record.strip_suffix('\r').unwrap_or(record));
        start = i + 1;
      }
      _ => {}
    }
  }
  if start < content.len() {
    let record = &content[start..];
    records.push(record.strip_suffix('\r').unwrap_or(record));
  }

  records
}

/// Parse one record into a [`CacheEntry`].
pub(crate) fn parse_row(record: &str) -> Result<CacheEntry, RowError> {
  let fields = split_fields(record)?;
  if fields.len() != 3 {
    return Err(RowError::ColumnCount(fields.len()));
  }

  let retrieved_at = NaiveDateTime::parse_from_str(&fields[2], TIMESTAMP_FORMAT)
    .map_err(|_| RowError::Timestamp(fields[2].clone()))?
    .and_utc();

  Ok(CacheEntry {
    curie: Curie::new(fields[0].clone()),
    label: fields[1].clone(),
    retrieved_at,
  })
}

/// Split a record on unquoted commas, undoing the quoting applied by
/// [`quote_field`]. A quote is only significant at the start of a field;
/// stray quotes mid-field are kept literally.
fn split_fields(record: &str) -> Result<Vec<String>, RowError> {
  let mut fields = Vec::new();
  let mut field = String::new();
  let mut chars = record.chars().peekable();
  let mut in_quotes = false;

  while let Some(c) = chars.next() {
    if in_quotes {
      match c {
        '"' if chars.peek() == Some(&'"') => {
          chars.next();
          field.push('"');
        }
        '"' => in_quotes = false,
        _ => field.push(c),
      }
    } else {
      match c {
        '"' if field.is_empty() => in_quotes = true,
        ',' => fields.push(std::mem::take(&mut field)),
        _ => field.push(c),
      }
    }
  }

  if in_quotes {
    return Err(RowError::UnterminatedQuote);
  }
  fields.push(field);
  Ok(fields)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
