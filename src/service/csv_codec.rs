//! CSV encoding and validation for bulk import and export.
//!
//! The format is two columns, `id,name`, with a mandatory header row. The
//! header is skipped on import without being checked.

use crate::domain::{Person, PersonId, validate_name};
use crate::error::DirectoryError;

/// One validated data row of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line number in the uploaded file.
    pub line: u64,
    /// Identifier from column 0.
    pub id: PersonId,
    /// Trimmed name from column 1.
    pub name: String,
}

/// UTF-8 byte order mark some spreadsheet tools prepend.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses and validates every data row of `data`.
///
/// The whole input is checked before anything is returned, so a caller
/// never acts on a partially valid file. Reported line numbers are
/// physical lines of the upload, counted from 1.
///
/// # Errors
///
/// Returns [`DirectoryError::MalformedCsv`] if the input is unreadable, a
/// record has unbalanced quotes, a row does not have exactly two non-empty
/// fields, an id is not a UUID, a name is invalid, or there are no data
/// rows at all.
pub fn parse_rows(data: &[u8]) -> Result<Vec<CsvRow>, DirectoryError> {
    // Stripped here so that reader byte offsets index `data` directly.
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| DirectoryError::MalformedCsv(format!("cannot read file: {e}")))?;
        if !more {
            break;
        }

        let start = record
            .position()
            .and_then(|p| usize::try_from(p.byte()).ok())
            .unwrap_or(0);
        // The record position sits before any blank lines the reader skipped.
        let start = data.get(start..).map_or(start, |rest| {
            start + rest.iter().take_while(|&&b| b == b'\n' || b == b'\r').count()
        });
        let end = usize::try_from(reader.position().byte()).unwrap_or(data.len());
        let line = physical_line(data, start);

        // The reader folds an unterminated quote into one field running to
        // end of input instead of failing.
        let raw = data.get(start..end).unwrap_or_default();
        if raw.iter().filter(|&&b| b == b'"').count() % 2 != 0 {
            return Err(DirectoryError::MalformedCsv(format!(
                "line {line}: unbalanced quotes"
            )));
        }

        if record.len() != 2 {
            return Err(DirectoryError::MalformedCsv(format!(
                "line {line}: expected 2 fields, found {}",
                record.len()
            )));
        }
        let (Some(raw_id), Some(raw_name)) = (record.get(0), record.get(1)) else {
            return Err(DirectoryError::MalformedCsv(format!(
                "line {line}: missing field"
            )));
        };
        if raw_id.is_empty() || raw_name.is_empty() {
            return Err(DirectoryError::MalformedCsv(format!(
                "line {line}: empty field"
            )));
        }

        let id = raw_id
            .parse::<PersonId>()
            .map_err(|e| DirectoryError::MalformedCsv(format!("line {line}: {e}")))?;
        let name = validate_name(raw_name)
            .map_err(|e| DirectoryError::MalformedCsv(format!("line {line}: {e}")))?;

        rows.push(CsvRow { line, id, name });
    }

    if rows.is_empty() {
        return Err(DirectoryError::MalformedCsv(
            "file contains no data rows".to_string(),
        ));
    }
    Ok(rows)
}

/// 1-based line number of the byte at `offset`.
fn physical_line(data: &[u8], offset: usize) -> u64 {
    let before = data.get(..offset).unwrap_or(data);
    let newlines = before.iter().filter(|&&b| b == b'\n').count();
    u64::try_from(newlines).map_or(u64::MAX, |n| n.saturating_add(1))
}

/// Serializes `persons` as CSV with an `id,name` header.
///
/// The header is written even when `persons` is empty.
///
/// # Errors
///
/// Returns [`DirectoryError::Internal`] if a record cannot be serialized.
pub fn encode_persons(persons: &[Person]) -> Result<Vec<u8>, DirectoryError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(Person::CSV_HEADER)
        .map_err(|e| DirectoryError::Internal(format!("cannot write csv header: {e}")))?;
    for person in persons {
        writer
            .serialize(person)
            .map_err(|e| DirectoryError::Internal(format!("cannot serialize person: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| DirectoryError::Internal(format!("cannot flush csv: {e}")))
}
