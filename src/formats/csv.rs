//! Delimited-record (CSV) reading.
//!
//! Records carry three columns: location, source text, target text. Quoted
//! fields use doubled quotes for embedded quotes and may span lines.

use crate::formats::FormatError;
use crate::unit::TranslationUnit;

/// Parses three-column records into a unit sequence.
///
/// A leading column-title row (`location,source,target` or the legacy
/// `source,original,translation`) and a `Content-Type:` pseudo-header row are
/// skipped; the merge engine never sees them.
pub fn parse(text: &str) -> Result<Vec<TranslationUnit>, FormatError> {
    let mut units = Vec::new();
    let mut first_row = true;

    for (line, record) in records(text)? {
        let [location, source, target] = validate_columns(line, record)?;

        if std::mem::take(&mut first_row) && is_boilerplate_row(&location, &source, &target) {
            tracing::debug!(line, "skipping boilerplate header row");
            continue;
        }

        let mut unit = TranslationUnit::new(source);
        if !location.trim().is_empty() {
            unit.add_location(location.trim());
        }
        unit.target = target;
        units.push(unit);
    }

    Ok(units)
}

/// Checks the column count of one record.
fn validate_columns(line: usize, record: Vec<String>) -> Result<[String; 3], FormatError> {
    let found = record.len();
    <[String; 3]>::try_from(record).map_err(|_| FormatError::Csv {
        line,
        message: format!("expected 3 columns (location, source, target), found {found}"),
    })
}

/// Recognizes the two conventional first rows that carry no translatable
/// content: column titles and an embedded `Content-Type:` header.
fn is_boilerplate_row(location: &str, source: &str, target: &str) -> bool {
    let titles: Vec<String> =
        [location, source, target].iter().map(|s| s.trim().to_lowercase()).collect();
    if titles == ["location", "source", "target"] || titles == ["source", "original", "translation"]
    {
        return true;
    }
    location.trim().is_empty() && source.contains("Content-Type:")
}

/// Splits the input into records of unquoted field values, keeping the
/// 1-indexed line each record starts on. Fields may be quoted; a doubled
/// quote inside a quoted field is a literal quote.
fn records(text: &str) -> Result<Vec<(usize, Vec<String>)>, FormatError> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut record: Vec<String> = Vec::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                record.push(std::mem::take(&mut field));
            }
            '\r' if !in_quotes => {}
            '\n' => {
                line += 1;
                if in_quotes {
                    field.push('\n');
                } else {
                    finish_record(&mut field, &mut record, record_line, &mut rows);
                    record_line = line;
                }
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(FormatError::Csv {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    finish_record(&mut field, &mut record, record_line, &mut rows);

    Ok(rows)
}

/// Closes the current record, dropping rows that are entirely empty.
fn finish_record(
    field: &mut String,
    record: &mut Vec<String>,
    record_line: usize,
    rows: &mut Vec<(usize, Vec<String>)>,
) {
    if field.is_empty() && record.is_empty() {
        return;
    }
    record.push(std::mem::take(field));
    rows.push((record_line, std::mem::take(record)));
}
