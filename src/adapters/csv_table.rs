//! Reads the delivered CSV extract into a [`DataTable`].

use std::fs;
use std::path::Path;

use serde_json::{Number, Value};

use crate::domain::{AppError, ColumnSpec, ColumnType, DataTable};

/// Read `path` with positional, typed `columns`.
///
/// When `has_header` is set the first record is skipped; names always come from `columns`.
pub fn read_csv_into_table(
    path: &Path,
    columns: &[ColumnSpec],
    has_header: bool,
) -> Result<DataTable, AppError> {
    tracing::info!(file = %path.display(), "Reading CSV into table");
    let content = fs::read_to_string(path)?;
    let table = parse_csv(&content, columns, has_header)?;

    tracing::debug!(rows = table.len(), columns = columns.len(), "Table shape");
    if table.is_empty() {
        tracing::warn!(file = %path.display(), "Table contains no rows");
    }
    Ok(table)
}

/// Read a CSV whose first record names the columns. Every cell is kept as text.
pub fn read_headed_csv(path: &Path) -> Result<DataTable, AppError> {
    let content = fs::read_to_string(path)?;
    let records = split_records(&content)?;
    let Some((_, header)) = records.first() else {
        return Ok(DataTable::default());
    };

    let columns: Vec<ColumnSpec> =
        header.iter().map(|name| ColumnSpec::new(name.trim(), ColumnType::Text)).collect();
    parse_csv(&content, &columns, true)
}

/// Parse CSV text. Separate from I/O so it can be tested directly.
pub fn parse_csv(
    content: &str,
    columns: &[ColumnSpec],
    has_header: bool,
) -> Result<DataTable, AppError> {
    let mut table = DataTable::new(columns.iter().map(|c| c.name.clone()).collect());

    for (index, record) in split_records(content)?.into_iter().enumerate() {
        let (line, fields) = record;
        if index == 0 && has_header {
            continue;
        }
        if fields.len() != columns.len() {
            return Err(parse_error(
                line,
                format!("expected {} fields, found {}", columns.len(), fields.len()),
            ));
        }

        let row = fields
            .iter()
            .zip(columns)
            .map(|(raw, spec)| convert(raw, spec).map_err(|details| parse_error(line, details)))
            .collect::<Result<Vec<_>, _>>()?;
        table.push_row(row);
    }

    Ok(table)
}

fn parse_error(line: usize, details: String) -> AppError {
    AppError::ParseError { what: format!("CSV line {}", line), details }
}

fn convert(raw: &str, spec: &ColumnSpec) -> Result<Value, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    match spec.column_type {
        ColumnType::Text => Ok(Value::String(raw.to_string())),
        ColumnType::Integer => trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| {
                format!("column `{}`: '{}' is not an integer ({})", spec.name, trimmed, e)
            }),
        ColumnType::Float => {
            let value = trimmed.parse::<f64>().map_err(|e| {
                format!("column `{}`: '{}' is not a number ({})", spec.name, trimmed, e)
            })?;
            // NaN has no JSON form; it is a missing value like an empty cell.
            Ok(Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null))
        }
    }
}

/// Split into records of fields, honouring quotes. Yields the 1-based line each record starts on.
///
/// A leading UTF-8 byte order mark is dropped.
fn split_records(content: &str) -> Result<Vec<(usize, Vec<String>)>, AppError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                fields.clear();
                line += 1;
                record_line = line;
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(parse_error(record_line, "unterminated quoted field".to_string()));
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }
    Ok(records)
}
