//! In-memory tabular data shared by the CSV reader and the feature layer query.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::domain::AppError;

/// Column-named rows of JSON scalar cells. Missing values are `Value::Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Append a row. Short rows are padded with nulls, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Numeric view of a column. Nulls, NaN and non-numeric text are left out.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, AppError> {
        let index =
            self.column_index(name).ok_or_else(|| AppError::MissingColumn(name.to_string()))?;

        Ok(self
            .rows
            .iter()
            .filter_map(|row| as_number(&row[index]))
            .filter(|value| !value.is_nan())
            .collect())
    }

    /// Rows keyed by the normalised value of `key_column`.
    ///
    /// Each entry holds the row's other fields in column order. Rows with a
    /// null key are skipped. On duplicate keys the last row wins.
    pub fn rows_by_key(
        &self,
        key_column: &str,
    ) -> Result<HashMap<String, Map<String, Value>>, AppError> {
        let key_index = self
            .column_index(key_column)
            .ok_or_else(|| AppError::MissingColumn(key_column.to_string()))?;

        let mut keyed = HashMap::with_capacity(self.rows.len());
        for row in &self.rows {
            let Some(key) = key_string(&row[key_index]) else {
                continue;
            };

            let fields: Map<String, Value> = self
                .columns
                .iter()
                .zip(row)
                .enumerate()
                .filter(|(i, _)| *i != key_index)
                .map(|(_, (name, value))| (name.clone(), value.clone()))
                .collect();
            keyed.insert(key, fields);
        }
        Ok(keyed)
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Key normalisation so that `12`, `12.0` and `"12"` all address the same row.
pub fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i.to_string());
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Some((f as i64).to_string()),
                Some(f) => Some(f.to_string()),
                None => Some(n.to_string()),
            }
        }
        other => Some(other.to_string()),
    }
}
