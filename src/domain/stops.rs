//! Stop values for unclassed color ramps.
//!
//! The platform's default range for an unclassed ramp runs from the column
//! minimum to one sample standard deviation above the mean.

use crate::domain::{AppError, DataTable};

/// Summary statistics of a column with NaN values removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub min: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1). Zero when fewer than two values.
    pub std_dev: f64,
}

impl ColumnStats {
    /// Returns `None` when no non-NaN values remain.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if finite.is_empty() {
            return None;
        }

        let count = finite.len();
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = finite.iter().sum::<f64>() / count as f64;
        let std_dev = if count < 2 {
            0.0
        } else {
            let squares: f64 = finite.iter().map(|v| (v - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        };

        Some(Self { count, min, mean, std_dev })
    }

    /// Top of the ramp: mean plus one standard deviation.
    pub fn upper(&self) -> f64 {
        self.mean + self.std_dev
    }
}

/// `count` evenly spaced values from `start` to `stop`, both inclusive.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            values[count - 1] = stop;
            values
        }
    }
}

/// New stop values for `values`, truncated toward zero.
pub fn stop_values(
    values: &[f64],
    column_name: &str,
    stop_count: usize,
) -> Result<Vec<i64>, AppError> {
    if stop_count == 0 {
        return Err(AppError::InvalidStopCount(stop_count));
    }
    let stats = ColumnStats::from_values(values)
        .ok_or_else(|| AppError::EmptyColumn(column_name.to_string()))?;

    Ok(linspace(stats.min, stats.upper(), stop_count)
        .into_iter()
        .map(|v| v.trunc() as i64)
        .collect())
}

/// Stop values for `column_name` in `table`.
pub fn calculate_new_stops(
    table: &DataTable,
    column_name: &str,
    stop_count: usize,
) -> Result<Vec<i64>, AppError> {
    let values = table.numeric_column(column_name)?;
    stop_values(&values, column_name, stop_count)
}
