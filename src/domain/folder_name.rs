//! Naming and matching of timestamped download folders.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use regex::Regex;

use crate::domain::AppError;

/// Default strftime template. Fixed width and zero padded so that name order equals time order.
pub const DEFAULT_DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Default regex matching the date portion produced by [`DEFAULT_DATE_FORMAT`].
pub const DEFAULT_DATE_PATTERN: &str = "[0-9]{8}_[0-9]{6}";

/// Classifies folder names as `prefix + timestamp` and produces new ones.
///
/// The prefix is literal text; only the date pattern is interpreted as a regex.
/// Matching is anchored at the start of the name and not at the end.
#[derive(Debug, Clone)]
pub struct FolderNamePattern {
    prefix: String,
    date_format: String,
    matcher: Regex,
}

impl FolderNamePattern {
    pub fn new(prefix: &str, date_format: &str, date_pattern: &str) -> Result<Self, AppError> {
        validate_date_format(date_format)?;

        let source = format!("^{}(?:{})", regex::escape(prefix), date_pattern);
        let matcher = Regex::new(&source).map_err(|e| AppError::InvalidFolderPattern {
            pattern: date_pattern.to_string(),
            details: e.to_string(),
        })?;

        Ok(Self { prefix: prefix.to_string(), date_format: date_format.to_string(), matcher })
    }

    pub fn with_defaults(prefix: &str) -> Result<Self, AppError> {
        Self::new(prefix, DEFAULT_DATE_FORMAT, DEFAULT_DATE_PATTERN)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Folder name for the given instant.
    pub fn name_for<Tz: TimeZone>(&self, when: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("{}{}", self.prefix, when.format(&self.date_format))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }
}

/// Rejects templates chrono would fail on while rendering.
pub fn validate_date_format(date_format: &str) -> Result<(), AppError> {
    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return Err(AppError::InvalidDateFormat(date_format.to_string()));
    }
    Ok(())
}
