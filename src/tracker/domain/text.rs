//! Validated text and date values shared by projects, sprints, and tasks.

use super::TrackerDomainError;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty, trimmed title of a project, sprint, or task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    /// Longest title accepted, matching the `VARCHAR(255)` columns.
    pub const MAX_LENGTH: usize = 255;

    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyTitle`] when the value is empty
    /// after trimming, or [`TrackerDomainError::TitleTooLong`] when it exceeds
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TrackerDomainError::EmptyTitle);
        }
        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TrackerDomainError::TitleTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a calendar date supplied as `YYYY-MM-DD` or as an RFC 3339
/// timestamp, keeping only the date part of the latter.
///
/// # Errors
///
/// Returns [`TrackerDomainError::InvalidDate`] naming `field` when neither
/// format matches.
pub fn parse_calendar_date(
    field: &'static str,
    value: &str,
) -> Result<NaiveDate, TrackerDomainError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|parsed| parsed.date_naive()))
        .map_err(|_| TrackerDomainError::InvalidDate {
            field,
            value: value.to_owned(),
        })
}
