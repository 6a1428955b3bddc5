//! Error types for tracker domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing validated tracker values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerDomainError {
    /// The owner identity is empty after trimming.
    #[error("owner identity must not be empty")]
    EmptyOwnerIdentity,

    /// A title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// A title exceeds the persisted column width.
    #[error("title is {length} characters long, maximum is {max}")]
    TitleTooLong {
        /// Character count of the rejected title.
        length: usize,
        /// Maximum permitted character count.
        max: usize,
    },

    /// A date field could not be parsed.
    #[error("invalid {field} '{value}', expected YYYY-MM-DD or RFC 3339")]
    InvalidDate {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value supplied by the caller.
        value: String,
    },

    /// A sprint ends before it starts.
    #[error("sprint end date {end} precedes start date {start}")]
    InvalidDateRange {
        /// Parsed start date.
        start: chrono::NaiveDate,
        /// Parsed end date.
        end: chrono::NaiveDate,
    },

    /// A task status string is not one of the enumerated values.
    #[error(transparent)]
    InvalidTaskStatus(#[from] ParseTaskStatusError),

    /// A sprint status string is not one of the enumerated values.
    #[error(transparent)]
    InvalidSprintStatus(#[from] ParseSprintStatusError),
}

/// Error returned while parsing task statuses from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}, expected TODO, IN_PROGRESS, or DONE")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing sprint statuses from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sprint status: {0}")]
pub struct ParseSprintStatusError(pub String);
