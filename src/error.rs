//! Error types for Worker Connect.

use crate::submission::SubmissionKind;

/// Top-level error type for the modal state machines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("No {modal} open, start with {hint}")]
    NotOpen {
        modal: &'static str,
        hint: &'static str,
    },
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// User-facing validation failures, surfaced synchronously to the
/// presentation layer. Silent no-ops (duplicate skill, image cap, step
/// bounds) never produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a rating before submitting your review")]
    RatingRequired,

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Select a role before submitting")]
    NoRoleSelected,

    #[error("Submission is only available on the final step ({current} of {total})")]
    NotOnFinalStep { current: usize, total: usize },

    #[error("Missing required fields on {step}: {}", .fields.join(", "))]
    MissingFields {
        step: String,
        fields: Vec<&'static str>,
    },

    #[error("Experience must be a non-negative whole number of years, got {0:?}")]
    InvalidExperience(String),

    #[error("A step sequence needs at least one step")]
    EmptySequence,
}

/// Errors reported by a [`SubmissionSink`](crate::submission::SubmissionSink).
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{kind} submission rejected: {reason}")]
    Rejected { kind: SubmissionKind, reason: String },

    #[error("Submission sink unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors reported by a [`DataSource`](crate::directory::DataSource).
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
