//! Unified error hierarchy for liftplan
//!
//! Every failure the plan generator can report is a variant of [`PlanError`]. All of them are
//! fatal for the current run; nothing in the core retries.

use chrono::{NaiveDate, Weekday};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all liftplan operations
#[derive(Debug, Error)]
pub enum PlanError {
    /// Calendar anchor is not a Monday
    #[error("Invalid start date {date}: plans must start on a Monday, got {weekday}")]
    InvalidStartDate { date: NaiveDate, weekday: Weekday },

    /// Requested (RPE, reps) pair is absent from the load table
    #[error("Missing RPE table entry for RPE {rpe} at {reps} reps")]
    MissingRpeEntry { rpe: f64, reps: String },

    /// Only 2, 3 and 4 day splits exist
    #[error("Unsupported day count: {0} (expected 2, 3 or 4)")]
    UnsupportedDayCount(u8),

    /// A primary lift has no tested maximum and strict maxima are enabled
    #[error("No estimated 1RM for primary exercise: {exercise}")]
    MissingMaximum { exercise: String },

    /// Caller supplied a value the formulas cannot work with
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Malformed RPE table resource
    #[error("Malformed RPE table at {location}: {reason}")]
    MalformedTable { location: String, reason: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Export target could not be written
    #[error("Export failed to {path}: {reason}")]
    ExportFailed { path: PathBuf, reason: String },
}

/// Result type alias for liftplan operations
pub type Result<T> = std::result::Result<T, PlanError>;

impl PlanError {
    /// Shorthand for [`PlanError::InvalidInput`]
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PlanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by user input rather than the environment
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PlanError::InvalidStartDate { .. }
                | PlanError::UnsupportedDayCount(_)
                | PlanError::MissingMaximum { .. }
                | PlanError::InvalidInput { .. }
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PlanError::InvalidStartDate { .. }
            | PlanError::UnsupportedDayCount(_)
            | PlanError::InvalidInput { .. } => ErrorSeverity::Warning,
            PlanError::MissingRpeEntry { .. } | PlanError::MalformedTable { .. } => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::Error,
        }
    }

    /// Emit the error as a tracing event at its severity
    pub fn log(&self) {
        let severity = self.severity();
        if severity.to_tracing_level() == tracing::Level::ERROR {
            tracing::error!(error = %self, ?severity, "Plan generation failed");
        } else {
            tracing::warn!(error = %self, ?severity, "Plan request rejected");
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            PlanError::InvalidStartDate { date, weekday } => format!(
                "{} is a {}. Please pick a Monday as the first training day.",
                date.format("%Y-%m-%d"),
                weekday
            ),
            PlanError::UnsupportedDayCount(days) => format!(
                "There is no {}-day program. Choose 2, 3 or 4 training days per week.",
                days
            ),
            PlanError::MissingMaximum { exercise } => format!(
                "The program needs a test result for {}. Add it with --test \"{}=WEIGHTxREPS\".",
                exercise, exercise
            ),
            PlanError::MissingRpeEntry { rpe, reps } => format!(
                "The RPE table has no load for RPE {} with {} reps. Check the table file.",
                rpe, reps
            ),
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Broken static resource, nothing can be generated
    Critical,
    /// Error that prevents the operation
    Error,
    /// Rejected user input
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
