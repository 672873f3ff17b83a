//! Error types for the slot scheduler.

use crate::types::GeneratorId;
use thiserror::Error;

/// Failures that end a scheduling run.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("No eligible generator left for slot {slot_index}")]
    NoEligibleGenerator { slot_index: usize },

    #[error("Scheduler invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Parallel scheduling exceeded {rounds} rounds with slots {pending:?} still pending")]
    RoundLimitExceeded { rounds: usize, pending: Vec<usize> },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ScheduleError {
    /// True for errors that indicate a scheduler bug rather than an exhausted pool.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            ScheduleError::InvariantViolation(_) | ScheduleError::RoundLimitExceeded { .. }
        )
    }
}

/// Errors at the application boundary: configuration, logging, rendering, CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::RenderFailed(err.to_string())
    }
}

/// Reasons a slot attempt was discarded. These drive retries inside a run and
/// are never returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotRejection {
    #[error("generator {generator} produced no usable content")]
    GeneratorFailure { generator: GeneratorId },

    #[error("generator {generator} reused {overlap} fingerprints (tolerance {tolerance})")]
    ContentReused {
        generator: GeneratorId,
        overlap: usize,
        tolerance: usize,
    },

    #[error("generator {generator} carries exhausted tags {tags:?}")]
    QuotaExhausted {
        generator: GeneratorId,
        tags: Vec<String>,
    },
}

impl SlotRejection {
    pub fn generator(&self) -> &GeneratorId {
        match self {
            SlotRejection::GeneratorFailure { generator }
            | SlotRejection::ContentReused { generator, .. }
            | SlotRejection::QuotaExhausted { generator, .. } => generator,
        }
    }
}
