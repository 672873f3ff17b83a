//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{AppError, ScheduleError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &AppError) -> String {
    match e {
        AppError::Schedule(ScheduleError::NoEligibleGenerator { slot_index }) => format!(
            "Could not fill slide {}: every generator is exhausted or over quota. \
             Try fewer slides or a schema with looser tag limits.",
            slot_index + 1
        ),
        AppError::Schedule(err) if err.is_invariant_violation() => {
            format!("Internal scheduling error: {}", err)
        }
        AppError::UnknownSchema(name) => format!(
            "Unknown schema '{}'. Run `slotdeck schemas` to list available schemas.",
            name
        ),
        other => other.to_string(),
    }
}
