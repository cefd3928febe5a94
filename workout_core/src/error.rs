//! Error types for the workout_core library.

use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workout_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Split template validation error
    #[error("Split validation error: {0}")]
    SplitValidation(String),

    /// The exercise catalog could not answer a query
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// No saved workout day with this id
    #[error("Workout day {0} not found")]
    DayNotFound(Uuid),

    /// The day exists but has no exercise at this position
    #[error("Workout day {day} has no exercise at slot {slot}")]
    SlotNotFound { day: Uuid, slot: usize },

    /// Catalog has no exercise with this id
    #[error("Exercise '{0}' not found in catalog")]
    ExerciseNotFound(String),

    /// Swap target is already used by another slot of the same day
    #[error("Exercise '{0}' is already in this workout")]
    DuplicateExercise(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
