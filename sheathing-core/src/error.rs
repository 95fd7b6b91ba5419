//! Error types for simulation setup.
//!
//! Placement-time conditions (rule rejections, degenerate trims, stalls) are
//! not errors; they are reported through `StepOutcome` and `WallRun`.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for simulation setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Job file not found (-1)
    FileNotFound = -1,
    /// Job file could not be decoded (-3)
    InvalidJob = -3,
    /// Panel catalog is empty or invalid (E100)
    InvalidCatalog = 100,
    /// Wall geometry is invalid (E200)
    InvalidWall = 200,
    /// Wall has no studs (E201)
    NoStuds = 201,
    /// Opening geometry is invalid (E202)
    InvalidOpening = 202,
    /// Validation reported errors (E300)
    ValidationFailed = 300,
}

/// Main error type for simulation setup.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid job description: {message}")]
    InvalidJob { message: String },

    #[error("Panel catalog is empty")]
    EmptyCatalog,

    #[error("Invalid stock panel '{name}': {reason}")]
    InvalidStock { name: String, reason: String },

    #[error("No walls to simulate")]
    NoWalls,

    #[error("Invalid wall '{wall}': {reason}")]
    InvalidWall { wall: String, reason: String },

    #[error("Wall '{wall}' has no studs")]
    NoStuds { wall: String },

    #[error("Invalid opening on wall '{wall}': {reason}")]
    InvalidOpening { wall: String, reason: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SimError::FileNotFound { .. } => ErrorCode::FileNotFound,
            SimError::InvalidJob { .. } => ErrorCode::InvalidJob,
            SimError::EmptyCatalog => ErrorCode::InvalidCatalog,
            SimError::InvalidStock { .. } => ErrorCode::InvalidCatalog,
            SimError::NoWalls => ErrorCode::InvalidWall,
            SimError::InvalidWall { .. } => ErrorCode::InvalidWall,
            SimError::NoStuds { .. } => ErrorCode::NoStuds,
            SimError::InvalidOpening { .. } => ErrorCode::InvalidOpening,
            SimError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SimError::Io(_) => ErrorCode::FileNotFound,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::InvalidJob {
            message: err.to_string(),
        }
    }
}

/// Result type alias for simulation setup.
pub type Result<T> = std::result::Result<T, SimError>;
