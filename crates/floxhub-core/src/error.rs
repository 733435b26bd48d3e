//! Core error types for floxhub-core.
//!
//! This module defines the error hierarchy using thiserror. Each concern
//! (board, validation, configuration) has its own enum, and [`CoreError`]
//! aggregates them for callers that do not care which layer failed.

use std::path::PathBuf;
use thiserror::Error;

use crate::sync::SyncError;

/// Core error type for floxhub-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Task board errors
    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    /// Task source records rejected at ingestion
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Score synchronization errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by task board operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Toggle requested on an id that is not on the board
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Filter requested with a category name outside the fixed set
    #[error("Unknown task category '{0}' (expected ALL, FRONTEND, BACKEND, MEETING, ADMIN or PLANNING)")]
    UnknownCategory(String),

    /// Sort requested with an unsupported key
    #[error("Unknown sort key '{0}' (expected WEIGHT, DEADLINE or STATUS)")]
    UnknownSortKey(String),

    /// Priority name outside HIGH/MEDIUM/LOW
    #[error("Unknown priority '{0}' (expected HIGH, MEDIUM or LOW)")]
    UnknownPriority(String),
}

/// Validation errors for task source records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A record violates a task invariant
    #[error("Invalid task '{id}': {field} {message}")]
    InvalidTaskShape {
        id: String,
        field: &'static str,
        message: String,
    },

    /// Two records share the same id
    #[error("Duplicate task id '{0}'")]
    DuplicateId(String),
}

impl ValidationError {
    pub(crate) fn shape(id: &str, field: &'static str, message: impl Into<String>) -> Self {
        ValidationError::InvalidTaskShape {
            id: id.to_string(),
            field,
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
