//! Error handling for jobmatch.
//!
//! This module provides:
//! - [`MatchError`]: The main error enum for all jobmatch operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestion and context
//!
//! Most errors never reach the caller of `match_jobs`: provider, persistence
//! and pipeline failures are absorbed by the core and surface only as log
//! lines or as the `fallback` algorithm tag. The CLI uses the structured form
//! for configuration and input problems.

mod codes;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;

/// Main error type for jobmatch operations.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding provider failed: {0}")]
    Provider(String),

    #[error("Ranking model error: {0}")]
    Model(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Pipeline failed at {stage}: {reason}")]
    Pipeline { stage: String, reason: String },

    #[error("Source '{source_name}' is rate limited")]
    RateLimited { source_name: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl MatchError {
    /// Get the error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::Http(err) if err.is_timeout() => ErrorCode::NetworkTimeout,
            Self::Http(_) => ErrorCode::NetworkUnreachable,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
            Self::Provider(_) => ErrorCode::ProviderFailed,
            Self::Model(_) => ErrorCode::ModelInvalid,
            Self::Persistence(_) => ErrorCode::PersistenceFailed,
            Self::Pipeline { .. } => ErrorCode::PipelineFailed,
            Self::RateLimited { .. } => ErrorCode::RateLimited,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Timeout(_) => ErrorCode::Timeout,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::DimensionMismatch { expected, actual } => {
                Some(serde_json::json!({ "expected": expected, "actual": actual }))
            }
            Self::Pipeline { stage, reason } => {
                Some(serde_json::json!({ "stage": stage, "reason": reason }))
            }
            Self::RateLimited { source_name } => Some(serde_json::json!({ "source": source_name })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_match_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// Printed on stdout in `--robot` mode so scripts can branch on `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "CONFIG_INVALID")
    pub code: ErrorCode,
    /// The numeric error code (e.g., 302)
    pub numeric_code: u16,
    /// Human-readable error message
    pub message: String,
    /// Actionable suggestion for recovery
    pub suggestion: String,
    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,
    /// Error category (e.g., "config", "network")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from a `MatchError`.
    #[must_use]
    pub fn from_match_error(err: &MatchError) -> Self {
        let mut structured = Self::new(err.code(), err.to_string());
        structured.context = err.context();
        structured
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_has_context() {
        let err = MatchError::DimensionMismatch {
            expected: 384,
            actual: 3,
        };
        assert_eq!(err.code(), ErrorCode::DimensionMismatch);
        let context = err.context().unwrap();
        assert_eq!(context["expected"], 384);
        assert_eq!(context["actual"], 3);
    }

    #[test]
    fn structured_error_carries_code_and_category() {
        let err = MatchError::Config("bad weight".to_string());
        let structured = err.to_structured();
        assert_eq!(structured.code, ErrorCode::ConfigInvalid);
        assert_eq!(structured.numeric_code, 302);
        assert_eq!(structured.category, "config");
        assert!(structured.message.contains("bad weight"));
    }

    #[test]
    fn structured_error_serializes_screaming_case() {
        let structured = MatchError::RateLimited {
            source_name: "boss".to_string(),
        }
        .to_structured();
        let json = serde_json::to_value(&structured).unwrap();
        assert_eq!(json["code"], "RATE_LIMITED");
        assert_eq!(json["context"]["source"], "boss");
    }

    #[test]
    fn pipeline_error_message_names_stage() {
        let err = MatchError::Pipeline {
            stage: "RECALL".to_string(),
            reason: "store poisoned".to_string(),
        };
        assert_eq!(err.to_string(), "Pipeline failed at RECALL: store poisoned");
    }
}
