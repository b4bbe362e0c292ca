//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Store errors
//! - 2xx: Embedding errors
//! - 3xx: Config errors
//! - 4xx: Ranking errors
//! - 5xx: Network errors
//! - 6xx: Storage errors
//! - 7xx: Pipeline errors
//! - 8xx: Validation errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for robot mode output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Store errors (1xx)
    // ========================================
    /// E101: Vector length differs from the store dimension
    DimensionMismatch,
    /// E102: Job id not present in the store
    JobNotFound,

    // ========================================
    // Embedding errors (2xx)
    // ========================================
    /// E201: Embedding provider failed or returned malformed output
    ProviderFailed,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file not found
    ConfigNotFound,
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Ranking errors (4xx)
    // ========================================
    /// E401: Model artifact could not be loaded or has the wrong shape
    ModelInvalid,

    // ========================================
    // Network errors (5xx)
    // ========================================
    /// E501: Cannot reach remote server
    NetworkUnreachable,
    /// E502: Network request timed out
    NetworkTimeout,
    /// E503: Source exceeded its request window
    RateLimited,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: Snapshot could not be written or read
    PersistenceFailed,
    /// E604: Database operation failed
    DatabaseError,
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Pipeline errors (7xx)
    // ========================================
    /// E701: A matching stage failed
    PipelineFailed,

    // ========================================
    // Validation errors (8xx)
    // ========================================
    /// E801: Input failed validation
    ValidationFailed,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Unexpected internal error
    InternalError,
    /// E903: Operation timed out
    Timeout,
    /// E905: Generic not found (catch-all)
    NotFound,
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `DimensionMismatch` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::DimensionMismatch => 101,
            Self::JobNotFound => 102,

            Self::ProviderFailed => 201,

            Self::ConfigNotFound => 301,
            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            Self::ModelInvalid => 401,

            Self::NetworkUnreachable => 501,
            Self::NetworkTimeout => 502,
            Self::RateLimited => 503,

            Self::PersistenceFailed => 601,
            Self::DatabaseError => 604,
            Self::SerializationError => 605,

            Self::PipelineFailed => 701,

            Self::ValidationFailed => 801,

            Self::InternalError => 901,
            Self::Timeout => 903,
            Self::NotFound => 905,
            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::DimensionMismatch => "Re-embed the jobs with the configured provider, or set store.dimension to match",
            Self::JobNotFound => "Run `jobmatch stats` to inspect the store, or ingest the job first",
            Self::ProviderFailed => "Check embedding.endpoint and the API key variable, or switch embedding.provider to local",
            Self::ConfigNotFound => "Create a config.toml or pass --config <path>",
            Self::ConfigInvalid => "Check TOML syntax and value ranges in the config file",
            Self::ConfigMissingRequired => "Set the missing value in config.toml or through a JOBMATCH_* variable",
            Self::ModelInvalid => "Retrain with `jobmatch train` or remove ranking.model_path to use the default weights",
            Self::NetworkUnreachable => "Check your network connection and ensure the remote server is accessible",
            Self::NetworkTimeout => "The remote server is slow or unreachable. Raise embedding.timeout_secs if needed",
            Self::RateLimited => "Wait for the rate-limit window to pass before querying this source again",
            Self::PersistenceFailed => "Check disk space and write permissions on the data directory",
            Self::DatabaseError => "The snapshot database may be corrupted. Run `jobmatch clear` to reset it",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::PipelineFailed => "A matching stage failed. Re-run with -vv for stage-level logs",
            Self::ValidationFailed => "Review the input and fix the reported field",
            Self::InternalError => "An unexpected error occurred. Please report this issue with full error output",
            Self::Timeout => "Operation timed out. Try again or increase timeout settings",
            Self::NotFound => "The requested resource was not found. Check the path or identifier",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::DatabaseError | Self::SerializationError | Self::InternalError
        )
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "store",
            2 => "embedding",
            3 => "config",
            4 => "ranking",
            5 => "network",
            6 => "storage",
            7 => "pipeline",
            8 => "validation",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::DimensionMismatch,
            Self::JobNotFound,
            Self::ProviderFailed,
            Self::ConfigNotFound,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::ModelInvalid,
            Self::NetworkUnreachable,
            Self::NetworkTimeout,
            Self::RateLimited,
            Self::PersistenceFailed,
            Self::DatabaseError,
            Self::SerializationError,
            Self::PipelineFailed,
            Self::ValidationFailed,
            Self::InternalError,
            Self::Timeout,
            Self::NotFound,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_numeric() {
        assert_eq!(ErrorCode::DimensionMismatch.numeric(), 101);
        assert_eq!(ErrorCode::ProviderFailed.numeric(), 201);
        assert_eq!(ErrorCode::ConfigNotFound.numeric(), 301);
        assert_eq!(ErrorCode::ModelInvalid.numeric(), 401);
        assert_eq!(ErrorCode::NetworkUnreachable.numeric(), 501);
        assert_eq!(ErrorCode::PersistenceFailed.numeric(), 601);
        assert_eq!(ErrorCode::PipelineFailed.numeric(), 701);
        assert_eq!(ErrorCode::ValidationFailed.numeric(), 801);
        assert_eq!(ErrorCode::InternalError.numeric(), 901);
    }

    #[test]
    fn test_all_codes_have_suggestions_and_categories() {
        for code in ErrorCode::all() {
            assert!(!code.suggestion().is_empty(), "{code:?} has empty suggestion");
            assert_ne!(code.category(), "unknown", "{code:?} has invalid category");
        }
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::RateLimited).unwrap();
        assert_eq!(json, "\"RATE_LIMITED\"");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::RateLimited);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::DimensionMismatch), "E101");
        assert_eq!(format!("{}", ErrorCode::InternalError), "E901");
    }

    #[test]
    fn test_no_duplicate_numeric_codes() {
        let mut seen = std::collections::HashSet::new();
        for code in ErrorCode::all() {
            assert!(seen.insert(code.numeric()), "duplicate {}", code.numeric());
        }
    }
}
