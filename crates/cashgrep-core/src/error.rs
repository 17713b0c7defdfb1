//! Error types for cashgrep-core
//!
//! Criteria errors are usage errors (the run never starts); everything
//! else is fatal mid-run. `exit_code` gives the process exit status the
//! binary should use for each class.

use thiserror::Error;
use std::io;

use cashgrep_parser::ParseError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Split references an unregistered account
    MissingAccount,
    /// Malformed exact/prefix date selector
    InvalidDateSelector,
    /// Unknown date-type selector word
    InvalidDateTypeSelector,
    /// Unusable account filter
    InvalidAccountSelector,
    /// Undecodable or malformed input document
    Ingestion,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::MissingAccount => write!(f, "MISSING_ACCOUNT"),
            ErrorCode::InvalidDateSelector => write!(f, "INVALID_DATE_SELECTOR"),
            ErrorCode::InvalidDateTypeSelector => write!(f, "INVALID_DATE_TYPE_SELECTOR"),
            ErrorCode::InvalidAccountSelector => write!(f, "INVALID_ACCOUNT_SELECTOR"),
            ErrorCode::Ingestion => write!(f, "INGESTION"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Main error type for cashgrep-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Split references unknown account {id}")]
    MissingAccount { id: String },

    #[error("Invalid date selector {value:?}: dates must be YYYY, YYYY-MM or YYYY-MM-DD")]
    InvalidDateSelector { value: String },

    #[error("Invalid date type {value:?}: expected posted, entered or both")]
    InvalidDateTypeSelector { value: String },

    #[error("Invalid account selector: {reason}")]
    InvalidAccountSelector { reason: String },

    #[error("Ingestion failed: {0}")]
    Ingestion(#[from] ParseError),

    #[error("IO error")]
    IoError(#[from] io::Error),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::MissingAccount { .. } => ErrorCode::MissingAccount,
            CoreError::InvalidDateSelector { .. } => ErrorCode::InvalidDateSelector,
            CoreError::InvalidDateTypeSelector { .. } => ErrorCode::InvalidDateTypeSelector,
            CoreError::InvalidAccountSelector { .. } => ErrorCode::InvalidAccountSelector,
            CoreError::Ingestion(_) => ErrorCode::Ingestion,
            CoreError::IoError(_) => ErrorCode::IoError,
        }
    }

    /// True for criteria errors that should print usage text
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidDateSelector { .. }
                | CoreError::InvalidDateTypeSelector { .. }
                | CoreError::InvalidAccountSelector { .. }
        )
    }

    /// Process exit status for this error class
    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            2
        } else {
            1
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;
