//! Core error types for driftguard.
//!
//! This module defines store-agnostic error types. Storage-specific errors
//! (SQL, HTTP, SMTP, etc.) are converted to these types by the collaborator
//! implementations before they reach the core.

use rust_decimal::Decimal;
use std::num::ParseFloatError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the reconciliation core.
///
/// Collaborator-specific failures are wrapped in string form to keep this
/// type storage- and transport-agnostic. Compliance violations are NOT
/// errors; they are returned as structured `ComplianceResult` data.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(String),

    #[error("Account operation failed: {0}")]
    Account(String),

    #[error("Holdings registry operation failed: {0}")]
    Registry(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Signal rejected: {0}")]
    Signal(#[from] SignalError),

    #[error("Task sink error: {0}")]
    TaskSink(String),

    #[error("Report dispatch failed: {0}")]
    ReportDispatch(String),

    #[error("Quote provider error: {0}")]
    QuoteProvider(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Rejections raised before any per-account signal work begins.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("signal symbol is empty")]
    EmptySymbol,

    #[error("unknown signal direction '{0}'")]
    UnknownDirection(String),

    #[error("signal price must be positive, got {0}")]
    NonPositivePrice(Decimal),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
