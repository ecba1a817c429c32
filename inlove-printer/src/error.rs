//! Error types for the printer library

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;

/// Label rendering error types
#[derive(Debug, Error)]
pub enum LabelError {
    /// Payload does not fit in any QR version
    #[error("QR encode failed: {0}")]
    QrEncode(String),

    /// The blocking encode task panicked or was cancelled
    #[error("QR encode task failed: {0}")]
    EncodeTask(String),

    /// Layout does not leave room for the content
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// PNG export failed
    #[error("Image error: {0}")]
    Image(String),

    /// Preview surface could not be created
    #[error("Preview failed: {0}")]
    Preview(#[from] std::io::Error),
}

/// Result type for label rendering
pub type LabelResult<T> = Result<T, LabelError>;

impl From<PrintError> for AppError {
    fn from(err: PrintError) -> Self {
        let code = match &err {
            PrintError::Connection(_) | PrintError::Timeout(_) => ErrorCode::PrinterNotAvailable,
            PrintError::InvalidConfig(_) => ErrorCode::ConfigError,
            PrintError::Io(_) => ErrorCode::PrintFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

impl From<LabelError> for AppError {
    fn from(err: LabelError) -> Self {
        let code = match &err {
            LabelError::QrEncode(_) | LabelError::EncodeTask(_) => ErrorCode::QrEncodeFailed,
            _ => ErrorCode::LabelRenderFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}
