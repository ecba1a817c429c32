//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (items, labels)
//! - 7xxx: Scanner errors (camera, decoding)
//! - 9xxx: System errors (config, printer, network)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as its `u16` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 6xxx: Catalog ====================
    /// Catalog item not found
    ProductNotFound = 6001,
    /// Catalog item has invalid price
    ProductInvalidPrice = 6002,
    /// Catalog item is out of stock
    ProductOutOfStock = 6003,
    /// Short code is empty or malformed
    ShortCodeInvalid = 6004,
    /// Encoded identifier does not match (id, short code)
    EncodedIdentifierMismatch = 6005,
    /// Label rendering failed
    LabelRenderFailed = 6701,
    /// QR code could not be encoded
    QrEncodeFailed = 6702,

    // ==================== 7xxx: Scanner ====================
    /// Camera permission denied
    CameraPermissionDenied = 7001,
    /// No camera found
    CameraNotFound = 7002,
    /// Camera API not supported
    CameraUnsupported = 7003,
    /// Camera in use by another application
    CameraBusy = 7004,
    /// Camera constraints cannot be satisfied
    CameraConstraintsUnsatisfiable = 7005,
    /// Camera requires a secure context
    InsecureContext = 7006,
    /// Frame could not be decoded
    DecodeFailed = 7101,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Printer not available
    PrinterNotAvailable = 9201,
    /// Print operation failed
    PrintFailed = 9202,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::ShortCodeInvalid => "Short code is invalid",
            ErrorCode::EncodedIdentifierMismatch => {
                "Encoded identifier does not match id and short code"
            }
            ErrorCode::LabelRenderFailed => "Label rendering failed",
            ErrorCode::QrEncodeFailed => "QR code encoding failed",

            // Scanner
            ErrorCode::CameraPermissionDenied => "Camera permission denied",
            ErrorCode::CameraNotFound => "No camera found",
            ErrorCode::CameraUnsupported => "Camera is not supported",
            ErrorCode::CameraBusy => "Camera is in use by another application",
            ErrorCode::CameraConstraintsUnsatisfiable => "Camera constraints cannot be satisfied",
            ErrorCode::InsecureContext => "Camera access requires a secure context",
            ErrorCode::DecodeFailed => "Frame could not be decoded",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::PrinterNotAvailable => "Printer not available",
            ErrorCode::PrintFailed => "Print operation failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductOutOfStock),
            6004 => Ok(ErrorCode::ShortCodeInvalid),
            6005 => Ok(ErrorCode::EncodedIdentifierMismatch),
            6701 => Ok(ErrorCode::LabelRenderFailed),
            6702 => Ok(ErrorCode::QrEncodeFailed),

            // Scanner
            7001 => Ok(ErrorCode::CameraPermissionDenied),
            7002 => Ok(ErrorCode::CameraNotFound),
            7003 => Ok(ErrorCode::CameraUnsupported),
            7004 => Ok(ErrorCode::CameraBusy),
            7005 => Ok(ErrorCode::CameraConstraintsUnsatisfiable),
            7006 => Ok(ErrorCode::InsecureContext),
            7101 => Ok(ErrorCode::DecodeFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9201 => Ok(ErrorCode::PrinterNotAvailable),
            9202 => Ok(ErrorCode::PrintFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::CameraBusy.code(), 7004);
        assert_eq!(ErrorCode::PrintFailed.code(), 9202);
    }

    #[test]
    fn test_try_from_round_trip() {
        for code in [
            ErrorCode::Unknown,
            ErrorCode::EncodedIdentifierMismatch,
            ErrorCode::QrEncodeFailed,
            ErrorCode::InsecureContext,
            ErrorCode::DecodeFailed,
            ErrorCode::PrinterNotAvailable,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_error_code_serde() {
        let json = serde_json::to_string(&ErrorCode::CameraNotFound).unwrap();
        assert_eq!(json, "7002");
        let code: ErrorCode = serde_json::from_str("6005").unwrap();
        assert_eq!(code, ErrorCode::EncodedIdentifierMismatch);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
    }
}
