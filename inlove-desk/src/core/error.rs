use inlove_printer::{LabelError, PrintError};
use inlove_scanner::ScanError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Desk errors
#[derive(Debug, Error)]
pub enum DeskError {
    #[error("Failed to read catalog {path}: {source}")]
    CatalogRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Catalog(#[from] AppError),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Unknown label preset: {0} (expected standard or wide)")]
    InvalidPreset(String),

    #[error("No printer configured (set PRINTER_ADDR or pass --addr)")]
    NoPrinter,

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    Print(#[from] PrintError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Failed to watch {path}: {source}")]
    Watch {
        path: String,
        #[source]
        source: notify::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type DeskResult<T> = Result<T, DeskError>;

impl From<DeskError> for AppError {
    fn from(err: DeskError) -> Self {
        let message = err.to_string();
        match err {
            DeskError::Catalog(app) => app,
            DeskError::Label(e) => e.into(),
            DeskError::Print(e) => e.into(),
            DeskError::Scan(ScanError::Capture(e)) => e.into(),
            DeskError::CatalogRead { .. }
            | DeskError::Watch { .. }
            | DeskError::Write { .. }
            | DeskError::Scan(ScanError::Transition(_)) => {
                AppError::with_message(ErrorCode::InternalError, message)
            }
            DeskError::ItemNotFound(_) => AppError::with_message(ErrorCode::ProductNotFound, message),
            DeskError::InvalidPreset(_) | DeskError::NoPrinter => AppError::config(message),
        }
    }
}
