//! Shared types for the In Love retail core
//!
//! Common types used across the printer, scanner and desk crates:
//! catalog models, the encoded identifier template, BRL money
//! formatting and the unified error system.

pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use models::{CatalogItem, CatalogSnapshot, EncodedIdentifier, ItemStatus};
