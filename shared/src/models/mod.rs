//! Data models
//!
//! Row shapes follow the hosted backend's `products` table, so a JSON
//! export of that table deserializes straight into [`CatalogItem`].

pub mod catalog;
pub mod identifier;

// Re-exports
pub use catalog::*;
pub use identifier::*;
