//! Encoded identifier template
//!
//! The payload stored in every item's QR code:
//! `"<tag>:<identifier>:<short-code>"` with the fixed tag `inlove_product`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed tag literal heading every encoded identifier
pub const ENCODED_ID_TAG: &str = "inlove_product";

/// Field separator of the template
pub const ENCODED_ID_SEPARATOR: char = ':';

/// Parsed form of an encoded identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedIdentifier {
    pub id: String,
    pub short_code: String,
}

impl EncodedIdentifier {
    pub fn new(id: impl Into<String>, short_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            short_code: short_code.into(),
        }
    }

    /// Render the template text for `(id, short_code)`
    pub fn format(id: &str, short_code: &str) -> String {
        format!(
            "{ENCODED_ID_TAG}{ENCODED_ID_SEPARATOR}{id}{ENCODED_ID_SEPARATOR}{short_code}"
        )
    }

    /// Parse template text.
    ///
    /// Requires exactly three `:`-separated fields with the first equal to
    /// [`ENCODED_ID_TAG`]. Returns `None` otherwise.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split(ENCODED_ID_SEPARATOR);
        let tag = parts.next()?;
        let id = parts.next()?;
        let short_code = parts.next()?;
        if parts.next().is_some() || tag != ENCODED_ID_TAG {
            return None;
        }
        Some(Self::new(id, short_code))
    }
}

impl fmt::Display for EncodedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::format(&self.id, &self.short_code))
    }
}
