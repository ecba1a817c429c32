//! Temporary preview files for rendered labels

use crate::error::LabelResult;
use crate::label::LabelDocument;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// A label document written to a temporary file
///
/// The file is removed when the surface is closed or dropped.
#[derive(Debug)]
pub struct PreviewSurface {
    file: Option<NamedTempFile>,
}

impl PreviewSurface {
    pub fn open(document: &LabelDocument, name_hint: &str) -> LabelResult<Self> {
        let prefix = format!("label-{}-", sanitize(name_hint));
        let suffix = format!(".{}", document.extension());
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(document.as_bytes())?;
        file.flush()?;
        debug!(path = %file.path().display(), "Preview opened");
        Ok(Self { file: Some(file) })
    }

    /// Path of the preview file, `None` once closed
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path())
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Remove the preview file now. Closing twice is a no-op.
    pub fn close(&mut self) -> LabelResult<()> {
        if let Some(file) = self.file.take() {
            debug!(path = %file.path().display(), "Preview closed");
            file.close()?;
        }
        Ok(())
    }
}

fn sanitize(hint: &str) -> String {
    hint.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(32)
        .collect()
}
