//! Debounced folder watching
//!
//! `notify` delivers events on its own thread; they are forwarded into a
//! tokio channel so async loops can `select!` on them.

use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Watches one directory (not recursively)
pub struct FolderWatcher {
    dir: PathBuf,
    rx: mpsc::UnboundedReceiver<Vec<PathBuf>>,
    _debouncer: Debouncer<notify::RecommendedWatcher>,
}

impl FolderWatcher {
    /// Start watching `dir`. Bursts of events closer than `debounce` are
    /// delivered as one batch.
    pub fn new(dir: impl Into<PathBuf>, debounce: Duration) -> notify::Result<Self> {
        let dir = dir.into();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut debouncer = new_debouncer(debounce, move |result: DebounceEventResult| match result {
            Ok(events) => {
                let paths: Vec<PathBuf> = events.into_iter().map(|e| e.path).collect();
                if !paths.is_empty() {
                    // the receiver is only gone while the watcher is dropped
                    let _ = tx.send(paths);
                }
            }
            Err(e) => tracing::warn!(error = %e, "File watcher error"),
        })?;
        debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(dir = %dir.display(), "Watching folder");

        Ok(Self {
            dir,
            rx,
            _debouncer: debouncer,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Entries touched since the last batch, as `dir/<name>`, sorted.
    /// `None` once the watcher has stopped.
    pub async fn changed(&mut self) -> Option<Vec<PathBuf>> {
        let paths = self.rx.recv().await?;
        let mut changed: Vec<PathBuf> = paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|name| self.dir.join(name))
            .collect();
        changed.sort();
        changed.dedup();
        Some(changed)
    }
}

impl fmt::Debug for FolderWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolderWatcher").field("dir", &self.dir).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_new_file_under_watched_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut watcher = FolderWatcher::new(dir.path(), Duration::from_millis(50)).unwrap();
        assert_eq!(watcher.dir(), dir.path());

        std::fs::write(dir.path().join("shot.png"), b"png").unwrap();

        let changed = tokio::time::timeout(Duration::from_secs(10), watcher.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(changed.contains(&dir.path().join("shot.png")));
    }

    #[test]
    fn test_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        assert!(FolderWatcher::new(missing, Duration::from_millis(50)).is_err());
    }
}
