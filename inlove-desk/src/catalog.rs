//! Catalog file loading
//!
//! The catalog is a JSON array of item rows. Readers never see it change
//! underneath them: every reload publishes a fresh [`CatalogSnapshot`]
//! through a `watch` channel. Reloads are driven by file system events.

use crate::core::{DeskError, DeskResult};
use crate::watch::FolderWatcher;
use shared::models::CatalogSnapshot;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Read and parse a catalog file
pub async fn load_catalog(path: impl AsRef<Path>) -> DeskResult<CatalogSnapshot> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DeskError::CatalogRead {
            path: path.display().to_string(),
            source,
        })?;
    let snapshot = CatalogSnapshot::from_json(&json)?;
    tracing::debug!(path = %path.display(), items = snapshot.len(), "Catalog loaded");
    Ok(snapshot)
}

/// Publishes a new snapshot whenever the catalog file changes
pub struct CatalogReloader {
    path: PathBuf,
    debounce: Duration,
    tx: watch::Sender<CatalogSnapshot>,
}

impl CatalogReloader {
    pub fn new(path: impl Into<PathBuf>, debounce: Duration, tx: watch::Sender<CatalogSnapshot>) -> Self {
        Self {
            path: path.into(),
            debounce,
            tx,
        }
    }

    /// Folder holding the catalog file
    ///
    /// The folder is watched rather than the file so that editors which
    /// save by replacing the file are still seen.
    fn folder(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn is_catalog(&self, path: &Path) -> bool {
        path.file_name().is_some() && path.file_name() == self.path.file_name()
    }

    /// Start watching the catalog folder
    pub fn watch(&self) -> DeskResult<FolderWatcher> {
        let folder = self.folder();
        FolderWatcher::new(&folder, self.debounce).map_err(|source| DeskError::Watch {
            path: folder.display().to_string(),
            source,
        })
    }

    /// Reload until shutdown, on every change to the catalog file
    pub async fn run(self, mut watcher: FolderWatcher, shutdown: CancellationToken) {
        tracing::info!(path = %self.path.display(), "Catalog reloader started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Catalog reloader received shutdown signal");
                    break;
                }
                changed = watcher.changed() => {
                    let Some(paths) = changed else {
                        tracing::warn!("Catalog watcher stopped");
                        break;
                    };
                    if paths.iter().any(|p| self.is_catalog(p)) {
                        self.reload().await;
                    }
                }
            }
        }
    }

    /// Load the file and publish it. Returns whether a new snapshot was
    /// published.
    ///
    /// A file that is missing or fails to parse keeps the previous snapshot.
    pub async fn reload(&self) -> bool {
        match load_catalog(&self.path).await {
            Ok(snapshot) => {
                tracing::info!(items = snapshot.len(), "Catalog reloaded");
                self.tx.send_replace(snapshot);
                true
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Catalog reload failed, keeping previous snapshot");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"[
        {"id": "abc-1", "name": "Conjunto Rosa", "short_code": "P001",
         "qr_code": "inlove_product:abc-1:P001", "price": 89.9, "stock_quantity": 4},
        {"id": "def-2", "name": "Camisola Cetim", "short_code": "P002",
         "qr_code": "inlove_product:def-2:P002", "price": 129.0, "stock_quantity": 0}
    ]"#;

    fn catalog_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_catalog() {
        let file = catalog_file(CATALOG);
        let snapshot = load_catalog(file.path()).await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.find_by_short_code("p002").unwrap().id, "def-2");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_catalog("/nonexistent/catalog.json").await;
        assert!(matches!(result, Err(DeskError::CatalogRead { .. })));
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let file = catalog_file("{not json");
        let result = load_catalog(file.path()).await;
        assert!(matches!(result, Err(DeskError::Catalog(_))));
    }

    #[tokio::test]
    async fn test_reload_publishes_snapshot() {
        let file = catalog_file(CATALOG);
        let (tx, rx) = watch::channel(CatalogSnapshot::default());
        let reloader = CatalogReloader::new(file.path(), Duration::from_millis(50), tx);

        assert!(reloader.reload().await);
        assert_eq!(rx.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_reload_keeps_previous_snapshot_on_bad_file() {
        let file = catalog_file("[oops");
        let (tx, rx) = watch::channel(CatalogSnapshot::new(Vec::new()));
        let reloader = CatalogReloader::new(file.path(), Duration::from_millis(50), tx);

        assert!(!reloader.reload().await);
        assert!(rx.borrow().is_empty());
    }

    #[test]
    fn test_watches_the_containing_folder() {
        let (tx, _rx) = watch::channel(CatalogSnapshot::default());
        let reloader = CatalogReloader::new("catalog.json", Duration::from_millis(50), tx);
        assert_eq!(reloader.folder(), PathBuf::from("."));
        assert!(reloader.is_catalog(Path::new("./catalog.json")));
        assert!(!reloader.is_catalog(Path::new("./notes.txt")));
    }

    #[tokio::test]
    async fn test_changed_file_is_published() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "[]").unwrap();

        let (tx, mut rx) = watch::channel(CatalogSnapshot::default());
        let reloader = CatalogReloader::new(&path, Duration::from_millis(50), tx);
        let watcher = reloader.watch().unwrap();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(reloader.run(watcher, shutdown.clone()));

        std::fs::write(&path, CATALOG).unwrap();
        tokio::time::timeout(Duration::from_secs(10), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rx.borrow().len(), 2);

        // a broken save is ignored
        std::fs::write(&path, "[oops").unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(rx.borrow().len(), 2);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_watch_missing_folder() {
        let (tx, _rx) = watch::channel(CatalogSnapshot::default());
        let reloader = CatalogReloader::new("/nonexistent/dir/catalog.json", Duration::from_millis(50), tx);
        assert!(matches!(reloader.watch(), Err(DeskError::Watch { .. })));
    }
}
