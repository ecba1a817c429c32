use crate::camera::{FrameInput, ImageFileBackend};
use crate::catalog::{CatalogReloader, load_catalog};
use crate::core::{Config, DeskResult};
use inlove_scanner::{CaptureError, LogNotifier, RqrrDecoder, ScanError, ScanOutcome, ScanSession};
use serde::Serialize;
use shared::models::CatalogItem;
use shared::money::format_brl;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct ScanRequest {
    pub paths: Vec<PathBuf>,
    pub watch: bool,
    pub continuous: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    pub matched: Vec<CatalogItem>,
    /// Why scanning stopped, when it was not a match or a shutdown
    pub error: Option<String>,
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched.is_empty() {
            write!(f, "Nenhum produto encontrado")?;
        }
        for (i, item) in self.matched.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{} - Código: {}  {}  estoque {}",
                item.name,
                item.short_code,
                format_brl(item.price),
                item.stock_quantity
            )?;
        }
        if let Some(error) = &self.error {
            write!(f, "\n{}", error)?;
        }
        Ok(())
    }
}

/// Scan image files until a match (or until shutdown when continuous)
///
/// The catalog is reloaded in the background when its file changes, so
/// items added while the desk is scanning resolve on the next frame.
pub async fn run(config: &Config, request: ScanRequest, shutdown: CancellationToken) -> DeskResult<ScanReport> {
    let snapshot = load_catalog(&config.catalog_path).await?;
    tracing::info!(items = snapshot.len(), "Catalog ready for scanning");

    let (catalog_tx, catalog_rx) = watch::channel(snapshot);
    let reloader = CatalogReloader::new(
        &config.catalog_path,
        Duration::from_millis(config.catalog_debounce_ms),
        catalog_tx,
    );
    let reloader_token = shutdown.child_token();
    let reloader_handle = match reloader.watch() {
        Ok(watcher) => Some(tokio::spawn(reloader.run(watcher, reloader_token.clone()))),
        Err(e) => {
            tracing::warn!(error = %e, "Catalog changes will not be picked up while scanning");
            None
        }
    };

    let backend = ImageFileBackend::from_paths(&request.paths, request.watch, config.capture_environment());
    let watching = matches!(backend.input(), FrameInput::Watch(_));
    let mut session = ScanSession::new(
        backend,
        RqrrDecoder,
        LogNotifier,
        catalog_rx,
        config.scanner.clone(),
    );

    let mut report = ScanReport::default();
    let stop = StopRule {
        continuous: request.continuous,
        watching,
        mobile: config.mobile,
    };
    let result = scan_loop(&mut session, &mut report, stop, &shutdown).await;

    session.close();
    reloader_token.cancel();
    if let Some(handle) = reloader_handle
        && let Err(e) = handle.await
    {
        tracing::warn!(error = %e, "Catalog reloader task failed");
    }

    result.map(|()| report)
}

#[derive(Debug, Clone, Copy)]
struct StopRule {
    continuous: bool,
    watching: bool,
    mobile: bool,
}

async fn scan_loop(
    session: &mut ScanSession<ImageFileBackend, RqrrDecoder, LogNotifier>,
    report: &mut ScanReport,
    stop: StopRule,
    shutdown: &CancellationToken,
) -> DeskResult<()> {
    loop {
        match session.run(shutdown.child_token()).await? {
            ScanOutcome::Matched(item) => {
                report.matched.push(*item);
                session.dismiss().map_err(ScanError::from)?;
                if !stop.continuous {
                    return Ok(());
                }
            }
            ScanOutcome::Closed => return Ok(()),
            ScanOutcome::Failed(err) => {
                // file input running dry after some matches is a normal end
                let exhausted = !stop.watching
                    && matches!(err, CaptureError::Unknown(_) | CaptureError::DeviceNotFound)
                    && !report.matched.is_empty();
                if !exhausted {
                    report.error = Some(err.describe(stop.mobile));
                }
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inlove_printer::QrImage;
    use inlove_scanner::ScannerConfig;
    use std::path::Path;

    const CATALOG: &str = r#"[
        {"id": "abc-1", "name": "Conjunto Rosa", "short_code": "P001",
         "qr_code": "inlove_product:abc-1:P001", "price": 89.9, "stock_quantity": 4},
        {"id": "def-2", "name": "Camisola Cetim", "short_code": "P002",
         "qr_code": "inlove_product:def-2:P002", "price": 129.0, "stock_quantity": 0}
    ]"#;

    fn config(catalog_path: &Path) -> Config {
        Config {
            catalog_path: catalog_path.display().to_string(),
            store_header: "IN LOVE".into(),
            label_preset: "standard".into(),
            printer_addr: None,
            log_level: "info".into(),
            log_dir: None,
            secure_context: true,
            mobile: false,
            catalog_debounce_ms: 200,
            scanner: ScannerConfig {
                max_scans_per_second: 50,
                ..ScannerConfig::default()
            },
        }
    }

    fn write_qr(dir: &Path, name: &str, payload: &str) -> PathBuf {
        let path = dir.join(name);
        QrImage::encode(payload).unwrap().to_luma(4, 4).save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_scan_matches_label_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        std::fs::write(&catalog, CATALOG).unwrap();
        let frame = write_qr(dir.path(), "shot.png", "inlove_product:def-2:P002");

        let request = ScanRequest {
            paths: vec![frame],
            watch: false,
            continuous: false,
        };
        let report = run(&config(&catalog), request, CancellationToken::new()).await.unwrap();

        assert_eq!(report.matched.len(), 1);
        assert_eq!(report.matched[0].short_code, "P002");
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn test_continuous_scan_collects_every_match() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        std::fs::write(&catalog, CATALOG).unwrap();
        let frames = dir.path().join("frames");
        std::fs::create_dir(&frames).unwrap();
        write_qr(&frames, "1.png", "inlove_product:abc-1:P001");
        write_qr(&frames, "2.png", "inlove_product:def-2:P002");

        let request = ScanRequest {
            paths: vec![frames],
            watch: false,
            continuous: true,
        };
        let report = run(&config(&catalog), request, CancellationToken::new()).await.unwrap();

        let codes: Vec<&str> = report.matched.iter().map(|i| i.short_code.as_str()).collect();
        assert_eq!(codes, ["P001", "P002"]);
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn test_no_frames_reports_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        std::fs::write(&catalog, CATALOG).unwrap();

        let request = ScanRequest {
            paths: vec![dir.path().join("missing.png")],
            watch: false,
            continuous: false,
        };
        let report = run(&config(&catalog), request, CancellationToken::new()).await.unwrap();

        assert!(report.matched.is_empty());
        assert!(report.error.is_some());
        assert!(report.to_string().starts_with("Nenhum produto encontrado"));
    }

    #[tokio::test]
    async fn test_watched_folder_sees_items_added_while_scanning() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        std::fs::write(&catalog, CATALOG).unwrap();
        let frames = dir.path().join("frames");
        std::fs::create_dir(&frames).unwrap();

        let mut config = config(&catalog);
        config.catalog_debounce_ms = 50;
        let request = ScanRequest {
            paths: vec![frames.clone()],
            watch: true,
            continuous: false,
        };
        let updated = CATALOG.replace(
            "\n    ]",
            r#",
        {"id": "ghi-3", "name": "Robe Seda", "short_code": "P003",
         "qr_code": "inlove_product:ghi-3:P003", "price": 199.0, "stock_quantity": 2}
    ]"#,
        );

        // a new item is saved, then its label is photographed
        let operator = async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            std::fs::write(&catalog, updated).unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            write_qr(&frames, "shot.png", "inlove_product:ghi-3:P003");
        };
        let scan = async { tokio::join!(run(&config, request, CancellationToken::new()), operator).0 };

        let report = tokio::time::timeout(Duration::from_secs(10), scan)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.matched.len(), 1);
        assert_eq!(report.matched[0].short_code, "P003");
    }
}
