//! Desk commands
//!
//! Each command loads what it needs, does its work and returns a report
//! the caller prints as text or JSON.

pub mod label;
pub mod print;
pub mod resolve;
pub mod scan;
pub mod stock;

use crate::catalog::load_catalog;
use crate::cli::Commands;
use crate::core::{Config, DeskError, DeskResult};
use serde::Serialize;
use shared::models::{CatalogItem, CatalogSnapshot};
use std::fmt::Display;
use tokio_util::sync::CancellationToken;

/// Find an item by short code (case-insensitive) or id
pub fn find_item<'a>(snapshot: &'a CatalogSnapshot, code: &str) -> DeskResult<&'a CatalogItem> {
    let code = code.trim();
    snapshot
        .find_by_short_code(code)
        .or_else(|| snapshot.find_by_id(code))
        .ok_or_else(|| DeskError::ItemNotFound(code.to_string()))
}

/// Render a report for the terminal
pub fn render<T: Serialize + Display>(report: &T, json: bool) -> String {
    if json {
        serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    } else {
        report.to_string()
    }
}

/// Run one command and return its rendered output
pub async fn execute(
    command: Commands,
    config: &Config,
    json: bool,
    shutdown: CancellationToken,
) -> DeskResult<String> {
    match command {
        Commands::Resolve { payload } => {
            let snapshot = load_catalog(&config.catalog_path).await?;
            Ok(render(&resolve::run(&snapshot, &payload), json))
        }
        Commands::Label {
            code,
            format,
            output,
            preset,
            preview,
        } => {
            let snapshot = load_catalog(&config.catalog_path).await?;
            let item = find_item(&snapshot, &code)?;
            let request = label::LabelRequest {
                kind: format,
                output,
                preset,
                preview,
            };
            let mut report = label::run(config, item, request).await?;
            if let Some(surface) = report.preview.as_mut() {
                // keep the file around until the operator is done with it
                tracing::info!("Preview open, press Ctrl+C to close");
                shutdown.cancelled().await;
                surface.close()?;
            }
            Ok(render(&report, json))
        }
        Commands::Print {
            code,
            copies,
            addr,
            device,
            preset,
        } => {
            let snapshot = load_catalog(&config.catalog_path).await?;
            let item = find_item(&snapshot, &code)?;
            let request = print::PrintRequest {
                copies,
                addr,
                device,
                preset,
            };
            Ok(render(&print::run(config, item, request).await?, json))
        }
        Commands::Scan {
            paths,
            watch,
            continuous,
        } => {
            let request = scan::ScanRequest {
                paths,
                watch,
                continuous,
            };
            Ok(render(&scan::run(config, request, shutdown).await?, json))
        }
        Commands::Stock => {
            let snapshot = load_catalog(&config.catalog_path).await?;
            Ok(render(&stock::run(&snapshot), json))
        }
    }
}
