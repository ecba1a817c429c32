use super::label::layout_for;
use crate::core::{Config, DeskError, DeskResult};
use inlove_printer::{DevicePrinter, LabelFormat, LabelRenderer, NetworkPrinter, Printer};
use serde::Serialize;
use shared::models::CatalogItem;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub struct PrintRequest {
    pub copies: u32,
    pub addr: Option<String>,
    pub device: Option<PathBuf>,
    pub preset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PrintReport {
    pub short_code: String,
    pub printer: String,
    pub copies: u32,
    pub bytes: usize,
}

impl fmt::Display for PrintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{} -> {} ({} bytes each)",
            self.short_code, self.copies, self.printer, self.bytes
        )
    }
}

/// Render an ESC/POS label and send it to the printer
///
/// A device file wins over a network address; the configured
/// `PRINTER_ADDR` is the last resort.
#[tracing::instrument(skip_all, fields(short_code = %item.short_code, copies = request.copies))]
pub async fn run(config: &Config, item: &CatalogItem, request: PrintRequest) -> DeskResult<PrintReport> {
    let layout = layout_for(config, request.preset.as_deref())?;
    let artifact = LabelRenderer::new(layout)
        .render(item, LabelFormat::EscPos)
        .await?;
    let data = artifact.document.as_bytes();

    let printer = if let Some(device) = request.device {
        let printer = DevicePrinter::new(device);
        printer.print_copies(data, request.copies).await?;
        printer.path().display().to_string()
    } else {
        let addr = request
            .addr
            .or_else(|| config.printer_addr.clone())
            .ok_or(DeskError::NoPrinter)?;
        let printer = NetworkPrinter::lookup(&addr).await?;
        if !printer.is_online().await {
            tracing::warn!(addr = %printer.addr(), "Printer did not answer the reachability check");
        }
        printer.print_copies(data, request.copies).await?;
        printer.addr().to_string()
    };

    tracing::info!(printer = %printer, "Label printed");
    Ok(PrintReport {
        short_code: item.short_code.clone(),
        printer,
        copies: request.copies,
        bytes: data.len(),
    })
}
