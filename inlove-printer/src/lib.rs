//! # inlove-printer
//!
//! Product label rendering and thermal printer output.
//!
//! ## Scope
//!
//! - Label composition (header, name, BRL price, short code, stock, QR)
//! - SVG documents at physical size, ESC/POS bytes for label printers
//! - QR encoding, raster and PNG export
//! - Network printing (TCP port 9100) and device-file printing
//! - Temporary preview files
//!
//! ## Example
//!
//! ```ignore
//! use inlove_printer::{LabelFormat, LabelLayout, LabelRenderer, NetworkPrinter, Printer};
//!
//! let renderer = LabelRenderer::new(LabelLayout::standard());
//! let label = renderer.render(&item, LabelFormat::EscPos).await?;
//!
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! printer.print(label.document.as_bytes()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod label;
mod preview;
mod printer;
mod qr;

// Re-exports
pub use encoding::{encode_cp1252, text_width, truncate_width};
pub use error::{LabelError, LabelResult, PrintError, PrintResult};
pub use escpos::{EscPosBuilder, MAX_RASTER_DOTS};
pub use label::{
    DEFAULT_HEADER, LabelArtifact, LabelContent, LabelDocument, LabelFormat, LabelLayout,
    LabelRenderer, NAME_BUDGET, QrMode, truncate_name,
};
pub use preview::PreviewSurface;
pub use printer::{DEFAULT_PORT, DevicePrinter, NetworkPrinter, Printer};
pub use qr::{DEFAULT_QUIET_ZONE, DOWNLOAD_SIZE_PX, QrImage, download_file_name};
