//! Product label composition
//!
//! A label carries the store header, the (possibly shortened) product
//! name, the BRL price, the short code, the stock count and a QR code of
//! the encoded identifier. It is produced either as a physical-size SVG
//! document or as ESC/POS bytes for a thermal label printer.

use crate::encoding::truncate_width;
use crate::error::{LabelError, LabelResult};
use crate::escpos::EscPosBuilder;
use crate::preview::PreviewSurface;
use crate::qr::QrImage;
use serde::{Deserialize, Serialize};
use shared::models::CatalogItem;
use shared::money::format_brl;
use shared::util::ellipsize;
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Header printed when no store name is configured
pub const DEFAULT_HEADER: &str = "IN LOVE";

/// Product names longer than this are cut and end with `...`
pub const NAME_BUDGET: usize = 25;

/// Vertical space reserved above the QR for header, name and price (mm)
const TEXT_BLOCK_MM: f32 = 11.0;

const MM_PER_INCH: f32 = 25.4;

/// How the QR reaches a thermal printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrMode {
    /// Bitmap of the locally encoded matrix (identical on every printer)
    #[default]
    Raster,
    /// The printer's built-in QR command
    Native,
}

/// Physical label geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelLayout {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub qr_size_mm: f32,
    /// Print head resolution
    pub dpi: u32,
    /// Text columns on the thermal printer
    pub columns: usize,
    pub header: String,
    #[serde(default)]
    pub qr_mode: QrMode,
}

impl LabelLayout {
    /// 50×30 mm adhesive label
    pub fn standard() -> Self {
        Self {
            width_mm: 50.0,
            height_mm: 30.0,
            margin_mm: 2.0,
            qr_size_mm: 15.0,
            dpi: 203,
            columns: 32,
            header: DEFAULT_HEADER.to_string(),
            qr_mode: QrMode::Raster,
        }
    }

    /// 58×40 mm label (full roll width)
    pub fn wide() -> Self {
        Self {
            width_mm: 58.0,
            height_mm: 40.0,
            ..Self::standard()
        }
    }

    /// Look up a preset by name (`standard` or `wide`)
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "50x30" => Some(Self::standard()),
            "wide" | "58x40" => Some(Self::wide()),
            _ => None,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_qr_mode(mut self, mode: QrMode) -> Self {
        self.qr_mode = mode;
        self
    }

    /// Convert millimetres to printer dots
    pub fn mm_to_dots(&self, mm: f32) -> u32 {
        (mm / MM_PER_INCH * self.dpi as f32).round().max(0.0) as u32
    }

    /// Side of the QR square actually drawn (mm)
    pub fn qr_side_mm(&self) -> f32 {
        let room = self.height_mm - 2.0 * self.margin_mm - TEXT_BLOCK_MM;
        self.qr_size_mm.min(room)
    }

    /// Check the geometry leaves room for every element
    pub fn validate(&self) -> LabelResult<()> {
        if self.width_mm <= 0.0 || self.height_mm <= 0.0 || self.margin_mm < 0.0 {
            return Err(LabelError::InvalidLayout(format!(
                "dimensions must be positive ({}x{} mm, margin {})",
                self.width_mm, self.height_mm, self.margin_mm
            )));
        }
        if self.dpi == 0 || self.columns == 0 {
            return Err(LabelError::InvalidLayout(
                "dpi and columns must be non-zero".to_string(),
            ));
        }
        let qr = self.qr_side_mm();
        if qr < 5.0 {
            return Err(LabelError::InvalidLayout(format!(
                "no room for the QR code on a {} mm tall label",
                self.height_mm
            )));
        }
        if self.width_mm - 2.0 * self.margin_mm < qr + 10.0 {
            return Err(LabelError::InvalidLayout(format!(
                "label too narrow ({} mm) for a {} mm QR code",
                self.width_mm, qr
            )));
        }
        Ok(())
    }
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self::standard()
    }
}

/// Output format of a rendered label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFormat {
    #[default]
    Svg,
    EscPos,
}

impl FromStr for LabelFormat {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "escpos" | "esc_pos" | "esc-pos" => Ok(Self::EscPos),
            other => Err(LabelError::InvalidLayout(format!(
                "unknown label format: {}",
                other
            ))),
        }
    }
}

/// Text content of a label, derived from a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelContent {
    pub header: String,
    pub name: String,
    pub price: String,
    pub short_code: String,
    pub stock: String,
    pub qr_payload: String,
}

impl LabelContent {
    pub fn from_item(item: &CatalogItem, header: &str) -> Self {
        Self {
            header: header.to_string(),
            name: truncate_name(&item.name),
            price: format_brl(item.price),
            short_code: item.short_code.clone(),
            stock: format!("Est: {}", item.stock_quantity),
            qr_payload: item.encoded_identifier.clone(),
        }
    }
}

/// Cut a product name to [`NAME_BUDGET`] characters, appending `...`
pub fn truncate_name(name: &str) -> String {
    ellipsize(name, NAME_BUDGET)
}

/// Rendered label document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelDocument {
    Svg(String),
    EscPos(Vec<u8>),
}

impl LabelDocument {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Svg(s) => s.as_bytes(),
            Self::EscPos(b) => b,
        }
    }

    pub fn format(&self) -> LabelFormat {
        match self {
            Self::Svg(_) => LabelFormat::Svg,
            Self::EscPos(_) => LabelFormat::EscPos,
        }
    }

    /// File extension used for previews and exports
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg(_) => "svg",
            Self::EscPos(_) => "bin",
        }
    }
}

/// A rendered label with everything it was built from
#[derive(Debug, Clone)]
pub struct LabelArtifact {
    pub content: LabelContent,
    pub layout: LabelLayout,
    pub qr: QrImage,
    pub document: LabelDocument,
}

impl LabelArtifact {
    /// Write the document to a temporary preview file
    ///
    /// The file lives as long as the returned guard.
    pub fn open_preview(&self) -> LabelResult<PreviewSurface> {
        PreviewSurface::open(&self.document, &self.content.short_code)
    }
}

/// Label renderer bound to one layout
#[derive(Debug, Clone, Default)]
pub struct LabelRenderer {
    layout: LabelLayout,
}

impl LabelRenderer {
    pub fn new(layout: LabelLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LabelLayout {
        &self.layout
    }

    /// Render a label for `item`
    ///
    /// The QR is encoded on the blocking pool and awaited before layout.
    #[instrument(skip(self, item), fields(short_code = %item.short_code, format = ?format))]
    pub async fn render(&self, item: &CatalogItem, format: LabelFormat) -> LabelResult<LabelArtifact> {
        self.layout.validate()?;

        let content = LabelContent::from_item(item, &self.layout.header);
        let qr = QrImage::encode_async(content.qr_payload.clone()).await?;

        let document = match format {
            LabelFormat::Svg => LabelDocument::Svg(self.compose_svg(&content, &qr)),
            LabelFormat::EscPos => LabelDocument::EscPos(self.compose_escpos(&content, &qr)),
        };
        debug!(bytes = document.as_bytes().len(), "Label rendered");

        Ok(LabelArtifact {
            content,
            layout: self.layout.clone(),
            qr,
            document,
        })
    }

    /// Physical-size SVG document (user units are millimetres)
    pub fn compose_svg(&self, content: &LabelContent, qr: &QrImage) -> String {
        let l = &self.layout;
        let (w, h, m) = (l.width_mm, l.height_mm, l.margin_mm);
        let cx = w / 2.0;
        let q = l.qr_side_mm();
        let qx = w - m - q;
        let qy = h - m - q;
        let quiet = 1;
        let module_mm = q / (qr.width() as f32 + 2.0 * quiet as f32);

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}" font-family="Arial, sans-serif">"#
        );
        let _ = write!(svg, r##"<rect width="{w}" height="{h}" fill="#fff"/>"##);
        let _ = write!(
            svg,
            r#"<text x="{cx}" y="{}" font-size="2.5" font-weight="bold" text-anchor="middle">{}</text>"#,
            m + 2.2,
            xml_escape(&content.header)
        );
        let _ = write!(
            svg,
            r#"<text x="{cx}" y="{}" font-size="3" font-weight="bold" text-anchor="middle">{}</text>"#,
            m + 5.6,
            xml_escape(&content.name)
        );
        let _ = write!(
            svg,
            r#"<text x="{cx}" y="{}" font-size="4" font-weight="bold" text-anchor="middle">{}</text>"#,
            m + 10.0,
            xml_escape(&content.price)
        );
        let _ = write!(
            svg,
            r#"<text x="{m}" y="{}" font-size="2.5" font-weight="bold">{}</text>"#,
            h - m - 3.5,
            xml_escape(&content.short_code)
        );
        let _ = write!(
            svg,
            r#"<text x="{m}" y="{}" font-size="2.1">{}</text>"#,
            h - m - 0.5,
            xml_escape(&content.stock)
        );
        let _ = write!(
            svg,
            r#"<g transform="translate({qx} {qy}) scale({module_mm})">{}</g>"#,
            qr.to_svg(quiet)
        );
        svg.push_str("</svg>");
        svg
    }

    /// ESC/POS bytes for a thermal label printer
    pub fn compose_escpos(&self, content: &LabelContent, qr: &QrImage) -> Vec<u8> {
        let l = &self.layout;
        let mut b = EscPosBuilder::new(l.columns);

        b.center().bold().line(&content.header).bold_off();
        b.double_height()
            .line(&truncate_width(&content.name, l.columns))
            .reset_size();
        b.double_size().bold().line(&content.price).bold_off().reset_size();
        b.left().line_lr(&content.short_code, &content.stock);

        b.center();
        let qr_dots = l.mm_to_dots(l.qr_side_mm());
        match l.qr_mode {
            #[cfg(feature = "image")]
            QrMode::Raster => {
                b.raster(&qr.to_luma_fit(qr_dots, 1));
            }
            _ => {
                let module = (qr_dots / (qr.width() as u32 + 2)).clamp(1, 16) as u8;
                b.qr_code(qr.payload(), module);
            }
        }
        b.left().feed(2).cut();
        b.build()
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
