//! QR encoding for labels
//!
//! The module matrix is computed once and handed to `qrcode`'s renderers:
//! an SVG element for label documents, a grayscale bitmap for ESC/POS
//! raster printing and PNG downloads.

use crate::error::{LabelError, LabelResult};
use qrcode::render::{Renderer, svg};
use qrcode::{Color, EcLevel, QrCode};
use tracing::instrument;

/// Quiet zone around standalone QR images, in modules
pub const DEFAULT_QUIET_ZONE: u32 = 2;

/// Side of the downloadable QR PNG, in pixels
pub const DOWNLOAD_SIZE_PX: u32 = 200;

/// Encoded QR module matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    payload: String,
    width: usize,
    modules: Vec<Color>,
}

impl QrImage {
    /// Encode a payload (error correction level M)
    pub fn encode(payload: &str) -> LabelResult<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
            .map_err(|e| LabelError::QrEncode(e.to_string()))?;
        Ok(Self {
            payload: payload.to_string(),
            width: code.width(),
            modules: code.to_colors(),
        })
    }

    /// Encode on the blocking pool
    ///
    /// Label composition awaits this before laying anything out.
    #[instrument(skip_all, fields(payload_len = payload.len()))]
    pub async fn encode_async(payload: String) -> LabelResult<Self> {
        tokio::task::spawn_blocking(move || Self::encode(&payload))
            .await
            .map_err(|e| LabelError::EncodeTask(e.to_string()))?
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Modules per side (without quiet zone)
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x] == Color::Dark
    }

    /// Renderer over the module matrix with a `quiet`-module margin
    fn renderer<P: qrcode::render::Pixel>(&self, quiet: u32) -> Renderer<'_, P> {
        Renderer::new(&self.modules, self.width, quiet)
    }

    /// Standalone `<svg>` element, one user unit per module, including a
    /// `quiet`-module margin
    pub fn to_svg(&self, quiet: u32) -> String {
        let doc = self
            .renderer::<svg::Color<'_>>(quiet)
            .module_dimensions(1, 1)
            .dark_color(svg::Color("#000"))
            .light_color(svg::Color("#fff"))
            .build();
        // drop the XML declaration so the element can be nested
        match doc.find("<svg") {
            Some(start) => doc[start..].to_string(),
            None => doc,
        }
    }

    /// Render as a grayscale bitmap, `module_px` pixels per module
    #[cfg(feature = "image")]
    pub fn to_luma(&self, module_px: u32, quiet: u32) -> image::GrayImage {
        let module_px = module_px.max(1);
        self.renderer::<image::Luma<u8>>(quiet)
            .module_dimensions(module_px, module_px)
            .build()
    }

    /// Render with the largest whole module size fitting `target_px`
    #[cfg(feature = "image")]
    pub fn to_luma_fit(&self, target_px: u32, quiet: u32) -> image::GrayImage {
        let modules = self.width as u32 + 2 * quiet;
        self.to_luma(target_px / modules, quiet)
    }

    /// PNG bytes of the code, about `size_px` square
    #[cfg(feature = "image")]
    pub fn png_bytes(&self, size_px: u32) -> LabelResult<Vec<u8>> {
        let img = self.to_luma_fit(size_px, DEFAULT_QUIET_ZONE);
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| LabelError::Image(e.to_string()))?;
        Ok(buf.into_inner())
    }

    /// `data:image/png;base64,...` URL for the download button
    #[cfg(feature = "image")]
    pub fn png_data_url(&self, size_px: u32) -> LabelResult<String> {
        use base64::Engine;
        let png = self.png_bytes(size_px)?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }
}

/// File name offered when downloading an item's QR image
pub fn download_file_name(short_code: &str) -> String {
    format!("qrcode-{}.png", short_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_dimensions() {
        let qr = QrImage::encode("inlove_product:abc-1:P001").unwrap();
        // versions grow in steps of 4 modules from 21
        assert!(qr.width() >= 21);
        assert_eq!((qr.width() - 21) % 4, 0);
        assert_eq!(qr.payload(), "inlove_product:abc-1:P001");
        // finder pattern corner is always dark
        assert!(qr.is_dark(0, 0));
        assert!(!qr.is_dark(qr.width(), 0));
    }

    #[test]
    fn test_encode_too_long() {
        let payload = "x".repeat(8000);
        assert!(matches!(
            QrImage::encode(&payload),
            Err(LabelError::QrEncode(_))
        ));
    }

    #[tokio::test]
    async fn test_encode_async_matches_sync() {
        let payload = "inlove_product:abc-1:P001".to_string();
        let a = QrImage::encode_async(payload.clone()).await.unwrap();
        let b = QrImage::encode(&payload).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_svg_element_sized_in_modules() {
        let qr = QrImage::encode("P001").unwrap();
        let svg = qr.to_svg(2);
        let side = qr.width() + 4;
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(!svg.contains("<?xml"));
        assert!(svg.contains(&format!("width=\"{side}\"")));
        assert!(svg.contains("#000"));
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_to_luma_fit() {
        let qr = QrImage::encode("inlove_product:abc-1:P001").unwrap();
        let img = qr.to_luma_fit(200, 2);
        let modules = qr.width() as u32 + 4;
        assert_eq!(img.width(), (200 / modules) * modules);
        // quiet zone is white, first finder module is black
        let px = 200 / modules;
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert_eq!(img.get_pixel(2 * px, 2 * px)[0], 0);
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_png_data_url() {
        let qr = QrImage::encode("inlove_product:abc-1:P001").unwrap();
        let url = qr.png_data_url(DOWNLOAD_SIZE_PX).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("P001"), "qrcode-P001.png");
    }
}
