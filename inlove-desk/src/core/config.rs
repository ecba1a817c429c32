use crate::core::error::{DeskError, DeskResult};
use inlove_printer::{DEFAULT_HEADER, LabelLayout};
use inlove_scanner::{CaptureEnvironment, ScannerConfig};

/// Desk configuration
///
/// # Environment variables
///
/// All values can be set in the environment or a `.env` file:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CATALOG_PATH | catalog.json | Catalog JSON (array of item rows) |
/// | STORE_HEADER | IN LOVE | First line of every label |
/// | LABEL_PRESET | standard | `standard` (50×30 mm) or `wide` (58×40 mm) |
/// | PRINTER_ADDR | - | Label printer, `host[:port]` |
/// | LOG_LEVEL | info | trace, debug, info, warn, error |
/// | LOG_DIR | - | Daily rolling log files go here when set |
/// | SCAN_SECURE_CONTEXT | true | Whether the capture surface runs in a secure context |
/// | SCAN_MOBILE | false | Phone/tablet camera preference and guidance |
/// | CATALOG_DEBOUNCE_MS | 500 | Quiet time after a catalog file change before it is reloaded |
///
/// Scanner timing variables are read by [`ScannerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: String,
    pub store_header: String,
    pub label_preset: String,
    pub printer_addr: Option<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub secure_context: bool,
    pub mobile: bool,
    pub catalog_debounce_ms: u64,
    pub scanner: ScannerConfig,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            catalog_path: std::env::var("CATALOG_PATH").unwrap_or_else(|_| "catalog.json".into()),
            store_header: std::env::var("STORE_HEADER").unwrap_or_else(|_| DEFAULT_HEADER.into()),
            label_preset: std::env::var("LABEL_PRESET").unwrap_or_else(|_| "standard".into()),
            printer_addr: std::env::var("PRINTER_ADDR").ok().filter(|v| !v.is_empty()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.is_empty()),
            secure_context: std::env::var("SCAN_SECURE_CONTEXT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            mobile: std::env::var("SCAN_MOBILE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            catalog_debounce_ms: std::env::var("CATALOG_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            scanner: ScannerConfig::from_env(),
        }
    }

    /// Label layout for the configured preset and store header
    pub fn label_layout(&self) -> DeskResult<LabelLayout> {
        let layout = LabelLayout::preset(&self.label_preset)
            .ok_or_else(|| DeskError::InvalidPreset(self.label_preset.clone()))?;
        Ok(layout.with_header(self.store_header.clone()))
    }

    /// Capture environment reported to the scanner
    pub fn capture_environment(&self) -> CaptureEnvironment {
        CaptureEnvironment {
            secure_context: self.secure_context,
            camera_api: true,
            mobile: self.mobile,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
