use crate::cli::LabelKind;
use crate::core::{Config, DeskError, DeskResult};
use inlove_printer::{
    DOWNLOAD_SIZE_PX, LabelFormat, LabelLayout, LabelRenderer, PreviewSurface, QrImage,
    download_file_name,
};
use serde::Serialize;
use shared::models::CatalogItem;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct LabelRequest {
    pub kind: LabelKind,
    pub output: Option<PathBuf>,
    pub preset: Option<String>,
    pub preview: bool,
}

#[derive(Debug, Serialize)]
pub struct LabelReport {
    pub short_code: String,
    pub path: PathBuf,
    pub bytes: usize,
    #[serde(skip)]
    pub preview: Option<PreviewSurface>,
}

impl fmt::Display for LabelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = if self.preview.is_some() { "Preview" } else { "Label" };
        write!(
            f,
            "{} {} -> {} ({} bytes)",
            what,
            self.short_code,
            self.path.display(),
            self.bytes
        )
    }
}

/// Layout from an explicit preset, or the configured one
pub fn layout_for(config: &Config, preset: Option<&str>) -> DeskResult<LabelLayout> {
    match preset {
        Some(name) => LabelLayout::preset(name)
            .map(|l| l.with_header(config.store_header.clone()))
            .ok_or_else(|| DeskError::InvalidPreset(name.to_string())),
        None => config.label_layout(),
    }
}

fn default_output(item: &CatalogItem, kind: LabelKind) -> PathBuf {
    match kind {
        LabelKind::Png => PathBuf::from(download_file_name(&item.short_code)),
        LabelKind::Svg => PathBuf::from(format!("label-{}.svg", item.short_code)),
        LabelKind::Escpos => PathBuf::from(format!("label-{}.bin", item.short_code)),
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> DeskResult<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| DeskError::Write {
            path: path.display().to_string(),
            source,
        })
}

/// Render a label (or the bare QR image) for an item
#[tracing::instrument(skip_all, fields(short_code = %item.short_code, kind = ?request.kind))]
pub async fn run(config: &Config, item: &CatalogItem, request: LabelRequest) -> DeskResult<LabelReport> {
    if request.kind == LabelKind::Png {
        let qr = QrImage::encode_async(item.encoded_identifier.clone()).await?;
        let png = qr.png_bytes(DOWNLOAD_SIZE_PX)?;
        let path = request.output.unwrap_or_else(|| default_output(item, LabelKind::Png));
        write_file(&path, &png).await?;
        tracing::info!(path = %path.display(), "QR image saved");
        return Ok(LabelReport {
            short_code: item.short_code.clone(),
            path,
            bytes: png.len(),
            preview: None,
        });
    }

    let format = match request.kind {
        LabelKind::Escpos => LabelFormat::EscPos,
        _ => LabelFormat::Svg,
    };
    let layout = layout_for(config, request.preset.as_deref())?;
    let artifact = LabelRenderer::new(layout).render(item, format).await?;
    let bytes = artifact.document.as_bytes().len();

    if request.preview {
        let surface = artifact.open_preview()?;
        let path = surface.path().map(|p| p.to_path_buf()).unwrap_or_default();
        tracing::info!(path = %path.display(), "Label preview opened");
        return Ok(LabelReport {
            short_code: item.short_code.clone(),
            path,
            bytes,
            preview: Some(surface),
        });
    }

    let path = request.output.unwrap_or_else(|| default_output(item, request.kind));
    write_file(&path, artifact.document.as_bytes()).await?;
    tracing::info!(path = %path.display(), bytes, "Label saved");
    Ok(LabelReport {
        short_code: item.short_code.clone(),
        path,
        bytes,
        preview: None,
    })
}
