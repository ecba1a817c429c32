//! Operator notifications (pt-BR)

use crate::error::CaptureError;
use serde::{Deserialize, Serialize};
use shared::models::CatalogItem;
use shared::util::{ellipsize, now_millis};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Characters of an unknown payload shown back to the operator
pub const PAYLOAD_PREVIEW_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Destructive,
}

/// A toast-style message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// Unix millis
    pub at: i64,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            at: now_millis(),
        }
    }

    pub fn camera_active(mobile: bool) -> Self {
        let description = if mobile {
            "Usando a traseira (quando disponível)."
        } else {
            "Posicione o QR na frente da webcam."
        };
        Self::new("📱 Câmera ativa", description, Severity::Info)
    }

    pub fn item_found(item: &CatalogItem) -> Self {
        Self::new(
            "🎉 Produto encontrado!",
            format!("{} - Código: {}", item.name, item.short_code),
            Severity::Success,
        )
    }

    /// Unknown payload; informational, scanning resumes on its own
    pub fn item_not_found(payload: &str) -> Self {
        Self::new(
            "📦 Produto não encontrado",
            format!(
                "QR: \"{}\" não cadastrado.",
                ellipsize(payload, PAYLOAD_PREVIEW_CHARS)
            ),
            Severity::Info,
        )
    }

    pub fn processing_failed() -> Self {
        Self::new(
            "⚠️ Erro ao processar QR Code",
            "Tente novamente.",
            Severity::Destructive,
        )
    }

    pub fn capture_failed(err: &CaptureError, mobile: bool) -> Self {
        Self::new(err.title(), err.describe(mobile), Severity::Destructive)
    }
}

/// Delivers notifications to the operator
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Destructive => warn!(title = %n.title, "{}", n.description),
            _ => info!(title = %n.title, "{}", n.description),
        }
    }
}

impl Notifier for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        // receiver gone means nobody is watching the surface
        let _ = self.send(notification);
    }
}
