use inlove_scanner::{MatchStage, resolve_with_stage};
use serde::Serialize;
use shared::models::{CatalogItem, CatalogSnapshot};
use shared::money::format_brl;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub payload: String,
    pub stage: Option<MatchStage>,
    pub item: Option<CatalogItem>,
}

/// Resolve a payload against the catalog
pub fn run(snapshot: &CatalogSnapshot, payload: &str) -> ResolveReport {
    let resolved = resolve_with_stage(payload, snapshot);
    tracing::debug!(
        payload_len = payload.len(),
        stage = resolved.as_ref().map(|(_, s)| s.name()),
        "Resolve"
    );
    ResolveReport {
        payload: payload.to_string(),
        stage: resolved.as_ref().map(|(_, stage)| *stage),
        item: resolved.map(|(item, _)| item.clone()),
    }
}

impl fmt::Display for ResolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.item, self.stage) {
            (Some(item), Some(stage)) => write!(
                f,
                "{} - Código: {}\n{}  estoque {}  ({})",
                item.name,
                item.short_code,
                format_brl(item.price),
                item.stock_quantity,
                stage
            ),
            _ => write!(f, "Produto não encontrado: {}", self.payload.trim()),
        }
    }
}
