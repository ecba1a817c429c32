//! Catalog Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

use super::identifier::EncodedIdentifier;
use crate::error::{AppError, AppResult, ErrorCode};

/// Predefined product categories
pub const PRODUCT_CATEGORIES: [&str; 12] = [
    "Lingerie",
    "Pijama",
    "Moda Praia",
    "Moda Íntima",
    "Camisolas",
    "Roupão",
    "Meias",
    "Acessórios",
    "Body",
    "Cinta",
    "Sutiã",
    "Calcinha",
];

/// Lifecycle status of a catalog item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Active,
    Inactive,
    OutOfStock,
}

impl ItemStatus {
    /// Status implied by a stock change (zero stock means out of stock)
    pub fn for_stock(quantity: u32) -> Self {
        if quantity == 0 {
            Self::OutOfStock
        } else {
            Self::Active
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Ativo",
            Self::Inactive => "Inativo",
            Self::OutOfStock => "Sem estoque",
        }
    }
}

/// Catalog item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Short human-typeable code (e.g. `P001`)
    pub short_code: String,
    /// `inlove_product:<id>:<short_code>`, stored in the `qr_code` column
    #[serde(rename = "qr_code")]
    pub encoded_identifier: String,
    #[serde(default)]
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub cost_price: Option<Decimal>,
    pub stock_quantity: u32,
    #[serde(default)]
    pub minimum_stock: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl CatalogItem {
    /// Create an item with a fresh v4 id and its encoded identifier
    pub fn new(short_code: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), short_code, name, price)
    }

    /// Create an item with a known id
    pub fn with_id(
        id: impl Into<String>,
        short_code: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
    ) -> Self {
        let id = id.into();
        let short_code = short_code.into();
        let encoded_identifier = EncodedIdentifier::format(&id, &short_code);
        let now = crate::util::now_rfc3339();
        Self {
            id,
            name: name.into(),
            short_code,
            encoded_identifier,
            category: String::new(),
            price,
            cost_price: None,
            stock_quantity: 0,
            minimum_stock: 0,
            description: None,
            status: ItemStatus::Active,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_minimum_stock(mut self, minimum: u32) -> Self {
        self.minimum_stock = minimum;
        self
    }

    /// Set stock and derive the status from it
    pub fn with_stock(mut self, quantity: u32) -> Self {
        self.stock_quantity = quantity;
        self.status = ItemStatus::for_stock(quantity);
        self
    }

    /// Stock at or below the minimum threshold
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.minimum_stock
    }

    /// Whether the stored encoded identifier matches `(id, short_code)`
    pub fn has_consistent_identifier(&self) -> bool {
        self.encoded_identifier == EncodedIdentifier::format(&self.id, &self.short_code)
    }

    /// Check the invariants the core relies on
    pub fn validate(&self) -> AppResult<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::required("id"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::required("name"));
        }
        if self.short_code.is_empty()
            || !self.short_code.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(AppError::new(ErrorCode::ShortCodeInvalid)
                .with_detail("short_code", self.short_code.clone()));
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(AppError::new(ErrorCode::ProductInvalidPrice)
                .with_detail("price", self.price.to_string()));
        }
        if !self.has_consistent_identifier() {
            return Err(AppError::new(ErrorCode::EncodedIdentifierMismatch)
                .with_detail("id", self.id.clone())
                .with_detail("qr_code", self.encoded_identifier.clone()));
        }
        Ok(())
    }
}

/// Read-only snapshot of the catalog
///
/// Cloning is cheap; the items behind it never change. A catalog reload
/// produces a new snapshot instead of mutating this one.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    items: Arc<[CatalogItem]>,
}

impl CatalogSnapshot {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Parse a JSON array of backend rows
    pub fn from_json(json: &str) -> AppResult<Self> {
        let items: Vec<CatalogItem> = serde_json::from_str(json)
            .map_err(|e| AppError::invalid_format(format!("Invalid catalog JSON: {}", e)))?;
        let invalid = items.iter().filter(|i| i.validate().is_err()).count();
        if invalid > 0 {
            tracing::warn!(invalid, total = items.len(), "Catalog contains invalid items");
        }
        Ok(Self::new(items))
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn find_by_id(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn find_by_short_code(&self, short_code: &str) -> Option<&CatalogItem> {
        self.items
            .iter()
            .find(|i| i.short_code.eq_ignore_ascii_case(short_code))
    }

    /// Items at or below their minimum stock
    pub fn low_stock(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(|i| i.is_low_stock())
    }
}

impl Deref for CatalogSnapshot {
    type Target = [CatalogItem];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl From<Vec<CatalogItem>> for CatalogSnapshot {
    fn from(items: Vec<CatalogItem>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rosa() -> CatalogItem {
        CatalogItem::with_id("abc-1", "P001", "Conjunto Rosa", Decimal::new(8990, 2)).with_stock(4)
    }

    #[test]
    fn test_with_id_builds_encoded_identifier() {
        let item = rosa();
        assert_eq!(item.encoded_identifier, "inlove_product:abc-1:P001");
        assert!(item.has_consistent_identifier());
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_new_generates_uuid() {
        let item = CatalogItem::new("P002", "Pijama Azul", Decimal::new(12000, 2));
        assert!(uuid::Uuid::parse_str(&item.id).is_ok());
        assert!(item.has_consistent_identifier());
    }

    #[test]
    fn test_status_for_stock() {
        assert_eq!(ItemStatus::for_stock(0), ItemStatus::OutOfStock);
        assert_eq!(ItemStatus::for_stock(3), ItemStatus::Active);
        assert_eq!(rosa().with_stock(0).status, ItemStatus::OutOfStock);
    }

    #[test]
    fn test_low_stock() {
        let item = rosa().with_minimum_stock(5);
        assert!(item.is_low_stock());
        assert!(!item.with_stock(6).is_low_stock());
    }

    #[test]
    fn test_validate_rejects() {
        let mut item = rosa();
        item.encoded_identifier = "inlove_product:abc-1:P999".to_string();
        assert_eq!(
            item.validate().unwrap_err().code,
            ErrorCode::EncodedIdentifierMismatch
        );

        let mut item = rosa();
        item.price = Decimal::new(-1, 0);
        assert_eq!(item.validate().unwrap_err().code, ErrorCode::ProductInvalidPrice);

        let item = CatalogItem::with_id("abc-1", "P-01", "x", Decimal::ONE);
        assert_eq!(item.validate().unwrap_err().code, ErrorCode::ShortCodeInvalid);

        let item = CatalogItem::with_id("abc-1", "P01", "  ", Decimal::ONE);
        assert_eq!(item.validate().unwrap_err().code, ErrorCode::RequiredField);
    }

    #[test]
    fn test_deserialize_backend_row() {
        let json = r#"[{
            "id": "abc-1",
            "name": "Conjunto Rosa",
            "short_code": "P001",
            "qr_code": "inlove_product:abc-1:P001",
            "category": "Lingerie",
            "price": 89.9,
            "stock_quantity": 4,
            "minimum_stock": 2,
            "status": "out_of_stock",
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        }]"#;
        let snapshot = CatalogSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.len(), 1);
        let item = &snapshot[0];
        assert_eq!(item.price, Decimal::new(899, 1));
        assert_eq!(item.status, ItemStatus::OutOfStock);
        assert_eq!(item.encoded_identifier, "inlove_product:abc-1:P001");
        assert!(item.cost_price.is_none());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = CatalogSnapshot::from_json("{not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = CatalogSnapshot::new(vec![
            rosa(),
            CatalogItem::with_id("abc-2", "P002", "Pijama", Decimal::ONE).with_minimum_stock(1),
        ]);
        assert_eq!(snapshot.find_by_id("abc-2").unwrap().short_code, "P002");
        assert_eq!(snapshot.find_by_short_code("p001").unwrap().id, "abc-1");
        assert!(snapshot.find_by_id("zzz").is_none());
        let low: Vec<_> = snapshot.low_stock().map(|i| i.id.as_str()).collect();
        assert_eq!(low, vec!["abc-2"]);
    }

    #[test]
    fn test_snapshot_clone_shares_items() {
        let a = CatalogSnapshot::new(vec![rosa()]);
        let b = a.clone();
        assert!(std::ptr::eq(a.items().as_ptr(), b.items().as_ptr()));
    }
}
