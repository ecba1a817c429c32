use serde::Serialize;
use shared::models::CatalogSnapshot;
use shared::money::format_brl;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct LowStockRow {
    pub short_code: String,
    pub name: String,
    pub stock_quantity: u32,
    pub minimum_stock: u32,
    pub price: String,
}

#[derive(Debug, Serialize)]
pub struct StockReport {
    pub total_items: usize,
    pub low_stock: Vec<LowStockRow>,
}

/// Items at or below their minimum stock, lowest stock first
pub fn run(snapshot: &CatalogSnapshot) -> StockReport {
    let mut low_stock: Vec<LowStockRow> = snapshot
        .low_stock()
        .map(|item| LowStockRow {
            short_code: item.short_code.clone(),
            name: item.name.clone(),
            stock_quantity: item.stock_quantity,
            minimum_stock: item.minimum_stock,
            price: format_brl(item.price),
        })
        .collect();
    low_stock.sort_by_key(|row| row.stock_quantity);

    StockReport {
        total_items: snapshot.len(),
        low_stock,
    }
}

impl fmt::Display for StockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low_stock.is_empty() {
            return write!(f, "Estoque em dia ({} produtos)", self.total_items);
        }
        write!(
            f,
            "{} de {} produtos com estoque baixo",
            self.low_stock.len(),
            self.total_items
        )?;
        for row in &self.low_stock {
            write!(
                f,
                "\n{:<8} {:<30} {:>4}/{:<4} {}",
                row.short_code, row.name, row.stock_quantity, row.minimum_stock, row.price
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::catalog;

    #[test]
    fn test_low_stock_sorted() {
        let report = run(&catalog());
        assert_eq!(report.total_items, 3);
        let codes: Vec<&str> = report.low_stock.iter().map(|r| r.short_code.as_str()).collect();
        // P003 has no stock and no minimum, P001 sits below its minimum
        assert_eq!(codes, ["P003", "P001"]);
        assert!(report.to_string().starts_with("2 de 3 produtos com estoque baixo"));
    }

    #[test]
    fn test_everything_in_stock() {
        let report = run(&CatalogSnapshot::default());
        assert!(report.low_stock.is_empty());
        assert_eq!(report.to_string(), "Estoque em dia (0 produtos)");
    }
}
