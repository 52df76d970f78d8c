//! Spreadsheet row export model.
//!
//! Rows are handed to the spreadsheet upload step, which deduplicates on the
//! detail link column.

use serde::{Deserialize, Serialize};

use crate::models::EventRecord;

/// Column headers, in upload order.
pub const SHEET_HEADERS: [&str; 13] = [
    "제목",
    "기간",
    "상세 제목",
    "상세 기간",
    "썸네일",
    "상세 링크",
    "혜택 설명",
    "브랜드",
    "제품명",
    "가격",
    "이미지",
    "업데이트 날짜",
    "event_id",
];

/// Index of the dedup key column (`상세 링크`).
pub const LINK_COLUMN: usize = 5;

/// One exported row: event columns followed by one product's columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SheetRow(pub Vec<String>);

impl SheetRow {
    /// Dedup key of this row.
    pub fn link(&self) -> &str {
        self.0.get(LINK_COLUMN).map(String::as_str).unwrap_or("")
    }
}

/// Build the rows for one event: one per product, or a single row with empty
/// product columns.
pub fn rows_for_event(record: &EventRecord, updated: &str) -> Vec<SheetRow> {
    let base = [
        record.listing.title.clone(),
        record.listing.period_text.clone(),
        record.detail.title.clone(),
        record.detail.period_text.clone(),
        record.listing.image_url.clone(),
        record.listing.detail_url.clone(),
        record.detail.description(),
    ];

    let row = |product: [String; 4]| {
        let mut cells = base.to_vec();
        cells.extend(product);
        cells.push(updated.to_string());
        cells.push(record.id.clone());
        SheetRow(cells)
    };

    if record.detail.products.is_empty() {
        return vec![row(Default::default())];
    }

    record
        .detail
        .products
        .iter()
        .map(|p| {
            row([
                p.brand.clone(),
                p.name.clone(),
                p.price.clone(),
                p.image_url.clone(),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventDetail, EventListing, Product};

    fn record(products: Vec<Product>) -> EventRecord {
        EventRecord {
            id: "abc123456789".to_string(),
            branch_name: "김포".to_string(),
            branch_code: "gimpo".to_string(),
            listing: EventListing {
                title: "버버리 스페셜 프로모션".to_string(),
                period_text: "9.1 ~ 9.7".to_string(),
                image_url: "https://img/abc123456789.jpg".to_string(),
                detail_url: "https://example.com/d?evntCrdCd=1".to_string(),
            },
            detail: EventDetail {
                products,
                ..EventDetail::default()
            },
        }
    }

    #[test]
    fn test_event_without_products_yields_one_row() {
        let rows = rows_for_event(&record(Vec::new()), "2025-09-01");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.len(), SHEET_HEADERS.len());
        assert_eq!(rows[0].link(), "https://example.com/d?evntCrdCd=1");
        assert_eq!(rows[0].0[7], "");
        assert_eq!(rows[0].0[12], "abc123456789");
    }

    #[test]
    fn test_one_row_per_product() {
        let products = vec![
            Product {
                brand: "BURBERRY".to_string(),
                name: "트렌치코트".to_string(),
                price: "990,000원".to_string(),
                image_url: "https://img/p1.jpg".to_string(),
            },
            Product {
                brand: String::new(),
                name: "머플러".to_string(),
                price: String::new(),
                image_url: String::new(),
            },
        ];
        let rows = rows_for_event(&record(products), "2025-09-01");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0[7], "BURBERRY");
        assert_eq!(rows[1].0[8], "머플러");
        assert_eq!(rows[1].0[11], "2025-09-01");
    }
}
