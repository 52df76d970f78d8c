// src/parse/products.rs

//! Product block normalization.
//!
//! Detail pages put brand, product name and category labels into whichever
//! element is at hand. The rules below are applied in a fixed order; moving a
//! step changes the output.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::Product;

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\]]+\]$").expect("valid regex"));
static LEADING_BRAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*(.+)$").expect("valid regex"));
static SKU_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]+$").expect("valid regex"));

/// Category labels that sit in the brand slot.
const CATEGORY_LABELS: [&str; 3] = ["MEN", "WOMEN", "MEN/WOMEN"];

const LIST_PRICE_MARKER: &str = "정상가";
const SALE_PRICE_MARKER: &str = "판매가";

/// Product fragments as extracted from one product block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProduct {
    pub brand: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
}

/// Why a product block was dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    #[error("gift-with-purchase item (brand {0:?})")]
    GiftWithPurchase(String),

    #[error("conditional purchase wording (name {0:?})")]
    ConditionalPurchase(String),

    #[error("notice text rather than a product (name {0:?})")]
    NoticeText(String),

    #[error("bare SKU code (name {0:?})")]
    SkuCode(String),
}

/// Applies the ordered cleanup rules to raw product fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductNormalizer;

impl ProductNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one product block, or explain why it is not a product.
    pub fn normalize(&self, raw: RawProduct) -> Result<Product, Exclusion> {
        let mut brand = collapse_whitespace(&raw.brand);
        let mut name = collapse_whitespace(&raw.name);

        brand = brand
            .split_whitespace()
            .filter(|word| !word.starts_with('#'))
            .collect::<Vec<_>>()
            .join(" ");

        if CATEGORY_LABELS.contains(&brand.to_uppercase().as_str()) {
            brand.clear();
        }

        if name.is_empty() && !brand.is_empty() {
            name = std::mem::take(&mut brand);
        }

        if BRACKETED.is_match(&brand) {
            brand = brand[1..brand.len() - 1].trim().to_string();
        }

        if brand.is_empty() {
            if let Some(caps) = LEADING_BRAND.captures(&name) {
                let (b, rest) = (caps[1].trim().to_string(), caps[2].trim().to_string());
                brand = b;
                name = rest;
            }
        }

        if !brand.is_empty() && name.contains('/') {
            name = format!("{brand} {name}");
            brand.clear();
        }

        if brand.contains("증정") {
            return Err(Exclusion::GiftWithPurchase(brand));
        }
        if name.contains("구매시") {
            return Err(Exclusion::ConditionalPurchase(name));
        }
        if name.starts_with('「') {
            return Err(Exclusion::NoticeText(name));
        }
        if SKU_CODE.is_match(&name) {
            return Err(Exclusion::SkuCode(name));
        }

        Ok(Product {
            brand,
            name: collapse_whitespace(&name),
            price: format_price(&raw.price),
            image_url: raw.image_url,
        })
    }

    /// Normalize a batch, dropping excluded blocks.
    pub fn normalize_all(&self, raws: impl IntoIterator<Item = RawProduct>) -> Vec<Product> {
        raws.into_iter()
            .filter_map(|raw| match self.normalize(raw) {
                Ok(product) => Some(product),
                Err(reason) => {
                    log::debug!("Skipping product block: {reason}");
                    None
                }
            })
            .collect()
    }
}

/// Render list/sale price text with the list price struck through.
///
/// Text without both markers is returned unchanged.
pub fn format_price(text: &str) -> String {
    if !(text.contains(LIST_PRICE_MARKER) && text.contains(SALE_PRICE_MARKER)) {
        return text.to_string();
    }
    match text.split_once(SALE_PRICE_MARKER) {
        Some((original, sale)) => format!(
            "<s>{}</s> {} {}",
            original.trim(),
            SALE_PRICE_MARKER,
            sale.trim()
        ),
        None => text.to_string(),
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
