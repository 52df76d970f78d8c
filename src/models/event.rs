//! Event data structures.

use serde::{Deserialize, Serialize};

/// One entry of a branch's event listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventListing {
    /// Listing title
    pub title: String,

    /// Free-text period as shown in the listing
    pub period_text: String,

    /// Thumbnail URL (source of the event id)
    pub image_url: String,

    /// Absolute URL of the detail page
    pub detail_url: String,
}

/// A product shown on a detail page, after normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub brand: String,
    pub name: String,
    /// Raw price text, or an HTML fragment with the struck-through list price
    pub price: String,
    pub image_url: String,
}

/// Everything extracted from one detail page.
///
/// `start_date`/`end_date` are `YYYY-MM-DD` or empty, never absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventDetail {
    pub title: String,
    pub period_text: String,
    pub start_date: String,
    pub end_date: String,
    /// `"{label}: {value}"` lines from the text-only benefit table
    pub description_lines: Vec<String>,
    pub products: Vec<Product>,
}

impl EventDetail {
    /// Benefit description as published (`" / "` separated).
    pub fn description(&self) -> String {
        self.description_lines.join(" / ")
    }
}

/// Listing + detail + identity: the unit handed to the page renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Stable id derived from the thumbnail filename
    pub id: String,

    /// Native branch name
    pub branch_name: String,

    /// URL-safe branch code
    pub branch_code: String,

    pub listing: EventListing,

    pub detail: EventDetail,
}

impl EventRecord {
    /// Title with line breaks flattened.
    pub fn clean_title(&self) -> String {
        self.listing
            .title
            .replace(['\r', '\n'], " ")
            .trim()
            .to_string()
    }

    /// Benefit description with carriage returns flattened.
    pub fn clean_description(&self) -> String {
        self.detail.description().replace('\r', " ").trim().to_string()
    }
}
