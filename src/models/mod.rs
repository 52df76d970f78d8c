// src/models/mod.rs

//! Domain models for the publisher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod branch;
mod config;
mod event;
mod sheet;

// Re-export all public types
pub use branch::{Branch, branch_for_filename};
pub use config::{
    Config, CrawlerConfig, ListingMode, PathsConfig, PeriodConfig, SiteConfig, SourceConfig,
};
pub use event::{EventDetail, EventListing, EventRecord, Product};
pub use sheet::{LINK_COLUMN, SHEET_HEADERS, SheetRow, rows_for_event};

/// Per-branch summary of a crawl run.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// Branch code
    pub branch: String,
    /// Listing entries seen
    pub listed: usize,
    /// Pages written
    pub published: usize,
    /// Entries skipped because no id could be derived
    pub skipped: usize,
    /// Detail pages that could not be fetched
    pub detail_failures: usize,
    /// Events whose page could not be written
    pub render_failures: usize,
    /// Listing pages served by the HTML fallback
    pub listing_fallbacks: usize,
    /// Id variants newly registered in the mapping store
    pub mappings_added: usize,
}
