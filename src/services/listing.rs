// src/services/listing.rs

//! Listing page retrieval.
//!
//! The structured listing API is tried first. It is keyed on a display code
//! embedded in the branch listing page. When the API path fails, the cards
//! rendered into the listing page itself are used; that markup only ever
//! holds the first page.

use std::sync::Arc;

use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Branch, EventListing, ListingMode, SourceConfig};
use crate::parse::{ListingSelectors, mobile_dm_code, parse_api_listing, parse_html_listing};
use crate::services::Fetcher;

const API_ID: &str = "ifAppHdcms012";
const EVENT_TYPE_CD: &str = "01";

/// One page of listing results.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub listings: Vec<EventListing>,
    /// Served by the listing markup instead of the API
    pub fallback: bool,
}

/// Fetches listing pages for a branch.
pub struct ListingSource {
    fetcher: Arc<dyn Fetcher>,
    source: SourceConfig,
    mode: ListingMode,
    selectors: ListingSelectors,
}

impl ListingSource {
    pub fn new(fetcher: Arc<dyn Fetcher>, source: SourceConfig, mode: ListingMode) -> Result<Self> {
        Ok(Self {
            fetcher,
            source,
            mode,
            selectors: ListingSelectors::new()?,
        })
    }

    /// Listing API URL for a display code and page.
    pub fn api_url(&self, dm_code: &str, page: u32) -> Result<String> {
        let base = format!("{}{}", self.source.base_url, self.source.api_path);
        let param = format!(
            "mblDmCd={dm_code}&evntCrdTypeCd={EVENT_TYPE_CD}&pageSize={}&page={page}",
            self.source.page_size
        );
        let url = Url::parse_with_params(&base, [("apiID", API_ID), ("param", param.as_str())])?;
        Ok(url.to_string())
    }

    /// Fetch one listing page, falling back to the listing markup on failure.
    pub async fn page(&self, branch: &Branch, page: u32) -> Result<ListingPage> {
        if self.mode == ListingMode::Api {
            match self.api_page(branch, page).await {
                Ok(listings) => {
                    return Ok(ListingPage {
                        listings,
                        fallback: false,
                    });
                }
                Err(e) => {
                    log::warn!(
                        "[{}] listing API failed on page {page}: {e}; falling back to listing markup",
                        branch.code
                    );
                }
            }
        }

        let listings = self.html_page(branch, page).await?;
        Ok(ListingPage {
            listings,
            fallback: self.mode == ListingMode::Api,
        })
    }

    async fn api_page(&self, branch: &Branch, page: u32) -> Result<Vec<EventListing>> {
        let list_url = self.source.listing_url(&branch.branch_cd);
        let html = self.fetcher.fetch(&list_url).await?;
        let dm_code = mobile_dm_code(&html).map_err(|e| AppError::fetch(&list_url, e))?;

        let api_url = self.api_url(&dm_code, page)?;
        let body = self.fetcher.fetch(&api_url).await?;
        parse_api_listing(&body, &self.source, &branch.branch_cd, page)
    }

    async fn html_page(&self, branch: &Branch, page: u32) -> Result<Vec<EventListing>> {
        if page > 1 {
            log::debug!(
                "[{}] listing markup only carries page 1; nothing for page {page}",
                branch.code
            );
            return Ok(Vec::new());
        }
        let list_url = self.source.listing_url(&branch.branch_cd);
        let html = self.fetcher.fetch(&list_url).await?;
        Ok(parse_html_listing(&html, &self.selectors, &self.source))
    }
}
