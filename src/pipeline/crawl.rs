// src/pipeline/crawl.rs

//! Crawl and publish pipeline.
//!
//! Branches are crawled one after another and never affect each other: a
//! branch whose listing cannot be fetched ends early, and a failing event is
//! counted and skipped.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::Templates;
use crate::error::Result;
use crate::models::{
    Branch, Config, CrawlOutcome, EventDetail, EventListing, EventRecord, SheetRow, rows_for_event,
};
use crate::parse::{DetailParser, PeriodParser};
use crate::services::{Fetcher, ListingSource};
use crate::site::identity::{event_id_from_image, published_filename, register};
use crate::site::slug::{filename, slugify};
use crate::site::PageRenderer;
use crate::storage::{LocalStorage, MappingStore, export_rows};
use crate::utils::http::polite_delay;
use crate::utils::log;

/// Crawls branches and publishes their event pages.
pub struct Crawler {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetcher>,
    listing: ListingSource,
    details: DetailParser,
    renderer: PageRenderer,
    updated: String,
}

impl Crawler {
    pub fn new(
        config: Arc<Config>,
        fetcher: Arc<dyn Fetcher>,
        storage: LocalStorage,
        templates: &Templates,
        today: NaiveDate,
    ) -> Result<Self> {
        let listing = ListingSource::new(
            Arc::clone(&fetcher),
            config.source.clone(),
            config.crawler.listing_mode,
        )?;
        let details = DetailParser::new(PeriodParser::new(config.period.reference_year))?;
        let renderer = PageRenderer::new(storage, &config, templates.detail.clone(), today)?;

        Ok(Self {
            config,
            fetcher,
            listing,
            details,
            renderer,
            updated: today.format("%Y-%m-%d").to_string(),
        })
    }

    /// Crawl every listing page of `branch`, publishing each event.
    ///
    /// Returns the branch summary and its spreadsheet rows.
    pub async fn crawl_branch(
        &self,
        branch: &Branch,
        store: &mut MappingStore,
    ) -> (CrawlOutcome, Vec<SheetRow>) {
        let mut outcome = CrawlOutcome {
            branch: branch.code.clone(),
            ..CrawlOutcome::default()
        };
        let mut rows = Vec::new();
        let delay = self.config.crawler.request_delay_ms;

        for page in 1..=self.config.crawler.max_pages {
            log::info(&format!("[{}] Crawling listing page {page}", branch.code));
            let listing_page = match self.listing.page(branch, page).await {
                Ok(listing_page) => listing_page,
                Err(e) => {
                    log::warn(&format!(
                        "[{}] Listing page {page} unavailable: {e}",
                        branch.code
                    ));
                    break;
                }
            };
            polite_delay(delay).await;

            if listing_page.fallback {
                outcome.listing_fallbacks += 1;
            }
            if listing_page.listings.is_empty() {
                log::info(&format!("[{}] No events on page {page}, stopping", branch.code));
                break;
            }

            for listing in listing_page.listings {
                outcome.listed += 1;
                self.publish(branch, listing, store, &mut outcome, &mut rows)
                    .await;
                polite_delay(delay).await;
            }
        }

        (outcome, rows)
    }

    async fn publish(
        &self,
        branch: &Branch,
        listing: EventListing,
        store: &mut MappingStore,
        outcome: &mut CrawlOutcome,
        rows: &mut Vec<SheetRow>,
    ) {
        let id = match event_id_from_image(&listing.image_url) {
            Ok(id) if !id.is_empty() => id,
            Ok(_) | Err(_) => {
                log::warn(&format!(
                    "[{}] Skipping {:?}: no event id in image url {:?}",
                    branch.code, listing.title, listing.image_url
                ));
                outcome.skipped += 1;
                return;
            }
        };

        let detail = self.detail(&listing.detail_url, outcome).await;
        let record = EventRecord {
            id,
            branch_name: branch.name.clone(),
            branch_code: self.config.branch_code(&branch.name).to_string(),
            listing,
            detail,
        };

        let target = self.target_filename(&record, store);
        match self.renderer.render(&record, &target).await {
            Ok(path) => {
                outcome.published += 1;
                let added = register(store, &record.id, &target);
                outcome.mappings_added += added;
                log::sub_item(&format!("{} -> /{path} ({added} new ids)", record.id));
                rows.extend(rows_for_event(&record, &self.updated));
            }
            Err(e) => {
                outcome.render_failures += 1;
                log::warn(&format!("Failed to publish {}: {e}", record.id));
            }
        }
    }

    /// Fetch and parse a detail page; failures yield an empty detail.
    async fn detail(&self, url: &str, outcome: &mut CrawlOutcome) -> EventDetail {
        if url.is_empty() {
            outcome.detail_failures += 1;
            return EventDetail::default();
        }
        match self.fetcher.fetch(url).await {
            Ok(html) => self.details.parse(&html),
            Err(e) => {
                outcome.detail_failures += 1;
                log::warn(&format!("Detail fetch failed for {url}: {e}"));
                EventDetail::default()
            }
        }
    }

    /// A branch page already mapped to the id or one of its variants wins;
    /// otherwise the filename is derived from the title.
    fn target_filename(&self, record: &EventRecord, store: &MappingStore) -> String {
        if let Some(existing) = published_filename(store, &record.id, &self.config.branches) {
            return existing;
        }

        let slug = slugify(&record.clean_title());
        let slug = if slug.is_empty() {
            record.id.to_lowercase()
        } else {
            slug
        };
        filename(&record.branch_code, &slug)
    }
}

/// Crawl all branches, persist the mapping and export sheet rows.
pub async fn run_crawler(
    config: &Config,
    templates: &Templates,
    storage: &LocalStorage,
    fetcher: Arc<dyn Fetcher>,
    today: NaiveDate,
) -> Result<(Vec<CrawlOutcome>, MappingStore)> {
    log::header("Outlet crawler starting");

    let config = Arc::new(config.clone());
    let mut store = MappingStore::load(storage.clone(), config.paths.mapping_file.clone()).await;
    log::info(&format!("Loaded {} existing mappings", store.loaded_count()));

    let crawler = Crawler::new(
        Arc::clone(&config),
        fetcher,
        storage.clone(),
        templates,
        today,
    )?;

    let mut outcomes = Vec::with_capacity(config.branches.len());
    for branch in &config.branches {
        log::info(&format!("Crawling {} ({})", branch.name, branch.code));
        let (outcome, rows) = crawler.crawl_branch(branch, &mut store).await;

        if let Err(e) = export_rows(storage, &config.paths.rows_dir, &branch.sheet, rows).await {
            log::warn(&format!("[{}] Row export failed: {e}", branch.code));
        }

        log::summary(
            &format!("{} ({})", branch.name, branch.code),
            &[
                ("Listed", outcome.listed.to_string()),
                ("Published", outcome.published.to_string()),
                ("Skipped (no id)", outcome.skipped.to_string()),
                ("Detail failures", outcome.detail_failures.to_string()),
                ("Render failures", outcome.render_failures.to_string()),
                ("Listing fallbacks", outcome.listing_fallbacks.to_string()),
                ("New mappings", outcome.mappings_added.to_string()),
            ],
        );
        outcomes.push(outcome);
    }

    store.persist().await?;
    log::success("Crawl complete");

    Ok((outcomes, store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct NoNetwork;

    #[async_trait]
    impl Fetcher for NoNetwork {
        async fn fetch(&self, url: &str) -> Result<String> {
            Err(AppError::fetch(url, "offline"))
        }
    }

    fn crawler(tmp: &TempDir) -> Crawler {
        let templates = Templates {
            detail: "<h1>{{제목}}</h1>".to_string(),
            index: String::new(),
        };
        Crawler::new(
            Arc::new(Config::default()),
            Arc::new(NoNetwork),
            LocalStorage::new(tmp.path()),
            &templates,
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        )
        .unwrap()
    }

    fn record(title: &str) -> EventRecord {
        EventRecord {
            id: "0053227c91f9".to_string(),
            branch_name: "송도".to_string(),
            branch_code: "songdo".to_string(),
            listing: EventListing {
                title: title.to_string(),
                ..EventListing::default()
            },
            detail: EventDetail::default(),
        }
    }

    #[tokio::test]
    async fn test_existing_mapping_wins() {
        let tmp = TempDir::new().unwrap();
        let crawler = crawler(&tmp);
        let mut store = MappingStore::load(LocalStorage::new(tmp.path()), "m.json").await;

        assert_eq!(
            crawler.target_filename(&record("골든듀 창립 행사"), &store),
            "songdo-골든듀-창립-행사.html"
        );

        store.insert_if_absent("0053227c91f9", "songdo-old-title.html");
        assert_eq!(
            crawler.target_filename(&record("바뀐 제목"), &store),
            "songdo-old-title.html"
        );
    }

    #[tokio::test]
    async fn test_legacy_mapping_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let crawler = crawler(&tmp);
        let mut store = MappingStore::load(LocalStorage::new(tmp.path()), "m.json").await;
        store.insert_if_absent("0053227c91f9", "event-0053227c91f9.html");

        assert_eq!(
            crawler.target_filename(&record("새 행사"), &store),
            "songdo-새-행사.html"
        );
    }

    #[tokio::test]
    async fn test_legacy_id_keeps_first_branch_page_across_title_changes() {
        let tmp = TempDir::new().unwrap();
        let crawler = crawler(&tmp);
        let mut store = MappingStore::load(LocalStorage::new(tmp.path()), "m.json").await;
        store.insert_if_absent("0053227c91f9", "event-0053227c91f9.html");

        let first = crawler.target_filename(&record("첫 제목"), &store);
        assert_eq!(first, "songdo-첫-제목.html");
        register(&mut store, "0053227c91f9", &first);

        let second = crawler.target_filename(&record("바뀐 제목"), &store);
        assert_eq!(second, first);
        assert_eq!(
            store.filename_for("0053227c91f9"),
            Some("event-0053227c91f9.html")
        );
    }

    #[tokio::test]
    async fn test_empty_slug_falls_back_to_id() {
        let tmp = TempDir::new().unwrap();
        let crawler = crawler(&tmp);
        let store = MappingStore::load(LocalStorage::new(tmp.path()), "m.json").await;

        assert_eq!(
            crawler.target_filename(&record("★★★"), &store),
            "songdo-0053227c91f9.html"
        );
    }

    #[tokio::test]
    async fn test_offline_branch_yields_empty_outcome() {
        let tmp = TempDir::new().unwrap();
        let crawler = crawler(&tmp);
        let mut store = MappingStore::load(LocalStorage::new(tmp.path()), "m.json").await;
        let branch = Config::default().branches[0].clone();

        let (outcome, rows) = crawler.crawl_branch(&branch, &mut store).await;
        assert_eq!(outcome.branch, "songdo");
        assert_eq!(outcome.listed, 0);
        assert!(rows.is_empty());
        assert!(store.is_empty());
    }
}
