// src/pipeline/build.rs

//! Site artifact generation.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::Config;
use crate::site::{hub, index, pages, redirects, sitemap};
use crate::storage::{LocalStorage, MappingStore};
use crate::utils::log;

/// Counts from one artifact build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub hub_files: usize,
    pub sitemap_urls: usize,
    pub index_links: usize,
    pub redirect_rules: usize,
}

/// Regenerate every derived artifact from the pages directory and mapping.
///
/// The hub is written before the sitemap so the sitemap lists it.
pub async fn run_build(
    storage: &LocalStorage,
    config: &Config,
    index_template: &str,
    mapping: &MappingStore,
    today: NaiveDate,
) -> Result<BuildSummary> {
    let total = 4;
    let published = pages::scan_pages(storage, &config.paths.pages_dir, &config.branches).await?;

    log::step(1, total, "Events hub");
    let hub_files = hub::write_hub(storage, config, &published).await?;

    log::step(2, total, "Sitemap");
    let sitemap_urls = sitemap::write_sitemap(storage, config, today, &published).await?;

    log::step(3, total, "Index");
    let index_links = index::write_index(storage, config, index_template).await?;

    log::step(4, total, "Redirects");
    let redirect_rules = redirects::write_redirects(storage, config, mapping).await?;

    let summary = BuildSummary {
        pages: published.len(),
        hub_files,
        sitemap_urls,
        index_links,
        redirect_rules,
    };
    log::summary(
        "Artifacts",
        &[
            ("Pages", summary.pages.to_string()),
            ("Hub files", summary.hub_files.to_string()),
            ("Sitemap URLs", summary.sitemap_urls.to_string()),
            ("Index links", summary.index_links.to_string()),
            ("Redirect rules", summary.redirect_rules.to_string()),
        ],
    );
    Ok(summary)
}
