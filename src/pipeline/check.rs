// src/pipeline/check.rs

//! Post-build sanity check of the public directory.

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::site::sitemap;
use crate::storage::{LocalStorage, MappingStore};
use crate::utils::log;

/// What the check found.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub sitemap_urls: usize,
    pub mapping_entries: usize,
    pub page_files: usize,
    pub problems: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Verify the sitemap, mapping and page count.
///
/// Problems are collected rather than returned early; a missing sitemap is the
/// only hard error.
pub async fn run_check(
    storage: &LocalStorage,
    config: &Config,
    min_pages: usize,
) -> Result<CheckReport> {
    log::header("Site check");
    let mut report = CheckReport::default();
    let base = config.site_base();

    let xml = storage
        .read_text(&config.paths.sitemap_file)
        .await?
        .ok_or_else(|| {
            AppError::validation(format!("{} not found", config.paths.sitemap_file))
        })?;
    let locs = sitemap::locations(&xml)?;
    report.sitemap_urls = locs.len();

    let root = format!("{base}/");
    if !locs.iter().any(|l| *l == root) {
        report.problems.push(format!("sitemap is missing {root}"));
    }
    if !locs.iter().any(|l| l.ends_with("/privacy.html")) {
        report.problems.push("sitemap is missing privacy.html".to_string());
    }

    let mapping = MappingStore::load(storage.clone(), config.paths.mapping_file.clone()).await;
    report.mapping_entries = mapping.len();
    if mapping.is_empty() {
        report
            .problems
            .push(format!("{} is empty", config.paths.mapping_file));
    }

    report.page_files = storage
        .list_dir(&config.paths.pages_dir)
        .await?
        .iter()
        .filter(|e| e.name.ends_with(".html"))
        .count();
    if report.page_files < min_pages {
        report.problems.push(format!(
            "only {} pages, expected at least {min_pages}",
            report.page_files
        ));
    }

    log::sub_item(&format!("Sitemap URLs: {}", report.sitemap_urls));
    log::sub_item(&format!("Mapping entries: {}", report.mapping_entries));
    log::sub_item(&format!("Page files: {}", report.page_files));
    if report.is_ok() {
        log::success("Site check passed");
    } else {
        for problem in &report.problems {
            log::error(problem);
        }
    }
    Ok(report)
}
