// src/pipeline/pipeline.rs

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::Templates;
use crate::error::Result;
use crate::models::{Config, CrawlOutcome};
use crate::services::Fetcher;
use crate::storage::LocalStorage;
use crate::utils::log;

use super::build::{BuildSummary, run_build};
use super::crawl::run_crawler;

/// Everything one full run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub outcomes: Vec<CrawlOutcome>,
    pub build: BuildSummary,
}

/// Run the full pipeline: crawl every branch, then rebuild the artifacts.
pub async fn run_pipeline(
    config: &Config,
    templates: &Templates,
    storage: &LocalStorage,
    fetcher: Arc<dyn Fetcher>,
    today: NaiveDate,
) -> Result<PipelineReport> {
    log::header("Pipeline starting");

    log::step(1, 2, "Crawl - Publishing event pages");
    let (outcomes, mapping) = run_crawler(config, templates, storage, fetcher, today).await?;

    log::step(2, 2, "Build - Regenerating site artifacts");
    let build = run_build(storage, config, &templates.index, &mapping, today).await?;

    log::success("Pipeline complete");
    Ok(PipelineReport { outcomes, build })
}
