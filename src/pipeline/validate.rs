// src/pipeline/validate.rs

use std::path::Path;

use crate::config::load_all;
use crate::error::Result;
use crate::utils::log;

/// Validate the configuration and templates using load_all.
pub fn run_validate(base_path: &Path, config_path: &Path) -> Result<()> {
    log::header("Validating configuration");

    match load_all(base_path, config_path) {
        Ok((config, templates)) => {
            log::success("Configuration OK");
            log::sub_item(&format!("Site: {}", config.site_base()));
            log::sub_item(&format!("Public dir: {}", config.paths.public_dir));
            log::sub_item(&format!("User agent: {}", config.crawler.user_agent));
            log::sub_item(&format!("Timeout: {}s", config.crawler.timeout_secs));
            log::sub_item(&format!("Max pages: {}", config.crawler.max_pages));
            log::sub_item(&format!("Listing mode: {:?}", config.crawler.listing_mode));

            log::success("Branches");
            for branch in &config.branches {
                log::sub_item(&format!(
                    "{} ({}) -> {}",
                    branch.name, branch.code, branch.sheet
                ));
            }

            log::success("Templates OK");
            log::sub_item(&format!(
                "{}: {} bytes",
                config.paths.detail_template,
                templates.detail.len()
            ));
            log::sub_item(&format!(
                "{}: {} bytes",
                config.paths.index_template,
                templates.index.len()
            ));
            Ok(())
        }
        Err(e) => {
            log::error(&format!("Validation failed: {e}"));
            Err(e)
        }
    }
}
