//! Pipeline entry points.
//!
//! - `run_pipeline`: crawl then build
//! - `run_crawler`: fetch listings and publish event pages
//! - `run_build`: regenerate hub, sitemap, index and redirects
//! - `recent_urls`, `run_check`, `run_validate`: maintenance commands

pub mod build;
pub mod check;
pub mod crawl;
pub mod pipeline;
pub mod recent;
pub mod validate;

pub use build::{BuildSummary, run_build};
pub use check::{CheckReport, run_check};
pub use crawl::{Crawler, run_crawler};
pub use pipeline::{PipelineReport, run_pipeline};
pub use recent::recent_urls;
pub use validate::run_validate;
