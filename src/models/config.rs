//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Branch;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Published site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Output and template locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Source site endpoints
    #[serde(default)]
    pub source: SourceConfig,

    /// Period text parsing
    #[serde(default)]
    pub period: PeriodConfig,

    /// Outlet branches to crawl
    #[serde(default = "defaults::branches")]
    pub branches: Vec<Branch>,

    /// Code used for branch names missing from `branches`
    #[serde(default = "defaults::fallback_branch")]
    pub fallback_branch: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_pages == 0 {
            return Err(AppError::validation("crawler.max_pages must be > 0"));
        }
        if url::Url::parse(&self.site.base_url).is_err() {
            return Err(AppError::validation(format!(
                "site.base_url is not a URL: {}",
                self.site.base_url
            )));
        }
        if self.branches.is_empty() {
            return Err(AppError::validation("No branches defined"));
        }
        for branch in &self.branches {
            if branch.code.is_empty() || branch.code.contains(['-', '/']) {
                return Err(AppError::validation(format!(
                    "branch code {:?} must be non-empty and contain no '-' or '/'",
                    branch.code
                )));
            }
        }
        if !self.branches.iter().any(|b| b.code == self.fallback_branch) {
            return Err(AppError::validation(format!(
                "fallback_branch {:?} is not a configured branch code",
                self.fallback_branch
            )));
        }
        Ok(())
    }

    /// Branch code for a native branch name, falling back to `fallback_branch`.
    pub fn branch_code(&self, name: &str) -> &str {
        match self.branches.iter().find(|b| b.name == name) {
            Some(branch) => &branch.code,
            None => {
                log::warn!(
                    "Unknown branch name {:?}, using fallback code {}",
                    name,
                    self.fallback_branch
                );
                &self.fallback_branch
            }
        }
    }

    /// Site root without a trailing slash.
    pub fn site_base(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            paths: PathsConfig::default(),
            crawler: CrawlerConfig::default(),
            source: SourceConfig::default(),
            period: PeriodConfig::default(),
            branches: defaults::branches(),
            fallback_branch: defaults::fallback_branch(),
        }
    }
}

/// Published site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public origin of the generated site
    #[serde(default = "defaults::site_base_url")]
    pub base_url: String,

    /// Static pages listed in the sitemap right after the root
    #[serde(default = "defaults::static_pages")]
    pub static_pages: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::site_base_url(),
            static_pages: defaults::static_pages(),
        }
    }
}

/// Output locations. Everything except the templates is relative to `public_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "defaults::public_dir")]
    pub public_dir: String,

    #[serde(default = "defaults::pages_dir")]
    pub pages_dir: String,

    #[serde(default = "defaults::events_dir")]
    pub events_dir: String,

    #[serde(default = "defaults::mapping_file")]
    pub mapping_file: String,

    #[serde(default = "defaults::sitemap_file")]
    pub sitemap_file: String,

    #[serde(default = "defaults::index_file")]
    pub index_file: String,

    #[serde(default = "defaults::pages_redirects_file")]
    pub pages_redirects_file: String,

    #[serde(default = "defaults::htaccess_file")]
    pub htaccess_file: String,

    #[serde(default = "defaults::worker_file")]
    pub worker_file: String,

    /// Directory for spreadsheet row exports
    #[serde(default = "defaults::rows_dir")]
    pub rows_dir: String,

    /// Detail page template (relative to the working directory)
    #[serde(default = "defaults::detail_template")]
    pub detail_template: String,

    /// Index page template (relative to the working directory)
    #[serde(default = "defaults::index_template")]
    pub index_template: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            public_dir: defaults::public_dir(),
            pages_dir: defaults::pages_dir(),
            events_dir: defaults::events_dir(),
            mapping_file: defaults::mapping_file(),
            sitemap_file: defaults::sitemap_file(),
            index_file: defaults::index_file(),
            pages_redirects_file: defaults::pages_redirects_file(),
            htaccess_file: defaults::htaccess_file(),
            worker_file: defaults::worker_file(),
            rows_dir: defaults::rows_dir(),
            detail_template: defaults::detail_template(),
            index_template: defaults::index_template(),
        }
    }
}

/// How the event listing is retrieved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingMode {
    /// Structured JSON API, falling back to the HTML listing on failure
    #[default]
    Api,
    /// Listing page markup only
    Html,
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Listing pages fetched per branch
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,

    /// Listing retrieval mode
    #[serde(default)]
    pub listing_mode: ListingMode,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_pages: defaults::max_pages(),
            listing_mode: ListingMode::default(),
        }
    }
}

/// Source site endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Origin used to absolutize listing links
    #[serde(default = "defaults::source_base_url")]
    pub base_url: String,

    /// Listing page path (branch code appended as a query parameter)
    #[serde(default = "defaults::listing_path")]
    pub listing_path: String,

    /// Structured listing API path
    #[serde(default = "defaults::api_path")]
    pub api_path: String,

    /// Detail page path
    #[serde(default = "defaults::detail_path")]
    pub detail_path: String,

    /// Host prepended to API image paths
    #[serde(default = "defaults::image_host")]
    pub image_host: String,

    /// Host prefix stripped from API image paths
    #[serde(default = "defaults::api_image_host")]
    pub api_image_host: String,

    /// Items requested per API page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,
}

impl SourceConfig {
    pub fn listing_url(&self, branch_cd: &str) -> String {
        format!(
            "{}{}?branchCd={}&SN=1",
            self.base_url, self.listing_path, branch_cd
        )
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::source_base_url(),
            listing_path: defaults::listing_path(),
            api_path: defaults::api_path(),
            detail_path: defaults::detail_path(),
            image_host: defaults::image_host(),
            api_image_host: defaults::api_image_host(),
            page_size: defaults::page_size(),
        }
    }
}

/// Period text parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodConfig {
    /// Year assigned to every parsed `M.D` date
    #[serde(default = "defaults::reference_year")]
    pub reference_year: i32,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            reference_year: defaults::reference_year(),
        }
    }
}

mod defaults {
    use crate::models::Branch;

    // Site defaults
    pub fn site_base_url() -> String {
        "https://discounts.deluxo.co.kr".into()
    }
    pub fn static_pages() -> Vec<String> {
        vec!["privacy.html".into()]
    }

    // Path defaults
    pub fn public_dir() -> String {
        "public".into()
    }
    pub fn pages_dir() -> String {
        "pages".into()
    }
    pub fn events_dir() -> String {
        "events".into()
    }
    pub fn mapping_file() -> String {
        "url-mapping.json".into()
    }
    pub fn sitemap_file() -> String {
        "sitemap.xml".into()
    }
    pub fn index_file() -> String {
        "index.html".into()
    }
    pub fn pages_redirects_file() -> String {
        "_redirects".into()
    }
    pub fn htaccess_file() -> String {
        "generated_redirects.htaccess".into()
    }
    pub fn worker_file() -> String {
        "cloudflare_worker_complete.js".into()
    }
    pub fn rows_dir() -> String {
        "rows".into()
    }
    pub fn detail_template() -> String {
        "templates/template.html".into()
    }
    pub fn index_template() -> String {
        "templates/index.tpl.html".into()
    }

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; outlet-pages/0.1)".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn request_delay() -> u64 {
        0
    }
    pub fn max_pages() -> u32 {
        4
    }

    // Source defaults
    pub fn source_base_url() -> String {
        "https://www.ehyundai.com".into()
    }
    pub fn listing_path() -> String {
        "/newPortal/SN/SN_0101000.do".into()
    }
    pub fn api_path() -> String {
        "/newPortal/SN/GetCmsContentsAJX.do".into()
    }
    pub fn detail_path() -> String {
        "/newPortal/SN/SN_0201000.do".into()
    }
    pub fn image_host() -> String {
        "https://imgprism.ehyundai.com/".into()
    }
    pub fn api_image_host() -> String {
        "https://apiprism.ehyundai.com/".into()
    }
    pub fn page_size() -> u32 {
        9
    }

    // Period defaults
    pub fn reference_year() -> i32 {
        2025
    }

    // Branch defaults
    pub fn branches() -> Vec<Branch> {
        vec![
            Branch {
                name: "송도".to_string(),
                code: "songdo".to_string(),
                branch_cd: "B00174000".to_string(),
                sheet: "Sheet1".to_string(),
            },
            Branch {
                name: "김포".to_string(),
                code: "gimpo".to_string(),
                branch_cd: "B00172000".to_string(),
                sheet: "Sheet2".to_string(),
            },
            Branch {
                name: "스페이스원".to_string(),
                code: "spaceone".to_string(),
                branch_cd: "B00178000".to_string(),
                sheet: "Sheet3".to_string(),
            },
        ]
    }
    pub fn fallback_branch() -> String {
        "songdo".into()
    }
}
