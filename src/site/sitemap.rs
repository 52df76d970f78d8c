// src/site/sitemap.rs

//! `sitemap.xml` generation (sitemaps.org protocol 0.9).

use chrono::NaiveDate;
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Config;
use crate::site::pages::PublishedPage;
use crate::storage::{FileEntry, LocalStorage};

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const CHANGEFREQ: &str = "daily";
const ROOT_PRIORITY: &str = "1.0";
const PAGE_PRIORITY: &str = "0.8";

/// XML document root.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename = "urlset")]
pub struct UrlSet {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,

    #[serde(rename = "url", default)]
    pub urls: Vec<SitemapEntry>,
}

/// One `<url>` element.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: String,
    pub priority: String,
}

impl SitemapEntry {
    fn new(loc: String, lastmod: String, priority: &str) -> Self {
        Self {
            loc,
            lastmod,
            changefreq: CHANGEFREQ.to_string(),
            priority: priority.to_string(),
        }
    }
}

fn ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Collect sitemap entries: root, static pages, event pages, events hub.
pub fn build_entries(
    config: &Config,
    today: NaiveDate,
    pages: &[PublishedPage],
    hub_files: &[FileEntry],
) -> Vec<SitemapEntry> {
    let base = config.site_base();
    let mut entries = vec![SitemapEntry::new(
        format!("{base}/"),
        ymd(today),
        ROOT_PRIORITY,
    )];

    entries.extend(config.site.static_pages.iter().map(|page| {
        SitemapEntry::new(format!("{base}/{page}"), ymd(today), PAGE_PRIORITY)
    }));

    let mut pages: Vec<_> = pages.iter().collect();
    pages.sort_by(|a, b| a.filename.cmp(&b.filename));
    entries.extend(pages.into_iter().map(|page| {
        SitemapEntry::new(
            format!("{base}/{}", page.path.url_path()),
            ymd(page.modified.date_naive()),
            PAGE_PRIORITY,
        )
    }));

    let events_dir = &config.paths.events_dir;
    entries.extend(
        hub_files
            .iter()
            .filter(|f| f.name.ends_with(".html"))
            .map(|f| {
                let loc = if f.name == "index.html" {
                    format!("{base}/{events_dir}/")
                } else {
                    format!("{base}/{events_dir}/{}", f.name)
                };
                SitemapEntry::new(loc, ymd(f.modified.date_naive()), PAGE_PRIORITY)
            }),
    );

    entries
}

/// Serialize entries into an indented sitemap document.
pub fn to_xml(entries: Vec<SitemapEntry>) -> Result<String> {
    let urlset = UrlSet {
        xmlns: SITEMAP_NS.to_string(),
        urls: entries,
    };

    let mut body = String::new();
    let mut serializer = Serializer::new(&mut body);
    serializer.indent(' ', 2);
    urlset.serialize(serializer)?;

    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}

/// Parse a sitemap document back into its `<loc>` values.
pub fn locations(xml: &str) -> Result<Vec<String>> {
    let urlset: UrlSet = quick_xml::de::from_str(xml)?;
    Ok(urlset.urls.into_iter().map(|u| u.loc).collect())
}

/// Build and write `sitemap.xml`. Returns the number of URLs.
pub async fn write_sitemap(
    storage: &LocalStorage,
    config: &Config,
    today: NaiveDate,
    pages: &[PublishedPage],
) -> Result<usize> {
    let hub_files = storage.list_dir(&config.paths.events_dir).await?;
    let entries = build_entries(config, today, pages, &hub_files);
    let count = entries.len();

    storage
        .write_text(&config.paths.sitemap_file, &to_xml(entries)?)
        .await?;
    log::info!("Sitemap written with {count} URLs");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::slug::PagePath;
    use chrono::{Local, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> chrono::DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn page(filename: &str, branch: &str, slug: &str, day: u32) -> PublishedPage {
        PublishedPage {
            filename: filename.to_string(),
            path: PagePath::new(branch, slug),
            title: slug.to_string(),
            modified: at(2025, 9, day),
        }
    }

    #[test]
    fn test_build_entries_order_and_priority() {
        let config = Config::default();
        let today = NaiveDate::from_ymd_opt(2025, 9, 20).unwrap();
        let pages = vec![
            page("songdo-b.html", "songdo", "b", 3),
            page("gimpo-a.html", "gimpo", "a", 2),
        ];
        let hub = vec![
            FileEntry {
                name: "gimpo.html".to_string(),
                modified: at(2025, 9, 5),
            },
            FileEntry {
                name: "index.html".to_string(),
                modified: at(2025, 9, 5),
            },
        ];

        let entries = build_entries(&config, today, &pages, &hub);
        let locs: Vec<_> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://discounts.deluxo.co.kr/",
                "https://discounts.deluxo.co.kr/privacy.html",
                "https://discounts.deluxo.co.kr/gimpo/a",
                "https://discounts.deluxo.co.kr/songdo/b",
                "https://discounts.deluxo.co.kr/events/gimpo.html",
                "https://discounts.deluxo.co.kr/events/",
            ]
        );
        assert_eq!(entries[0].priority, "1.0");
        assert_eq!(entries[0].lastmod, "2025-09-20");
        assert!(entries[1..].iter().all(|e| e.priority == "0.8"));
        assert!(entries.iter().all(|e| e.changefreq == "daily"));
        assert_eq!(entries[2].lastmod, "2025-09-02");
    }

    #[test]
    fn test_to_xml_and_back() {
        let entries = vec![SitemapEntry::new(
            "https://example.com/songdo/골든듀".to_string(),
            "2025-09-01".to_string(),
            PAGE_PRIORITY,
        )];
        let xml = to_xml(entries).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset"));
        assert!(xml.contains(r#"xmlns="http://www.sitemaps.org/schemas/sitemap/0.9""#));
        assert!(xml.contains("<loc>https://example.com/songdo/골든듀</loc>"));
        assert!(xml.contains("<priority>0.8</priority>"));

        assert_eq!(
            locations(&xml).unwrap(),
            vec!["https://example.com/songdo/골든듀"]
        );
    }
}
