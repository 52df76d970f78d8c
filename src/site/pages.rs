// src/site/pages.rs

//! Inventory of already published pages.

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::models::Branch;
use crate::parse::detail::parse_selector;
use crate::site::render::heading_text;
use crate::site::slug::PagePath;
use crate::storage::LocalStorage;

/// A `{code}-{slug}.html` file found in the pages directory.
#[derive(Debug, Clone)]
pub struct PublishedPage {
    pub filename: String,
    pub path: PagePath,
    /// First `<h1>` text, or the slug
    pub title: String,
    pub modified: DateTime<Local>,
}

/// Every page with a known branch prefix, sorted by filename.
///
/// Titles are read from the pages themselves; an unreadable page keeps its
/// slug as title.
pub async fn scan_pages(
    storage: &LocalStorage,
    pages_dir: &str,
    branches: &[Branch],
) -> Result<Vec<PublishedPage>> {
    let h1 = parse_selector("h1")?;
    let mut pages = Vec::new();

    for entry in storage.list_dir(pages_dir).await? {
        let Some(path) = PagePath::from_filename(&entry.name, branches) else {
            continue;
        };
        let key = format!("{pages_dir}/{}", entry.name);
        let title = match storage.read_text(&key).await {
            Ok(Some(html)) => heading_text(&html, &h1),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Could not read {key}: {e}");
                None
            }
        }
        .unwrap_or_else(|| path.slug.clone());

        pages.push(PublishedPage {
            filename: entry.name,
            path,
            title,
            modified: entry.modified,
        });
    }

    Ok(pages)
}

/// Newest first, then by title.
pub fn sort_newest_first(pages: &mut [PublishedPage]) {
    pages.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.title.cmp(&b.title))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scan_pages() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let config = Config::default();

        storage
            .write_text("pages/songdo-b.html", "<h1>송도 행사</h1>")
            .await
            .unwrap();
        storage.write_text("pages/gimpo-a.html", "<p>x</p>").await.unwrap();
        storage.write_text("pages/event-123.html", "<h1>old</h1>").await.unwrap();

        let pages = scan_pages(&storage, "pages", &config.branches).await.unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].filename, "gimpo-a.html");
        assert_eq!(pages[0].title, "a");
        assert_eq!(pages[1].path.href(), "/songdo/b");
        assert_eq!(pages[1].title, "송도 행사");
    }

    #[tokio::test]
    async fn test_scan_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let pages = scan_pages(&storage, "pages", &Config::default().branches)
            .await
            .unwrap();
        assert!(pages.is_empty());
    }
}
