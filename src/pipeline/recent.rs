// src/pipeline/recent.rs

//! Recently published URLs, for manual search-console submission.

use chrono::{DateTime, Duration, Local};

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::site::slug::PagePath;
use crate::storage::LocalStorage;

/// Absolute URLs of pages and hub files modified within `days` of `now`,
/// newest first, at most `limit`.
pub async fn recent_urls(
    storage: &LocalStorage,
    config: &Config,
    days: i64,
    limit: usize,
    now: DateTime<Local>,
) -> Result<Vec<String>> {
    let cutoff = Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| AppError::validation(format!("--days {days} is out of range")))?;
    let base = config.site_base();
    let events_dir = &config.paths.events_dir;

    let mut items: Vec<(DateTime<Local>, String)> = Vec::new();

    for entry in storage.list_dir(&config.paths.pages_dir).await? {
        if let Some(page) = PagePath::from_filename(&entry.name, &config.branches) {
            items.push((entry.modified, page.href()));
        }
    }
    for entry in storage.list_dir(events_dir).await? {
        if !entry.name.ends_with(".html") {
            continue;
        }
        let path = if entry.name == "index.html" {
            format!("/{events_dir}/")
        } else {
            format!("/{events_dir}/{}", entry.name)
        };
        items.push((entry.modified, path));
    }

    items.retain(|(modified, _)| *modified >= cutoff);
    items.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    Ok(items
        .into_iter()
        .take(limit)
        .map(|(_, path)| format!("{base}{path}"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_recent_urls() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let config = Config::default();

        storage.write_text("pages/songdo-a.html", "a").await.unwrap();
        storage.write_text("pages/event-x.html", "x").await.unwrap();
        storage.write_text("events/index.html", "i").await.unwrap();

        let urls = recent_urls(&storage, &config, 7, 100, Local::now()).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls.contains(&"https://discounts.deluxo.co.kr/songdo/a".to_string()));
        assert!(urls.contains(&"https://discounts.deluxo.co.kr/events/".to_string()));

        let limited = recent_urls(&storage, &config, 7, 1, Local::now()).await.unwrap();
        assert_eq!(limited.len(), 1);

        // Only the lower bound is applied
        let past = Local::now() - Duration::days(30);
        assert_eq!(recent_urls(&storage, &config, 7, 100, past).await.unwrap().len(), 2);
        let future = Local::now() + Duration::days(30);
        assert!(recent_urls(&storage, &config, 7, 100, future).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_days_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let config = Config::default();

        let err = recent_urls(&storage, &config, i64::MAX, 10, Local::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
