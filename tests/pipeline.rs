//! End-to-end pipeline runs against a canned source site.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use outlet_pages::config::Templates;
use outlet_pages::error::{AppError, Result};
use outlet_pages::models::{Config, SheetRow};
use outlet_pages::pipeline::run_pipeline;
use outlet_pages::services::Fetcher;
use outlet_pages::site::sitemap;
use outlet_pages::storage::LocalStorage;
use tempfile::TempDir;

const LISTING_HTML: &str = "<script>var curtMblDmCd = 'DM01';</script>";

const API_PAGE_1: &str = r#"{"result":{"items":[
  {"evntCrdCd":"E1","evntCrdNm":"골든듀 창립 행사","imgPath2":"upload/evnt/20250901/0053227c91f9.jpg"},
  {"evntCrdCd":"E2","evntCrdNm":"[ POP-UP ] 피네플리츠","imgPath2":"upload/evnt/20250901/18d811f187cd.png"},
  {"evntCrdCd":"E3","evntCrdNm":"이미지 없는 행사"}
]}}"#;

const API_EMPTY: &str = r#"{"result":{"items":[]}}"#;

const DETAIL_HTML: &str = "<html><body><p>상세</p></body></html>";

/// Serves the songdo branch only; every other branch is unreachable.
struct FakeSite;

#[async_trait]
impl Fetcher for FakeSite {
    async fn fetch(&self, url: &str) -> Result<String> {
        if url.contains("SN_0101000") && url.contains("B00174000") {
            return Ok(LISTING_HTML.to_string());
        }
        if url.contains("GetCmsContentsAJX") {
            let first = url.ends_with("page%3D1");
            return Ok(if first { API_PAGE_1 } else { API_EMPTY }.to_string());
        }
        if url.contains("SN_0201000") {
            return Ok(DETAIL_HTML.to_string());
        }
        Err(AppError::fetch(url, "unreachable"))
    }
}

fn templates() -> Templates {
    Templates {
        detail: "<h1>{{제목}}</h1>\n<ul>\n{{관련 행사}}\n</ul>".to_string(),
        index: "<ul>{{EVENT_LINKS}}</ul>".to_string(),
    }
}

async fn mapping(storage: &LocalStorage) -> BTreeMap<String, String> {
    storage
        .read_json("url-mapping.json")
        .await
        .unwrap()
        .unwrap()
}

async fn sitemap_locs(storage: &LocalStorage) -> Vec<String> {
    let xml = storage.read_text("sitemap.xml").await.unwrap().unwrap();
    sitemap::locations(&xml).unwrap()
}

#[tokio::test]
async fn test_pipeline_publishes_and_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let storage = LocalStorage::new(tmp.path());
    let config = Config::default();
    let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();

    let report = run_pipeline(&config, &templates(), &storage, Arc::new(FakeSite), today)
        .await
        .unwrap();

    let songdo = &report.outcomes[0];
    assert_eq!(songdo.branch, "songdo");
    assert_eq!(songdo.listed, 3);
    assert_eq!(songdo.published, 2);
    assert_eq!(songdo.skipped, 1);
    assert!(report.outcomes[1..].iter().all(|o| o.listed == 0));

    assert!(storage.exists("pages/songdo-골든듀-창립-행사.html").await);
    assert!(storage.exists("pages/songdo-pop-up-피네플리츠.html").await);

    let first_mapping = mapping(&storage).await;
    assert_eq!(
        first_mapping["0053227c91f9"],
        "songdo-골든듀-창립-행사.html"
    );
    assert_eq!(
        first_mapping["18d811f187cd"],
        "songdo-pop-up-피네플리츠.html"
    );

    let locs = sitemap_locs(&storage).await;
    assert_eq!(locs[0], "https://discounts.deluxo.co.kr/");
    assert!(locs.contains(&"https://discounts.deluxo.co.kr/songdo/골든듀-창립-행사".to_string()));
    assert!(locs.contains(&"https://discounts.deluxo.co.kr/events/".to_string()));

    let rows: Vec<SheetRow> = storage.read_json("rows/Sheet1.json").await.unwrap().unwrap();
    assert_eq!(rows.len(), 2);

    // Second run over the same source changes nothing
    let again = run_pipeline(&config, &templates(), &storage, Arc::new(FakeSite), today)
        .await
        .unwrap();
    assert_eq!(again.outcomes[0].published, 2);
    assert_eq!(again.outcomes[0].mappings_added, 0);
    assert_eq!(mapping(&storage).await, first_mapping);
    assert_eq!(sitemap_locs(&storage).await, locs);

    let rows: Vec<SheetRow> = storage.read_json("rows/Sheet1.json").await.unwrap().unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_related_links_point_at_same_branch() {
    let tmp = TempDir::new().unwrap();
    let storage = LocalStorage::new(tmp.path());
    let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();

    run_pipeline(
        &Config::default(),
        &templates(),
        &storage,
        Arc::new(FakeSite),
        today,
    )
    .await
    .unwrap();

    // The second page is rendered after the first exists
    let html = storage
        .read_text("pages/songdo-pop-up-피네플리츠.html")
        .await
        .unwrap()
        .unwrap();
    assert!(html.contains("<a href=\"/songdo/골든듀-창립-행사\">골든듀 창립 행사</a>"));
}
