// src/parse/listing.rs

//! Event listing extraction, from the structured API and from listing markup.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::error::{FieldError, Result};
use crate::models::{EventListing, SourceConfig};
use crate::parse::detail::{parse_selector, raw_text, spaced_text};
use crate::parse::period::md_from_timestamp;

static MOBILE_DM_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var\s+curtMblDmCd\s*=\s*'([^']+)'").expect("valid regex"));

/// Value wrapper used by the API for coded fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeValue {
    #[serde(default)]
    pub value: Option<String>,
}

/// One event card as returned by the listing API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiItem {
    pub evnt_crd_cd: Option<serde_json::Value>,
    pub evnt_crd_nm: Option<String>,
    pub evnt_crd_type_cd: Option<CodeValue>,
    pub img_path2: Option<String>,
    pub exps_evnt_start_gbcd: Option<CodeValue>,
    pub exps_evnt_end_gbcd: Option<CodeValue>,
    pub exps_evnt_start_txt: Option<String>,
    pub exps_evnt_end_txt: Option<String>,
    pub exps_evnt_start_dt: Option<String>,
    pub exps_evnt_end_dt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiResult {
    #[serde(default)]
    items: Vec<ApiItem>,
}

/// Listing API response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    result: ApiResult,
}

impl ApiResponse {
    pub fn into_items(self) -> Vec<ApiItem> {
        self.result.items
    }
}

/// Pull the mobile display code the listing API is keyed on.
pub fn mobile_dm_code(listing_html: &str) -> std::result::Result<String, FieldError> {
    MOBILE_DM_CODE
        .captures(listing_html)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| FieldError::missing("curtMblDmCd"))
}

/// Category slug carried in detail links.
fn category(type_cd: Option<&str>) -> &'static str {
    match type_cd {
        Some("02") => "gift",
        Some("03") => "culture",
        Some("04") => "special",
        _ => "event",
    }
}

fn code(value: &Option<CodeValue>) -> Option<&str> {
    value.as_ref().and_then(|v| v.value.as_deref())
}

/// Either the free-text label (code `02`) or the timestamp as `M.D`.
fn period_side(gbcd: Option<&str>, text: &Option<String>, stamp: &Option<String>) -> String {
    if gbcd == Some("02") {
        text.clone().unwrap_or_default()
    } else {
        md_from_timestamp(stamp.as_deref().unwrap_or(""))
    }
}

impl ApiItem {
    /// Convert into a listing entry for `branch_cd`'s `page`.
    pub fn to_listing(&self, source: &SourceConfig, branch_cd: &str, page: u32) -> EventListing {
        let category = category(code(&self.evnt_crd_type_cd));

        let image_url = match self.img_path2.as_deref() {
            Some(path) if !path.is_empty() => {
                format!("{}{}", source.image_host, path).replace(&source.api_image_host, "")
            }
            _ => String::new(),
        };

        let start = period_side(
            code(&self.exps_evnt_start_gbcd),
            &self.exps_evnt_start_txt,
            &self.exps_evnt_start_dt,
        );
        let end = period_side(
            code(&self.exps_evnt_end_gbcd),
            &self.exps_evnt_end_txt,
            &self.exps_evnt_end_dt,
        );
        let separator = if end.is_empty() { "" } else { " ~ " };
        let period_text = format!("{start}{separator}{end}");

        let card_code = match &self.evnt_crd_cd {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let detail_url = format!(
            "{}{}?evntCrdCd={}&category={}&page={}&branchCd={}",
            source.base_url, source.detail_path, card_code, category, page, branch_cd
        );

        EventListing {
            title: self.evnt_crd_nm.clone().unwrap_or_default(),
            period_text,
            image_url,
            detail_url,
        }
    }
}

/// Parse the API response body into listing entries.
pub fn parse_api_listing(
    body: &str,
    source: &SourceConfig,
    branch_cd: &str,
    page: u32,
) -> Result<Vec<EventListing>> {
    let response: ApiResponse = serde_json::from_str(body)?;
    Ok(response
        .into_items()
        .iter()
        .map(|item| item.to_listing(source, branch_cd, page))
        .collect())
}

/// Selectors for the listing page markup.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    item: Selector,
    title: Selector,
    period: Selector,
    image: Selector,
    link: Selector,
}

impl ListingSelectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            item: parse_selector("#eventList > li")?,
            title: parse_selector(".info_tit")?,
            period: parse_selector(".info_txt")?,
            image: parse_selector("img")?,
            link: parse_selector("a")?,
        })
    }
}

/// Parse the event cards rendered into the listing page itself.
pub fn parse_html_listing(
    html: &str,
    selectors: &ListingSelectors,
    source: &SourceConfig,
) -> Vec<EventListing> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.item)
        .map(|item| {
            let title = item
                .select(&selectors.title)
                .next()
                .map(spaced_text)
                .unwrap_or_default();
            let period_text = item
                .select(&selectors.period)
                .next()
                .map(|el| raw_text(el).trim().to_string())
                .unwrap_or_default();
            let image_url = item
                .select(&selectors.image)
                .next()
                .and_then(|img| img.value().attr("src"))
                .unwrap_or("")
                .to_string();
            let detail_url = item
                .select(&selectors.link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| format!("{}{}", source.base_url, href))
                .unwrap_or_default();

            EventListing {
                title,
                period_text,
                image_url,
                detail_url,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_dm_code() {
        let html = "<script>\n var curtMblDmCd = 'DM0174';\n</script>";
        assert_eq!(mobile_dm_code(html), Ok("DM0174".to_string()));
        assert_eq!(
            mobile_dm_code("<html></html>"),
            Err(FieldError::missing("curtMblDmCd"))
        );
    }

    #[test]
    fn test_parse_api_listing() {
        let body = r#"{
          "result": {
            "items": [
              {
                "evntCrdCd": "E123",
                "evntCrdNm": "골든듀 36주년 창립 행사",
                "evntCrdTypeCd": {"value": "01"},
                "imgPath2": "contents/2025/09/18d811f187cd.jpg",
                "expsEvntStartGbcd": {"value": "01"},
                "expsEvntEndGbcd": {"value": "01"},
                "expsEvntStartDt": "20250901000000",
                "expsEvntEndDt": "20250930235959"
              },
              {
                "evntCrdCd": 77,
                "evntCrdNm": "상시 사은 행사",
                "evntCrdTypeCd": {"value": "02"},
                "imgPath2": "https://apiprism.ehyundai.com/gift/abc.png",
                "expsEvntStartGbcd": {"value": "02"},
                "expsEvntStartTxt": "상시",
                "expsEvntEndGbcd": {"value": "01"}
              }
            ]
          }
        }"#;
        let source = SourceConfig::default();
        let listings = parse_api_listing(body, &source, "B00174000", 2).unwrap();
        assert_eq!(listings.len(), 2);

        assert_eq!(listings[0].title, "골든듀 36주년 창립 행사");
        assert_eq!(listings[0].period_text, "9.1 ~ 9.30");
        assert_eq!(
            listings[0].image_url,
            "https://imgprism.ehyundai.com/contents/2025/09/18d811f187cd.jpg"
        );
        assert_eq!(
            listings[0].detail_url,
            "https://www.ehyundai.com/newPortal/SN/SN_0201000.do?evntCrdCd=E123&category=event&page=2&branchCd=B00174000"
        );

        // Free-text start, missing end timestamp
        assert_eq!(listings[1].period_text, "상시");
        assert_eq!(
            listings[1].image_url,
            "https://imgprism.ehyundai.com/gift/abc.png"
        );
        assert!(listings[1].detail_url.contains("evntCrdCd=77&category=gift"));
    }

    #[test]
    fn test_parse_api_listing_tolerates_missing_result() {
        let listings = parse_api_listing("{}", &SourceConfig::default(), "B1", 1).unwrap();
        assert!(listings.is_empty());
        assert!(parse_api_listing("not json", &SourceConfig::default(), "B1", 1).is_err());
    }

    #[test]
    fn test_parse_html_listing() {
        let html = r#"
          <ul id="eventList">
            <li>
              <a href="/newPortal/SN/SN_0201000.do?evntCrdCd=9">
                <img src="https://img.example.com/0080d56b7c9a.jpg">
                <p class="info_tit">[ POP-UP ]<br>피네플리츠</p>
                <p class="info_txt"> 9.1 ~ 9.14 </p>
              </a>
            </li>
            <li><p class="info_tit">링크 없는 카드</p></li>
          </ul>
        "#;
        let selectors = ListingSelectors::new().unwrap();
        let listings = parse_html_listing(html, &selectors, &SourceConfig::default());
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].title, "[ POP-UP ] 피네플리츠");
        assert_eq!(listings[0].period_text, "9.1 ~ 9.14");
        assert_eq!(
            listings[0].image_url,
            "https://img.example.com/0080d56b7c9a.jpg"
        );
        assert_eq!(
            listings[0].detail_url,
            "https://www.ehyundai.com/newPortal/SN/SN_0201000.do?evntCrdCd=9"
        );
        assert_eq!(listings[1].detail_url, "");
        assert_eq!(listings[1].image_url, "");
    }
}
