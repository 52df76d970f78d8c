// src/site/render.rs

//! Detail page rendering.
//!
//! The detail template is plain HTML with `{{placeholder}}` tokens. Every
//! token is replaced verbatim; tokens ending in `_JSON` receive a JSON string
//! literal so they can sit inside a JSON-LD block.

use chrono::NaiveDate;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Branch, Config, EventRecord, Product};
use crate::parse::detail::parse_selector;
use crate::site::slug::PagePath;
use crate::storage::LocalStorage;

/// How many same-branch pages go into the related block.
const RELATED_LIMIT: usize = 5;

/// Renders event records into `pages/{code}-{slug}.html`.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    storage: LocalStorage,
    pages_dir: String,
    site_base: String,
    branches: Vec<Branch>,
    template: String,
    today: String,
    heading: Selector,
}

impl PageRenderer {
    pub fn new(
        storage: LocalStorage,
        config: &Config,
        template: impl Into<String>,
        today: NaiveDate,
    ) -> Result<Self> {
        Ok(Self {
            storage,
            pages_dir: config.paths.pages_dir.clone(),
            site_base: config.site_base().to_string(),
            branches: config.branches.clone(),
            template: template.into(),
            today: today.format("%Y-%m-%d").to_string(),
            heading: parse_selector("h1")?,
        })
    }

    /// Render `record` into `filename` and return its `{code}/{slug}` path.
    pub async fn render(&self, record: &EventRecord, filename: &str) -> Result<String> {
        let page = PagePath::from_filename(filename, &self.branches).ok_or_else(|| {
            AppError::validation(format!(
                "page filename {filename:?} has no known branch prefix"
            ))
        })?;

        self.storage.ensure_dir(&self.pages_dir).await?;
        let related = self.related_block(&page, filename).await?;

        let html = self.fill(record, &page, filename, &related)?;
        self.storage
            .write_text(&format!("{}/{}", self.pages_dir, filename), &html)
            .await?;

        log::debug!("Rendered {} -> {}", record.id, page.url_path());
        Ok(page.url_path())
    }

    fn fill(
        &self,
        record: &EventRecord,
        page: &PagePath,
        filename: &str,
        related: &str,
    ) -> Result<String> {
        let title = record.clean_title();
        let description = record.clean_description();
        let detail_link = if record.listing.detail_url.is_empty() {
            "#"
        } else {
            record.listing.detail_url.as_str()
        };
        let pretty_url = format!("{}/{}", self.site_base, page.url_path());

        let replacements: [(&str, String); 20] = [
            ("{{제목_JSON}}", serde_json::to_string(&title)?),
            ("{{혜택 설명_JSON}}", serde_json::to_string(&description)?),
            ("{{제목}}", title),
            ("{{기간}}", record.listing.period_text.clone()),
            ("{{상세 제목}}", record.detail.title.clone()),
            ("{{상세 기간}}", record.detail.period_text.clone()),
            ("{{썸네일}}", record.listing.image_url.clone()),
            ("{{혜택 설명}}", description.replace('\n', "<br>")),
            ("{{업데이트 날짜}}", self.today.clone()),
            ("{{시작일}}", record.detail.start_date.clone()),
            ("{{종료일}}", record.detail.end_date.clone()),
            ("{{지점명}}", record.branch_name.clone()),
            ("{{event_id}}", record.id.clone()),
            ("{{상세 링크}}", detail_link.to_string()),
            ("{{상품 목록}}", product_list(&record.detail.products)),
            ("{{filename}}", filename.to_string()),
            ("{{pretty_path}}", pretty_url),
            ("{{site_base}}", self.site_base.clone()),
            ("{{branch_en}}", page.branch.clone()),
            ("{{관련 행사}}", related.to_string()),
        ];

        Ok(replacements
            .iter()
            .fold(self.template.clone(), |html, (token, value)| {
                html.replace(token, value)
            }))
    }

    /// Newest other pages of the same branch as `<li>` lines.
    async fn related_block(&self, page: &PagePath, filename: &str) -> Result<String> {
        let prefix = format!("{}-", page.branch);
        let mut candidates: Vec<_> = self
            .storage
            .list_dir(&self.pages_dir)
            .await?
            .into_iter()
            .filter(|e| {
                e.name != filename && e.name.starts_with(&prefix) && e.name.ends_with(".html")
            })
            .collect();
        candidates.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
        candidates.truncate(RELATED_LIMIT);

        let mut lines = Vec::with_capacity(candidates.len());
        for entry in candidates {
            let Some(other) = PagePath::from_filename(&entry.name, &self.branches) else {
                continue;
            };
            let title = self
                .page_heading(&entry.name)
                .await
                .unwrap_or_else(|| other.slug.clone());
            lines.push(format!("<li><a href=\"{}\">{}</a></li>", other.href(), title));
        }
        Ok(lines.join("\n"))
    }

    /// Text of the first `<h1>` of a published page, if readable.
    async fn page_heading(&self, name: &str) -> Option<String> {
        let key = format!("{}/{}", self.pages_dir, name);
        let html = match self.storage.read_text(&key).await {
            Ok(Some(html)) => html,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("Could not read {key} for related block: {e}");
                return None;
            }
        };
        heading_text(&html, &self.heading)
    }
}

/// Trimmed, space-joined text of the first element matching `selector`.
pub(crate) fn heading_text(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let text = document
        .select(selector)
        .next()?
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

fn product_list(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| {
            format!(
                r#"
        <div class='product'>
          <img
            src="{image}"
            alt="{name} 행사 이미지"
            loading="lazy" width="800" height="800"
          />
          <h3 class='name'>{name}</h3>
          <p class='price'>{price}</p>
        </div>
        "#,
                image = p.image_url,
                name = p.name,
                price = p.price,
            )
        })
        .collect()
}
