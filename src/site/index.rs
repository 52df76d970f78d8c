// src/site/index.rs

//! Landing page generation from legacy `event-*.html` pages.

use scraper::Selector;

use crate::error::Result;
use crate::models::Config;
use crate::parse::detail::parse_selector;
use crate::site::render::heading_text;
use crate::storage::LocalStorage;

const PREVIEW_COUNT: usize = 5;
const LEGACY_PREFIX: &str = "event-";

/// One landing page link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexLink {
    pub title: String,
    pub href: String,
}

fn link_lines(links: &[IndexLink]) -> String {
    links
        .iter()
        .map(|l| format!("    <li><a href=\"{}\">{}</a></li>", l.href, l.title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fill `{{PREVIEW_LINKS}}` (first five) and `{{EVENT_LINKS}}` (all).
pub fn render_index(template: &str, links: &[IndexLink]) -> String {
    let preview = &links[..links.len().min(PREVIEW_COUNT)];
    template
        .replace("{{PREVIEW_LINKS}}", &link_lines(preview))
        .replace("{{EVENT_LINKS}}", &link_lines(links))
}

async fn legacy_links(storage: &LocalStorage, pages_dir: &str) -> Result<Vec<IndexLink>> {
    let title_selectors: [Selector; 2] =
        [parse_selector("h1")?, parse_selector("section.fixArea h2")?];

    let mut links = Vec::new();
    for entry in storage.list_dir(pages_dir).await? {
        let Some(id) = entry
            .name
            .strip_prefix(LEGACY_PREFIX)
            .and_then(|rest| rest.strip_suffix(".html"))
        else {
            continue;
        };

        let key = format!("{pages_dir}/{}", entry.name);
        let html = match storage.read_text(&key).await {
            Ok(html) => html.unwrap_or_default(),
            Err(e) => {
                log::warn!("Could not read {key}: {e}");
                String::new()
            }
        };
        let title = title_selectors
            .iter()
            .find_map(|sel| heading_text(&html, sel))
            .unwrap_or_else(|| id.to_string());

        links.push(IndexLink {
            title,
            href: format!("pages/{}", entry.name),
        });
    }
    Ok(links)
}

/// Write `index.html` from the index template.
pub async fn write_index(storage: &LocalStorage, config: &Config, template: &str) -> Result<usize> {
    let links = legacy_links(storage, &config.paths.pages_dir).await?;
    storage
        .write_text(&config.paths.index_file, &render_index(template, &links))
        .await?;
    log::info!("Index written with {} legacy links", links.len());
    Ok(links.len())
}
