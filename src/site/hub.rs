// src/site/hub.rs

//! Events hub pages: `events/index.html` for all branches and
//! `events/{code}.html` per branch.

use crate::error::Result;
use crate::models::Config;
use crate::site::pages::{PublishedPage, sort_newest_first};
use crate::storage::LocalStorage;

const HUB_DESCRIPTION: &str = "현대 프리미엄 아울렛 행사 모음 – 지점별 최신 행사 한곳에서 보기";

fn render_hub(title: &str, canonical: &str, intro: &str, items: &[&PublishedPage]) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|p| {
            format!(
                "<li><a href=\"{}\">[{}] {}</a></li>",
                p.path.href(),
                p.path.branch,
                p.title
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{title}</title>
  <link rel="canonical" href="{canonical}" />
  <meta name="description" content="{HUB_DESCRIPTION}" />
  <link rel="stylesheet" href="/style.css" />
</head>
<body>
  <div class="container">
    <h1>{title}</h1>
    <p>{intro}</p>
<ul class="events-grid">
{items}
</ul>
    <p style="margin-top:1rem"><a href="/">메인으로</a></p>
  </div>
</body>
</html>
"#,
        items = lines.join("\n"),
    )
}

/// Write the hub pages. Returns how many files were written.
pub async fn write_hub(
    storage: &LocalStorage,
    config: &Config,
    pages: &[PublishedPage],
) -> Result<usize> {
    let base = config.site_base();
    let dir = &config.paths.events_dir;

    let mut items: Vec<PublishedPage> = pages.to_vec();
    sort_newest_first(&mut items);

    let names: Vec<&str> = config.branches.iter().map(|b| b.name.as_str()).collect();
    let intro = format!(
        "현대 프리미엄 아울렛({})의 최신 행사 링크 모음입니다.",
        names.join("·")
    );

    let all: Vec<&PublishedPage> = items.iter().collect();
    storage
        .write_text(
            &format!("{dir}/index.html"),
            &render_hub("아울렛 행사 전체 보기", &format!("{base}/{dir}/"), &intro, &all),
        )
        .await?;

    for branch in &config.branches {
        let subset: Vec<&PublishedPage> = items
            .iter()
            .filter(|p| p.path.branch == branch.code)
            .collect();
        storage
            .write_text(
                &format!("{dir}/{}.html", branch.code),
                &render_hub(
                    &format!("[{}] 행사 모음", branch.code),
                    &format!("{base}/{dir}/{}.html", branch.code),
                    &intro,
                    &subset,
                ),
            )
            .await?;
    }

    let written = config.branches.len() + 1;
    log::info!("Events hub: {} items across {written} pages", items.len());
    Ok(written)
}
