// src/site/redirects.rs

//! Redirect artifacts derived from the URL mapping.
//!
//! Old `/pages/event-{id}.html` URLs are sent to the pretty `/{code}/{slug}`
//! path of the page the id maps to. The same rule set is emitted in three
//! flavours: Apache rewrite rules, a Cloudflare Pages `_redirects` file and a
//! Cloudflare Worker script.

use crate::error::Result;
use crate::models::{Branch, Config};
use crate::site::identity::published_filename;
use crate::site::slug::PagePath;
use crate::storage::{LocalStorage, MappingStore};

/// One old path to new path redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    pub old_path: String,
    pub new_path: String,
    pub code: u16,
}

/// Redirect rules for every mapped id, ordered by id.
///
/// Entries whose filename has no known branch prefix are skipped.
pub fn event_rules<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    branches: &[Branch],
) -> Vec<RedirectRule> {
    entries
        .into_iter()
        .filter_map(|(id, filename)| {
            let page = PagePath::from_filename(filename, branches)?;
            Some(RedirectRule {
                old_path: format!("/pages/event-{id}.html"),
                new_path: page.href(),
                code: 301,
            })
        })
        .collect()
}

/// Apache `RewriteRule` lines.
pub fn htaccess(rules: &[RedirectRule]) -> String {
    let mut out =
        String::from("# 기존 pages/event-*.html 파일들을 새로운 구조로 리다이렉트 (301 리다이렉트)\n");
    for rule in rules {
        let old = rule.old_path.trim_start_matches('/');
        out.push_str(&format!(
            "RewriteRule ^{old}$ {} [R={},L]\n",
            rule.new_path, rule.code
        ));
    }
    out
}

/// Cloudflare Pages `_redirects`: pretty-path rewrites, physical-path
/// normalization, then the event rules.
pub fn pages_redirects(rules: &[RedirectRule], branches: &[Branch]) -> String {
    let rewrites = branches
        .iter()
        .map(|b| format!("/{0}/*  /pages/{0}-:splat.html  200", b.code));
    let normalized = branches
        .iter()
        .map(|b| format!("/pages/{0}-:splat.html  /{0}/:splat  301", b.code));
    let events = rules
        .iter()
        .map(|rule| format!("{}   {}   {}", rule.old_path, rule.new_path, rule.code));

    rewrites
        .chain(normalized)
        .chain(events)
        .map(|line| line + "\n")
        .collect()
}

/// Cloudflare Worker answering old event URLs with a redirect.
pub fn worker_script(rules: &[RedirectRule]) -> String {
    let mut out = String::from(
        "// Cloudflare Worker: legacy event URL redirects (generated)\n\
         \n\
         addEventListener('fetch', event => {\n\
         \x20 event.respondWith(handleRequest(event.request))\n\
         })\n\
         \n\
         async function handleRequest(request) {\n\
         \x20 const url = new URL(request.url)\n\
         \x20 const pathname = url.pathname\n\
         \n\
         \x20 if (pathname.startsWith('/pages/event-') && pathname.endsWith('.html')) {\n\
         \x20   const newUrl = getNewUrl(pathname)\n\
         \x20   if (newUrl) {\n\
         \x20     return Response.redirect(new URL(newUrl, url.origin).toString(), 301)\n\
         \x20   }\n\
         \x20 }\n\
         \n\
         \x20 return fetch(request)\n\
         }\n\
         \n\
         function getNewUrl(oldPath) {\n",
    );
    out.push_str(&format!("  // {} rules\n", rules.len()));
    out.push_str("  const urlMappings = {\n");
    for rule in rules {
        out.push_str(&format!(
            "    {}: {},\n",
            js_string(&rule.old_path),
            js_string(&rule.new_path)
        ));
    }
    out.push_str("  }\n  return urlMappings[oldPath] || null\n}\n");
    out
}

/// JSON string literals are valid JavaScript string literals.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

/// Write all three redirect artifacts. Returns the number of event rules.
pub async fn write_redirects(
    storage: &LocalStorage,
    config: &Config,
    mapping: &MappingStore,
) -> Result<usize> {
    // Legacy entries redirect to the branch page registered for a variant
    let resolved: Vec<(&str, String)> = mapping
        .iter()
        .filter_map(|(id, _)| {
            published_filename(mapping, id, &config.branches).map(|filename| (id, filename))
        })
        .collect();
    let rules = event_rules(
        resolved.iter().map(|(id, filename)| (*id, filename.as_str())),
        &config.branches,
    );
    let paths = &config.paths;

    storage
        .write_text(&paths.htaccess_file, &htaccess(&rules))
        .await?;
    storage
        .write_text(
            &paths.pages_redirects_file,
            &pages_redirects(&rules, &config.branches),
        )
        .await?;
    storage
        .write_text(&paths.worker_file, &worker_script(&rules))
        .await?;

    log::info!(
        "Redirects: {} event rules from {} mapping entries",
        rules.len(),
        mapping.len()
    );
    Ok(rules.len())
}
