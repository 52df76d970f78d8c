// src/site/slug.rs

//! Slugs, page filenames and pretty paths.
//!
//! A page for branch `songdo` and slug `golden-sale` lives in
//! `pages/songdo-golden-sale.html` and is served at `/songdo/golden-sale`.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Branch, branch_for_filename};

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s가-힣-]").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HYPHEN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

/// Derive a URL-safe slug, keeping Hangul and other word characters.
///
/// ```
/// use outlet_pages::site::slug::slugify;
///
/// assert_eq!(slugify("[ POP-UP ] 피네플리츠"), "pop-up-피네플리츠");
/// assert_eq!(slugify("컨템포러리 S/S 시즌오프 특가 제안"), "컨템포러리-ss-시즌오프-특가-제안");
/// ```
pub fn slugify(title: &str) -> String {
    let kept = NON_SLUG_CHARS.replace_all(title, "");
    let spaced = WHITESPACE_RUN.replace_all(&kept, " ");
    let hyphenated = spaced.trim().replace(' ', "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_lowercase()
}

/// Physical page filename.
pub fn filename(branch_code: &str, slug: &str) -> String {
    format!("{branch_code}-{slug}.html")
}

/// Public path, without a leading slash.
pub fn pretty_path(branch_code: &str, slug: &str) -> String {
    format!("{branch_code}/{slug}")
}

/// A published page located by branch and slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePath {
    pub branch: String,
    pub slug: String,
}

impl PagePath {
    pub fn new(branch: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            slug: slug.into(),
        }
    }

    /// Inverse of [`filename`], for filenames with a known branch prefix.
    pub fn from_filename(name: &str, branches: &[Branch]) -> Option<Self> {
        let stem = name.strip_suffix(".html")?;
        let branch = branch_for_filename(branches, name)?;
        let slug = stem.strip_prefix(&branch.file_prefix())?;
        Some(Self::new(branch.code.clone(), slug))
    }

    pub fn filename(&self) -> String {
        filename(&self.branch, &self.slug)
    }

    /// `{branch}/{slug}`
    pub fn url_path(&self) -> String {
        pretty_path(&self.branch, &self.slug)
    }

    /// `/{branch}/{slug}`
    pub fn href(&self) -> String {
        format!("/{}", self.url_path())
    }
}
