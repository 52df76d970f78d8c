// src/site/identity.rs

//! Event identity.
//!
//! The source site has no stable event key, so the id is taken from the tail
//! of the banner image filename. Older pages were published under slightly
//! different spellings of the same id (a `_02` suffix, or only the first nine
//! characters), and all of those have to keep resolving to the same page.

use crate::error::FieldError;
use crate::models::Branch;
use crate::site::slug::PagePath;
use crate::storage::MappingStore;

const ID_LEN: usize = 12;
const SHORT_LEN: usize = 9;
const SUFFIXES: [&str; 3] = ["_02", "_03", "_04"];

/// Derive the event id from a banner image URL.
///
/// Last path segment, cut at the first `.`, last 12 characters.
///
/// ```
/// use outlet_pages::site::identity::event_id_from_image;
///
/// let id = event_id_from_image("https://img.example.com/cms/20250901_0053227c91f9.jpg?v=2");
/// assert_eq!(id.unwrap(), "0053227c91f9");
/// ```
pub fn event_id_from_image(image_url: &str) -> Result<String, FieldError> {
    let path = image_url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    if path.is_empty() {
        return Err(FieldError::missing("image url"));
    }

    let segment = path.rsplit('/').next().unwrap_or_default();
    let stem = segment.split('.').next().unwrap_or_default();
    if stem.is_empty() {
        return Err(FieldError::malformed("image url", image_url));
    }

    let skip = stem.chars().count().saturating_sub(ID_LEN);
    Ok(stem.chars().skip(skip).collect())
}

/// All spellings an id may have been published under, starting with the id.
pub fn variants(id: &str) -> Vec<String> {
    let mut out = vec![id.to_string()];

    match id.strip_suffix("_02") {
        Some(base) => out.push(base.to_string()),
        None => out.push(format!("{id}_02")),
    }

    let suffixed = SUFFIXES.iter().any(|s| id.ends_with(s));
    if !suffixed {
        out.push(format!("{id}_03"));
        out.push(format!("{id}_04"));

        if id.chars().count() == ID_LEN {
            let short: String = id.chars().take(SHORT_LEN).collect();
            out.push(short.clone());
            out.extend(SUFFIXES.iter().map(|s| format!("{short}{s}")));
        }
    }

    out
}

/// Map every variant of `id` that is not mapped yet to `filename`.
///
/// Returns how many entries were inserted.
pub fn register(store: &mut MappingStore, id: &str, filename: &str) -> usize {
    variants(id)
        .iter()
        .filter(|variant| store.insert_if_absent(variant, filename))
        .count()
}

/// The branch page already published for `id` under any of its spellings.
///
/// Variants are tried in order, so the id's own entry wins when it points at a
/// branch page. Legacy `event-*.html` entries are passed over.
pub fn published_filename(store: &MappingStore, id: &str, branches: &[Branch]) -> Option<String> {
    variants(id)
        .iter()
        .filter_map(|variant| store.filename_for(variant))
        .find(|filename| PagePath::from_filename(filename, branches).is_some())
        .map(str::to_string)
}
