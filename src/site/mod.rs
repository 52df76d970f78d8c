//! Static site publishing.
//!
//! Pages are rendered from the detail template, then the hub, sitemap,
//! index and redirect artifacts are regenerated from the pages directory.

pub mod hub;
pub mod identity;
pub mod index;
pub mod pages;
pub mod redirects;
pub mod render;
pub mod sitemap;
pub mod slug;

pub use pages::{PublishedPage, scan_pages};
pub use render::PageRenderer;
pub use slug::{PagePath, slugify};
