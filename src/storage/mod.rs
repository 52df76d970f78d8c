//! Persistence for the published site.
//!
//! - `local`: atomic file access under the public directory
//! - `mapping`: the append-only `url-mapping.json` store
//! - `rows`: per-sheet spreadsheet row exports

pub mod local;
pub mod mapping;
pub mod rows;

// Re-export for convenience
pub use local::{FileEntry, LocalStorage};
pub use mapping::MappingStore;
pub use rows::export_rows;
