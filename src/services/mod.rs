//! Service layer for the publisher.
//!
//! This module contains the remote access logic for:
//! - Page fetching (`Fetcher`, `HttpFetcher`)
//! - Listing retrieval with markup fallback (`ListingSource`)

mod fetch;
mod listing;

pub use fetch::{Fetcher, HttpFetcher};
pub use listing::{ListingPage, ListingSource};
