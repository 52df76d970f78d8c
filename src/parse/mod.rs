//! Text and markup extraction.
//!
//! - `period`: free-text date ranges to ISO dates
//! - `products`: ordered product block cleanup
//! - `detail`: detail page markup to `EventDetail`
//! - `listing`: listing API / listing markup to `EventListing`

pub mod detail;
pub mod listing;
pub mod period;
pub mod products;

pub use detail::DetailParser;
pub use listing::{ListingSelectors, mobile_dm_code, parse_api_listing, parse_html_listing};
pub use period::{Period, PeriodParser, md_from_timestamp};
pub use products::{Exclusion, ProductNormalizer, RawProduct, format_price};
