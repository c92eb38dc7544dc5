//! Category discovery: site map reading and listing pagination.

pub mod listing;
pub mod sitemap;
pub mod walker;

pub use listing::{PageCount, listing_links, page_count};
pub use sitemap::{SITEMAP_READY, category_links, fetch_category_links};
pub use walker::{LISTING_READY, discover};
