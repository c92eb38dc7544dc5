//! Product record schema
//!
//! Field order is the column order of the record store.

use serde::{Deserialize, Serialize, Serializer};

/// One extracted product page
///
/// `product_url` and `last_updated` are always populated; everything else
/// falls back to `None`, `""` or `0` when the page does not carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub source: String,
    pub title: Option<String>,
    pub description: String,
    pub item_price: Option<String>,
    pub offer_price: Option<String>,
    pub unit_price: Option<String>,
    /// Whole ratings, the missing `0` included, are written without a fraction
    #[serde(serialize_with = "whole_or_fraction")]
    pub average_rating: f32,
    pub review_count: u32,
    /// Comma-joined tag list
    pub tags: String,
    /// Breadcrumb path
    pub categories: String,
    pub product_url: String,
    pub image_url: Option<String>,
    pub last_updated: String,
}

/// Column names of the record store, in order
pub const RECORD_COLUMNS: [&str; 13] = [
    "source",
    "title",
    "description",
    "item_price",
    "offer_price",
    "unit_price",
    "average_rating",
    "review_count",
    "tags",
    "categories",
    "product_url",
    "image_url",
    "last_updated",
];

fn whole_or_fraction<S: Serializer>(rating: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    if rating.is_finite() && rating.fract() == 0.0 {
        serializer.serialize_i64(*rating as i64)
    } else {
        serializer.serialize_f32(*rating)
    }
}
