//! Product page extraction.
//!
//! Maps a rendered product document onto a [`ProductRecord`] using the
//! static field table in [`fields`].

// Sub-modules
pub mod fields;
pub mod schema;
pub mod transforms;

use chrono::Local;
use scraper::Html;
use std::collections::HashMap;

use crate::utils::LAST_UPDATED_FORMAT;
use fields::{REGION_SELECTOR, compiled_fields};
use transforms::{parse_count, parse_rating};

// Re-exports for public API
pub use fields::{Field, FieldRule, Locator, PRODUCT_FIELDS, Read, Scope};
pub use schema::{ProductRecord, RECORD_COLUMNS};
pub use transforms::Transform;

/// Raw per-field values read from one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(HashMap<Field, String>);

impl FieldValues {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Value for an optional text column; empty strings count as absent
    fn optional(&self, field: Field) -> Option<String> {
        self.get(field)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    }

    fn text(&self, field: Field) -> String {
        self.get(field).unwrap_or_default().to_string()
    }
}

/// Evaluate every field rule against a parsed document
///
/// Returns `None` when the product region is missing, meaning "no product on
/// this page". Individual missing elements are simply absent from the map.
#[must_use]
pub fn extract_fields(document: &Html) -> Option<FieldValues> {
    let region = document.select(&REGION_SELECTOR).next()?;

    let values = compiled_fields()
        .iter()
        .filter_map(|compiled| {
            compiled
                .evaluate(document, region)
                .map(|value| (compiled.rule.field, value))
        })
        .collect();

    Some(FieldValues(values))
}

/// Extract a product record, stamped with the current local time
#[must_use]
pub fn extract_product(html: &str, product_url: &str, source: &str) -> Option<ProductRecord> {
    let now = Local::now().format(LAST_UPDATED_FORMAT).to_string();
    extract_product_at(html, product_url, source, &now)
}

/// Extract a product record with an explicit `last_updated` stamp
#[must_use]
pub fn extract_product_at(
    html: &str,
    product_url: &str,
    source: &str,
    last_updated: &str,
) -> Option<ProductRecord> {
    let document = Html::parse_document(html);
    let values = extract_fields(&document)?;

    Some(ProductRecord {
        source: source.to_string(),
        title: values.optional(Field::Title),
        description: values.text(Field::Description),
        item_price: values.optional(Field::ItemPrice),
        offer_price: values.optional(Field::OfferPrice),
        unit_price: values.optional(Field::UnitPrice),
        average_rating: parse_rating(values.get(Field::AverageRating)),
        review_count: parse_count(values.get(Field::ReviewCount)),
        tags: values.text(Field::Tags),
        categories: values.text(Field::Categories),
        product_url: product_url.to_string(),
        image_url: values.optional(Field::ImageUrl),
        last_updated: last_updated.to_string(),
    })
}
