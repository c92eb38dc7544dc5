//! Aisle listing page parsing
//!
//! Pure functions over a rendered listing document: how many pages the
//! category reports, and which product links a page lists.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::config::PaginationAbsence;
use crate::page_extractor::transforms::stripped_text;
use crate::utils::constants::listing;
use crate::utils::resolve_href;

static MODULE: Lazy<Selector> = Lazy::new(|| built_in(listing::MODULE));
static PAGINATION: Lazy<Selector> = Lazy::new(|| built_in(listing::PAGINATION));
static MAX_PAGE: Lazy<Selector> = Lazy::new(|| built_in(listing::MAX_PAGE));
static ITEM: Lazy<Selector> = Lazy::new(|| built_in(listing::ITEM));
static ITEM_ANCHOR: Lazy<Selector> = Lazy::new(|| built_in(listing::ITEM_ANCHOR));

fn built_in(css: &'static str) -> Selector {
    crate::page_extractor::fields::selector(css)
}

/// Page count reported by a listing document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCount {
    /// Widget present; number of listing pages (at least 1)
    Pages(usize),
    /// No pagination widget on the page
    NoPagination,
}

impl PageCount {
    /// Number of listing pages to visit under `policy`
    #[must_use]
    pub fn pages_to_visit(self, policy: PaginationAbsence) -> usize {
        match (self, policy) {
            (PageCount::Pages(n), _) => n,
            (PageCount::NoPagination, PaginationAbsence::EmptyResult) => 0,
            (PageCount::NoPagination, PaginationAbsence::SinglePage) => 1,
        }
    }
}

/// Read the maximum page number from the pagination widget
///
/// A widget without a max-page element, or with one that does not hold a
/// positive integer, counts as a single page.
#[must_use]
pub fn page_count(document: &Html) -> PageCount {
    let Some(widget) = document.select(&PAGINATION).next() else {
        return PageCount::NoPagination;
    };

    let max = widget
        .select(&MAX_PAGE)
        .next()
        .map(stripped_text)
        .and_then(|text| text.parse::<usize>().ok())
        .filter(|n| *n > 0);

    match max {
        Some(n) => PageCount::Pages(n),
        None => {
            debug!("Pagination widget without a readable max page, assuming 1");
            PageCount::Pages(1)
        }
    }
}

/// Absolute product links listed on one page, in page order
///
/// The item list is the catalog module that hosts the pagination widget, so
/// carousels elsewhere on the page are not picked up. Without a widget the
/// page only yields links under [`PaginationAbsence::SinglePage`], from the
/// first module that lists items. Items without a product anchor are skipped.
#[must_use]
pub fn listing_links(document: &Html, origin: &Url, policy: PaginationAbsence) -> Vec<String> {
    let module = match document.select(&PAGINATION).next() {
        Some(widget) => enclosing_module(widget),
        None => match policy {
            PaginationAbsence::EmptyResult => None,
            PaginationAbsence::SinglePage => document
                .select(&MODULE)
                .find(|m| m.select(&ITEM).next().is_some()),
        },
    };

    let Some(module) = module else {
        return Vec::new();
    };

    module
        .select(&ITEM)
        .filter_map(|item| item.select(&ITEM_ANCHOR).next())
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_href(origin, href))
        .collect()
}

fn enclosing_module(widget: ElementRef<'_>) -> Option<ElementRef<'_>> {
    widget
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| MODULE.matches(el))
}
